//! Seeded simulation of the two-group VOT illustration dataset
//!
//! Each group's voice-onset times (ms) are drawn independently from a normal
//! distribution. The same seed always yields the same dataset.

use crate::dataset::{Dataset, Observation};
use crate::equivalence::error::{EquivalenceError, Result};
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;

/// Population parameters for one simulated group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub label: String,
    pub mean: f64,
    pub sd: f64,
    pub size: usize,
}

impl GroupSpec {
    pub fn new(label: impl Into<String>, mean: f64, sd: f64, size: usize) -> Self {
        Self {
            label: label.into(),
            mean,
            sd,
            size,
        }
    }
}

/// Two-group simulation plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotSimulation {
    pub groups: [GroupSpec; 2],
    pub seed: u64,
}

impl Default for VotSimulation {
    fn default() -> Self {
        Self {
            groups: [
                GroupSpec::new("monolingual", 17.0, 6.0, 40),
                GroupSpec::new("bilingual", 16.0, 6.0, 40),
            ],
            seed: 42,
        }
    }
}

impl VotSimulation {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Draw the dataset; group 1 rows come first, then group 2
    pub fn simulate(&self) -> Result<Dataset> {
        let [first, second] = &self.groups;
        if first.label == second.label {
            return Err(EquivalenceError::invalid(format!(
                "simulated groups need distinct labels, both are '{}'",
                first.label
            )));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut dataset = Dataset::default();

        for spec in &self.groups {
            if spec.size == 0 {
                return Err(EquivalenceError::invalid(format!(
                    "group '{}' must have at least one observation",
                    spec.label
                )));
            }
            let normal = Normal::new(spec.mean, spec.sd).map_err(|e| {
                EquivalenceError::invalid(format!(
                    "group '{}': cannot sample N({}, {}): {}",
                    spec.label, spec.mean, spec.sd, e
                ))
            })?;
            for _ in 0..spec.size {
                dataset.push(Observation::new(spec.label.clone(), normal.sample(&mut rng)));
            }
        }

        tracing::debug!(
            seed = self.seed,
            rows = dataset.len(),
            "simulated VOT dataset"
        );
        Ok(dataset)
    }
}
