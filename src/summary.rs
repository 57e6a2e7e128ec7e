//! Per-group descriptive statistics feeding the equivalence engine
//!
//! A `SampleSummary` is computed once from raw observations and never mutated.

use crate::dataset::Dataset;
use crate::equivalence::error::{EquivalenceError, Result};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Group size below which t-based results lean heavily on normality
pub const SMALL_SAMPLE_SIZE: usize = 5;

/// Mean, standard deviation and size of one group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator)
    pub std_dev: f64,
    pub size: usize,
}

impl SampleSummary {
    /// Build a summary from already-computed statistics
    ///
    /// Rejects `size < 2`, a non-positive standard deviation and non-finite values.
    pub fn new(mean: f64, std_dev: f64, size: usize) -> Result<Self> {
        let summary = Self {
            mean,
            std_dev,
            size,
        };
        summary.validate()?;
        Ok(summary)
    }

    /// Summarize raw observations
    ///
    /// # Example
    /// ```
    /// use tost::summary::SampleSummary;
    ///
    /// let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    /// let s = SampleSummary::from_observations(&values).unwrap();
    /// assert!((s.mean - 5.0).abs() < 1e-12);
    /// assert_eq!(s.size, 8);
    /// ```
    pub fn from_observations(values: &[f64]) -> Result<Self> {
        if values.len() < 2 {
            return Err(EquivalenceError::invalid(format!(
                "need at least 2 observations per group, got {}",
                values.len()
            )));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(EquivalenceError::invalid(format!(
                "observations must be finite, found {}",
                bad
            )));
        }

        let mean = values.iter().mean();
        let std_dev = values.iter().std_dev();
        Self::new(mean, std_dev, values.len())
    }

    /// Check the engine's preconditions for one group
    pub fn validate(&self) -> Result<()> {
        if self.size < 2 {
            return Err(EquivalenceError::invalid(format!(
                "sample size must be >= 2, got {}",
                self.size
            )));
        }
        if !self.mean.is_finite() {
            return Err(EquivalenceError::invalid(format!(
                "mean must be finite, got {}",
                self.mean
            )));
        }
        if !(self.std_dev.is_finite() && self.std_dev > 0.0) {
            return Err(EquivalenceError::invalid(format!(
                "standard deviation must be positive and finite, got {}",
                self.std_dev
            )));
        }
        Ok(())
    }

    /// Accepted, but too small to say much about the population shape
    pub fn is_small_sample(&self) -> bool {
        self.size < SMALL_SAMPLE_SIZE
    }

    pub fn variance(&self) -> f64 {
        self.std_dev * self.std_dev
    }

    /// Squared standard error of this group's mean
    pub(crate) fn mean_variance(&self) -> f64 {
        self.variance() / self.size as f64
    }
}

/// Summarize the observations of one labelled group
///
/// Unknown labels are invalid input; errors name the group.
pub fn summarize_group(dataset: &Dataset, group: &str) -> Result<SampleSummary> {
    let values = dataset.values_for(group);
    if values.is_empty() {
        return Err(EquivalenceError::invalid(format!(
            "group '{}' not found in dataset",
            group
        )));
    }
    let summary = SampleSummary::from_observations(&values).map_err(|e| match e {
        EquivalenceError::InvalidInput(msg) => {
            EquivalenceError::invalid(format!("group '{}': {}", group, msg))
        }
        other => other,
    })?;
    tracing::debug!(
        group,
        mean = summary.mean,
        sd = summary.std_dev,
        n = summary.size,
        "summarized group"
    );
    Ok(summary)
}

/// Summarize every group of a long-format dataset, keyed by label in sorted order
pub fn summarize_groups(dataset: &Dataset) -> Result<BTreeMap<String, SampleSummary>> {
    dataset
        .groups()
        .into_iter()
        .map(|group| {
            let summary = summarize_group(dataset, &group)?;
            Ok((group, summary))
        })
        .collect()
}
