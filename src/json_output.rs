//! JSON output format for equivalence analyses
//!
//! `--format json` emits one `tost-json-v1` document per analysis.

use crate::equivalence::{ConfidenceInterval, EquivalenceBounds, EquivalenceTestResult};
use crate::summary::SampleSummary;
use serde::{Deserialize, Serialize};

/// One compared group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonGroup {
    pub label: String,
    pub mean: f64,
    pub sd: f64,
    pub n: usize,
}

/// The two one-sided tests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonTost {
    pub t_lower: f64,
    pub p_lower: f64,
    pub t_upper: f64,
    pub p_upper: f64,
    /// max(p_lower, p_upper)
    pub p: f64,
    pub df: f64,
    pub ci: ConfidenceInterval,
    pub significant: bool,
}

/// The conventional two-sided t-test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonNhst {
    pub t: f64,
    pub p: f64,
    pub df: f64,
    pub ci: ConfidenceInterval,
    pub significant: bool,
}

/// Complete JSON report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    /// Crate version that produced the report
    pub version: String,
    /// Format identifier
    pub format: String,
    pub groups: Vec<JsonGroup>,
    pub bounds: EquivalenceBounds,
    pub alpha: f64,
    pub equal_variance: bool,
    pub mean_difference: f64,
    pub standard_error: f64,
    pub effect_size: f64,
    pub tost: JsonTost,
    pub nhst: JsonNhst,
    /// Machine-readable outcome, e.g. `"equivalent"`
    pub conclusion: crate::equivalence::EquivalenceOutcome,
    /// Same outcome as a sentence
    pub interpretation: String,
}

impl JsonReport {
    pub fn from_result(
        groups: [(&str, &SampleSummary); 2],
        result: &EquivalenceTestResult,
    ) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "tost-json-v1".to_string(),
            groups: groups
                .iter()
                .map(|(label, s)| JsonGroup {
                    label: label.to_string(),
                    mean: s.mean,
                    sd: s.std_dev,
                    n: s.size,
                })
                .collect(),
            bounds: result.bounds,
            alpha: result.alpha,
            equal_variance: result.equal_variance,
            mean_difference: result.mean_difference,
            standard_error: result.standard_error,
            effect_size: result.effect_size,
            tost: JsonTost {
                t_lower: result.t_lower,
                p_lower: result.p_lower,
                t_upper: result.t_upper,
                p_upper: result.p_upper,
                p: result.tost_p(),
                df: result.degrees_of_freedom,
                ci: result.tost_ci,
                significant: result.is_equivalent(),
            },
            nhst: JsonNhst {
                t: result.nhst_t,
                p: result.nhst_p,
                df: result.degrees_of_freedom,
                ci: result.nhst_ci,
                significant: result.is_different(),
            },
            conclusion: result.conclusion,
            interpretation: result.interpretation(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
