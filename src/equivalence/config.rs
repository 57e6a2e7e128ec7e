// Configuration for TOST equivalence analysis
//
// Bounds are the smallest effect size of interest on the raw measurement
// scale. They are fixed before looking at the data, never derived from it.

use crate::equivalence::error::{EquivalenceError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Lower/upper equivalence bounds on the raw scale (`low < high`)
///
/// A missing bound in a config file falls back to the default `-5`/`+5`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquivalenceBounds {
    pub low: f64,
    pub high: f64,
}

impl EquivalenceBounds {
    /// Create bounds, rejecting non-finite, inverted or degenerate intervals
    pub fn new(low: f64, high: f64) -> Result<Self> {
        let bounds = Self { low, high };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Symmetric bounds `[-delta, +delta]`
    pub fn symmetric(delta: f64) -> Result<Self> {
        Self::new(-delta, delta)
    }

    /// Validate bounds
    pub fn validate(&self) -> Result<()> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(EquivalenceError::invalid(format!(
                "equivalence bounds must be finite, got [{}, {}]",
                self.low, self.high
            )));
        }
        if self.low >= self.high {
            return Err(EquivalenceError::invalid(format!(
                "lower bound must be strictly below upper bound, got [{}, {}]",
                self.low, self.high
            )));
        }
        Ok(())
    }

    /// Strict containment: a value sitting exactly on a bound is not inside
    pub fn contains(&self, value: f64) -> bool {
        self.low < value && value < self.high
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// Bounds seen from the other group's side: `[-high, -low]`
    pub fn mirrored(&self) -> Self {
        Self {
            low: -self.high,
            high: -self.low,
        }
    }
}

impl Default for EquivalenceBounds {
    fn default() -> Self {
        // +/- 5 ms: the VOT difference below which listeners can't tell groups apart
        Self {
            low: -5.0,
            high: 5.0,
        }
    }
}

/// Configuration for a TOST equivalence analysis
///
/// # Example
/// ```
/// use tost::equivalence::EquivalenceConfig;
///
/// let config = EquivalenceConfig::default();
/// assert_eq!(config.alpha, 0.05);
/// assert!(config.equal_variance);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquivalenceConfig {
    /// Significance level for each one-sided test
    ///
    /// - 0.05 (default): TOST interval at 90%, NHST interval at 95%
    /// - 0.01: TOST interval at 98%, NHST interval at 99%
    /// - 0.10: TOST interval at 80%, NHST interval at 90%
    pub alpha: f64,

    /// Pool the two variances (Student) instead of Welch's adjustment
    ///
    /// Default: true
    pub equal_variance: bool,

    /// Equivalence bounds on the raw scale
    pub bounds: EquivalenceBounds,
}

impl Default for EquivalenceConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            equal_variance: true,
            bounds: EquivalenceBounds::default(),
        }
    }
}

impl EquivalenceConfig {
    /// Create a configuration with the given bounds and default alpha
    pub fn with_bounds(bounds: EquivalenceBounds) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    /// Strict configuration: alpha = 0.01
    pub fn strict() -> Self {
        Self {
            alpha: 0.01,
            ..Self::default()
        }
    }

    /// Permissive configuration: alpha = 0.10
    pub fn permissive() -> Self {
        Self {
            alpha: 0.10,
            ..Self::default()
        }
    }

    /// Confidence level of the TOST interval (1 - 2 alpha)
    pub fn tost_confidence_level(&self) -> f64 {
        1.0 - 2.0 * self.alpha
    }

    /// Confidence level of the NHST interval (1 - alpha)
    pub fn nhst_confidence_level(&self) -> f64 {
        1.0 - self.alpha
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(EquivalenceError::invalid(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        self.bounds.validate()
    }

    /// Parse a TOML document; missing keys fall back to defaults
    ///
    /// ```
    /// use tost::equivalence::EquivalenceConfig;
    ///
    /// let config = EquivalenceConfig::from_toml_str(
    ///     "alpha = 0.01\n[bounds]\nlow = -3.0\nhigh = 3.0\n",
    /// ).unwrap();
    /// assert_eq!(config.alpha, 0.01);
    /// assert_eq!(config.bounds.high, 3.0);
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| EquivalenceError::invalid(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EquivalenceError::invalid(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }
}
