//! CLI argument parsing for tost

use crate::equivalence::{EquivalenceBounds, EquivalenceConfig, EquivalenceError};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the analysis report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "tost")]
#[command(version)]
#[command(
    about = "Two one-sided tests (TOST) for equivalence of two independent groups",
    long_about = None
)]
pub struct Cli {
    /// Mean of group 1
    #[arg(
        long,
        allow_negative_numbers = true,
        requires = "sd1",
        requires = "n1",
        requires = "mean2",
        requires = "sd2",
        requires = "n2"
    )]
    pub mean1: Option<f64>,

    /// Standard deviation of group 1
    #[arg(long, requires = "mean1")]
    pub sd1: Option<f64>,

    /// Sample size of group 1
    #[arg(long, requires = "mean1")]
    pub n1: Option<usize>,

    /// Mean of group 2
    #[arg(long, allow_negative_numbers = true, requires = "mean1")]
    pub mean2: Option<f64>,

    /// Standard deviation of group 2
    #[arg(long, requires = "mean1")]
    pub sd2: Option<f64>,

    /// Sample size of group 2
    #[arg(long, requires = "mean1")]
    pub n2: Option<usize>,

    /// Read observations from a CSV file with a `group,value` header
    #[arg(long, value_name = "CSV", conflicts_with_all = ["mean1", "simulate"])]
    pub data: Option<PathBuf>,

    /// Label of group 1 in the dataset (default: first group in the file)
    #[arg(long, value_name = "LABEL", requires = "data")]
    pub group1: Option<String>,

    /// Label of group 2 in the dataset (default: second group in the file)
    #[arg(long, value_name = "LABEL", requires = "data")]
    pub group2: Option<String>,

    /// Analyse a simulated VOT dataset (the default when no input is given)
    #[arg(long, conflicts_with = "mean1")]
    pub simulate: bool,

    /// Random seed for the simulated dataset
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Lower equivalence bound on the raw scale
    #[arg(long, allow_negative_numbers = true, value_name = "LOW")]
    pub low: Option<f64>,

    /// Upper equivalence bound on the raw scale
    #[arg(long, allow_negative_numbers = true, value_name = "HIGH")]
    pub high: Option<f64>,

    /// Significance level for each one-sided test (default: 0.05)
    #[arg(long, value_name = "ALPHA")]
    pub alpha: Option<f64>,

    /// Use Welch's unequal-variance t-test instead of pooling variances
    #[arg(long)]
    pub welch: bool,

    /// TOML analysis configuration; command-line flags take precedence
    #[arg(long, value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Print the dataset as CSV instead of analysing it
    #[arg(long = "emit-data", conflicts_with = "mean1")]
    pub emit_data: bool,

    /// Enable debug tracing on stderr
    #[arg(long)]
    pub debug: bool,
}

/// Where the two groups come from
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    /// Summary statistics given directly: (mean, sd, n) per group
    Summaries {
        group1: (f64, f64, usize),
        group2: (f64, f64, usize),
    },
    /// Raw observations from a CSV file
    Data {
        path: PathBuf,
        group1: Option<String>,
        group2: Option<String>,
    },
    /// Seeded simulation
    Simulate { seed: u64 },
}

impl Cli {
    /// Resolve the input source; clap has already enforced the flag combinations
    pub fn input_source(&self) -> InputSource {
        if let (Some(m1), Some(s1), Some(n1), Some(m2), Some(s2), Some(n2)) =
            (self.mean1, self.sd1, self.n1, self.mean2, self.sd2, self.n2)
        {
            return InputSource::Summaries {
                group1: (m1, s1, n1),
                group2: (m2, s2, n2),
            };
        }
        if let Some(path) = &self.data {
            return InputSource::Data {
                path: path.clone(),
                group1: self.group1.clone(),
                group2: self.group2.clone(),
            };
        }
        InputSource::Simulate { seed: self.seed }
    }

    /// Build the analysis configuration: defaults, then `--config`, then flags
    pub fn resolve_config(&self) -> Result<EquivalenceConfig, EquivalenceError> {
        let mut config = match &self.config {
            Some(path) => EquivalenceConfig::from_toml_file(path)?,
            None => EquivalenceConfig::default(),
        };

        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }
        if self.welch {
            config.equal_variance = false;
        }
        config.bounds = EquivalenceBounds {
            low: self.low.unwrap_or(config.bounds.low),
            high: self.high.unwrap_or(config.bounds.high),
        };

        config.validate()?;
        Ok(config)
    }
}
