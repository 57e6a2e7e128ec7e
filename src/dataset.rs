//! Long-format observation table (`group,value`)
//!
//! One row per measurement. CSV is the only on-disk form: a `group,value`
//! header followed by one observation per record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

/// Errors reading a dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Dataset contains no observations")]
    Empty,
}

impl DatasetError {
    /// Attach the record's line number when the CSV reader knows it
    fn from_csv(err: csv::Error) -> Self {
        match err.position() {
            Some(pos) => DatasetError::Parse {
                line: pos.line() as usize,
                reason: err.to_string(),
            },
            None => DatasetError::Csv(err),
        }
    }
}

/// A single measurement tagged with its group label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub group: String,
    pub value: f64,
}

impl Observation {
    pub fn new(group: impl Into<String>, value: f64) -> Self {
        Self {
            group: group.into(),
            value,
        }
    }
}

/// In-memory observation table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    observations: Vec<Observation>,
}

impl Dataset {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn push(&mut self, observation: Observation) {
        self.observations.push(observation);
    }

    /// Distinct group labels in sorted order
    pub fn groups(&self) -> Vec<String> {
        self.observations
            .iter()
            .map(|o| o.group.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Values of one group in insertion order
    pub fn values_for(&self, group: &str) -> Vec<f64> {
        self.observations
            .iter()
            .filter(|o| o.group == group)
            .map(|o| o.value)
            .collect()
    }

    /// Parse CSV text with a `group,value` header
    ///
    /// Blank lines are skipped. Fields may be quoted and surrounding
    /// whitespace is ignored.
    pub fn from_csv_str(content: &str) -> Result<Self, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = reader.headers().map_err(DatasetError::from_csv)?.clone();
        if headers.is_empty() {
            return Err(DatasetError::Empty);
        }
        if headers.iter().ne(["group", "value"]) {
            return Err(DatasetError::Parse {
                line: headers.position().map_or(1, |p| p.line() as usize),
                reason: format!(
                    "expected header 'group,value', got '{}'",
                    headers.iter().collect::<Vec<_>>().join(",")
                ),
            });
        }

        let mut observations = Vec::new();
        for record in reader.records() {
            let record = record.map_err(DatasetError::from_csv)?;
            let line = record.position().map_or(0, |p| p.line() as usize);
            let observation: Observation = record
                .deserialize(Some(&headers))
                .map_err(|e| DatasetError::Parse {
                    line,
                    reason: format!(
                        "'{}' is not a number ({})",
                        record.get(1).unwrap_or_default(),
                        e
                    ),
                })?;
            if observation.group.is_empty() {
                return Err(DatasetError::Parse {
                    line,
                    reason: "empty group label".to_string(),
                });
            }
            observations.push(observation);
        }

        if observations.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(Self::new(observations))
    }

    pub fn from_csv_file(path: &Path) -> Result<Self, DatasetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_csv_str(&content)
    }

    /// Render as CSV with a `group,value` header
    ///
    /// Labels containing delimiters or quotes are quoted so the output
    /// reads back unchanged.
    pub fn to_csv(&self) -> Result<String, DatasetError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(["group", "value"])?;
        for o in &self.observations {
            writer.serialize(o)?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
