//! tost - Two one-sided tests for statistical equivalence
//!
//! This library tests whether the difference between two independent group
//! means lies inside a pre-specified band of negligible effects, alongside the
//! conventional two-sided t-test, and classifies the combined outcome. It
//! also summarizes raw observations per group and simulates the two-group
//! voice-onset-time dataset used for illustration.

pub mod cli;
pub mod dataset;
pub mod equivalence;
pub mod json_output;
pub mod simulation;
pub mod summary;
