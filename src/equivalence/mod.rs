// Equivalence Testing with Two One-Sided Tests (TOST)
//
// A non-significant t-test does not show that two groups are the same. TOST
// flips the question: it asks whether the mean difference is demonstrably
// inside a pre-registered band [low, high] of practically negligible effects.
//
// Scientific Foundation:
// [1] Schuirmann, D. J. (1987). A comparison of the two one-sided tests
//     procedure and the power approach for assessing the equivalence of
//     average bioavailability. J. Pharmacokinetics and Biopharmaceutics.
//
// [2] Lakens, D. (2017). Equivalence tests: A practical primer for t tests,
//     correlations, and meta-analyses. Social Psychological and Personality
//     Science.
//
// Implementation:
// - Uses statrs (crates.io) for Student's t tail probabilities and quantiles
// - Pooled (Student) or Welch-Satterthwaite standard error
// - Result is a pure function of the two group summaries and the config

pub mod config;
pub mod engine;
pub mod error;
pub mod verdict;

pub use config::{EquivalenceBounds, EquivalenceConfig};
pub use engine::{
    equivalence_test, equivalence_test_raw, standard_error, ConfidenceInterval,
    EquivalenceTestResult, StandardError,
};
pub use error::EquivalenceError;
pub use verdict::{render_interval_chart, EquivalenceOutcome};
