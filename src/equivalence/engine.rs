// Two one-sided tests (TOST) for equivalence of two independent means
//
// The observed difference is shifted toward each equivalence bound and tested
// one-sidedly against it. Equivalence holds when both shifted tests reject.
// A conventional two-sided t-test is run on the same standard error so the
// two verdicts can be combined into a single classification.
//
// Uses statrs' Student's t distribution for tail probabilities and critical
// values. Past NORMAL_APPROX_DF degrees of freedom the standard normal stands
// in for t; the two differ by less than 1e-4 there.

use crate::equivalence::config::{EquivalenceBounds, EquivalenceConfig};
use crate::equivalence::error::{EquivalenceError, Result};
use crate::equivalence::verdict::EquivalenceOutcome;
use crate::summary::SampleSummary;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Degrees of freedom above which t is replaced by the standard normal
pub const NORMAL_APPROX_DF: f64 = 10_000.0;

/// Reference distribution of the test statistics
#[derive(Debug, Clone)]
enum TailDistribution {
    StudentsT(StudentsT),
    Normal(Normal),
}

impl TailDistribution {
    fn new(df: f64) -> Result<Self> {
        if df > NORMAL_APPROX_DF {
            Normal::new(0.0, 1.0)
                .map(Self::Normal)
                .map_err(|e| EquivalenceError::numerical(format!("normal distribution: {}", e)))
        } else {
            StudentsT::new(0.0, 1.0, df)
                .map(Self::StudentsT)
                .map_err(|e| {
                    EquivalenceError::numerical(format!("t distribution (df={}): {}", df, e))
                })
        }
    }

    fn cdf(&self, x: f64) -> f64 {
        match self {
            Self::StudentsT(d) => d.cdf(x),
            Self::Normal(d) => d.cdf(x),
        }
    }

    fn sf(&self, x: f64) -> f64 {
        match self {
            Self::StudentsT(d) => d.sf(x),
            Self::Normal(d) => d.sf(x),
        }
    }

    fn quantile(&self, p: f64) -> f64 {
        match self {
            Self::StudentsT(d) => d.inverse_cdf(p),
            Self::Normal(d) => d.inverse_cdf(p),
        }
    }
}

/// Confidence interval for the mean difference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    /// Nominal coverage, e.g. 0.90
    pub level: f64,
}

impl ConfidenceInterval {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// True when `other` lies entirely inside this interval
    pub fn encloses(&self, other: &ConfidenceInterval) -> bool {
        self.lower <= other.lower && other.upper <= self.upper
    }
}

/// Outcome of a TOST equivalence analysis plus the matching two-sided t-test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquivalenceTestResult {
    /// mean1 - mean2
    pub mean_difference: f64,
    /// Standard error of the mean difference (pooled or Welch)
    pub standard_error: f64,
    /// Degrees of freedom; integral when variances are pooled
    pub degrees_of_freedom: f64,

    /// Test against the lower bound: (diff - low) / se
    pub t_lower: f64,
    /// Upper-tail p-value of `t_lower`
    pub p_lower: f64,
    /// Test against the upper bound: (diff - high) / se
    pub t_upper: f64,
    /// Lower-tail p-value of `t_upper`
    pub p_upper: f64,

    /// Two-sided test of diff = 0
    pub nhst_t: f64,
    pub nhst_p: f64,

    /// Interval at 1 - 2 alpha
    pub tost_ci: ConfidenceInterval,
    /// Interval at 1 - alpha
    pub nhst_ci: ConfidenceInterval,

    /// Cohen's d using the pooled standard deviation
    pub effect_size: f64,

    pub alpha: f64,
    pub bounds: EquivalenceBounds,
    pub equal_variance: bool,
    pub conclusion: EquivalenceOutcome,
}

impl EquivalenceTestResult {
    /// Overall TOST p-value: the larger of the two one-sided p-values
    pub fn tost_p(&self) -> f64 {
        self.p_lower.max(self.p_upper)
    }

    /// Both one-sided tests reject at alpha
    pub fn is_equivalent(&self) -> bool {
        self.p_lower < self.alpha && self.p_upper < self.alpha
    }

    /// The two-sided test rejects a zero difference at alpha
    pub fn is_different(&self) -> bool {
        self.nhst_p < self.alpha
    }
}

/// Standard error and degrees of freedom of the mean difference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardError {
    pub value: f64,
    pub df: f64,
}

/// Pooled-variance (Student) or Welch-Satterthwaite standard error
pub fn standard_error(
    group1: &SampleSummary,
    group2: &SampleSummary,
    equal_variance: bool,
) -> Result<StandardError> {
    let n1 = group1.size as f64;
    let n2 = group2.size as f64;

    let (value, df) = if equal_variance {
        let df = n1 + n2 - 2.0;
        let pooled_var = ((n1 - 1.0) * group1.variance() + (n2 - 1.0) * group2.variance()) / df;
        ((pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt(), df)
    } else {
        let v1 = group1.mean_variance();
        let v2 = group2.mean_variance();
        let se_sq = v1 + v2;
        let df = se_sq * se_sq / (v1 * v1 / (n1 - 1.0) + v2 * v2 / (n2 - 1.0));
        (se_sq.sqrt(), df)
    };

    if !value.is_finite() || value <= 0.0 {
        return Err(EquivalenceError::numerical(format!(
            "standard error of the mean difference is {}",
            value
        )));
    }
    if !df.is_finite() || df <= 0.0 {
        return Err(EquivalenceError::numerical(format!(
            "degrees of freedom evaluated to {}",
            df
        )));
    }

    Ok(StandardError { value, df })
}

/// Run TOST plus a two-sided t-test on two group summaries
///
/// # Example
/// ```
/// use tost::equivalence::{equivalence_test, EquivalenceConfig, EquivalenceOutcome};
/// use tost::summary::SampleSummary;
///
/// let g1 = SampleSummary::new(17.56, 6.57, 40).unwrap();
/// let g2 = SampleSummary::new(15.77, 5.75, 40).unwrap();
///
/// let result = equivalence_test(&g1, &g2, &EquivalenceConfig::default()).unwrap();
/// assert_eq!(result.degrees_of_freedom, 78.0);
/// assert_eq!(result.conclusion, EquivalenceOutcome::Equivalent);
/// ```
pub fn equivalence_test(
    group1: &SampleSummary,
    group2: &SampleSummary,
    config: &EquivalenceConfig,
) -> Result<EquivalenceTestResult> {
    config.validate()?;
    group1.validate()?;
    group2.validate()?;

    for (group, summary) in [(1, group1), (2, group2)] {
        if summary.is_small_sample() {
            tracing::warn!(
                group,
                size = summary.size,
                "small sample: p-values depend heavily on normality"
            );
        }
    }

    let bounds = config.bounds;
    let alpha = config.alpha;

    let se = standard_error(group1, group2, config.equal_variance)?;
    let t_dist = TailDistribution::new(se.df)?;

    let diff = group1.mean - group2.mean;

    let t_lower = (diff - bounds.low) / se.value;
    let t_upper = (diff - bounds.high) / se.value;
    let p_lower = t_dist.sf(t_lower);
    let p_upper = t_dist.cdf(t_upper);

    let nhst_t = diff / se.value;
    let nhst_p = (2.0 * t_dist.sf(nhst_t.abs())).min(1.0);

    let tost_ci = interval(&t_dist, diff, se.value, alpha, 1.0 - 2.0 * alpha);
    let nhst_ci = interval(&t_dist, diff, se.value, alpha / 2.0, 1.0 - alpha);

    for (name, p) in [("p_lower", p_lower), ("p_upper", p_upper), ("nhst_p", nhst_p)] {
        if !p.is_finite() {
            return Err(EquivalenceError::numerical(format!(
                "{} did not evaluate (df={}): {}",
                name, se.df, p
            )));
        }
    }
    if !(tost_ci.lower.is_finite() && tost_ci.upper.is_finite())
        || !(nhst_ci.lower.is_finite() && nhst_ci.upper.is_finite())
    {
        return Err(EquivalenceError::numerical(format!(
            "critical t value did not evaluate (df={})",
            se.df
        )));
    }

    let equivalent = p_lower < alpha && p_upper < alpha;
    let different = nhst_p < alpha;
    let conclusion = EquivalenceOutcome::from_significance(equivalent, different);

    tracing::debug!(
        diff,
        se = se.value,
        df = se.df,
        t_lower,
        p_lower,
        t_upper,
        p_upper,
        nhst_p,
        %conclusion,
        "equivalence test computed"
    );

    Ok(EquivalenceTestResult {
        mean_difference: diff,
        standard_error: se.value,
        degrees_of_freedom: se.df,
        t_lower,
        p_lower,
        t_upper,
        p_upper,
        nhst_t,
        nhst_p,
        tost_ci,
        nhst_ci,
        effect_size: cohens_d(group1, group2),
        alpha,
        bounds,
        equal_variance: config.equal_variance,
        conclusion,
    })
}

/// Flat-argument form of [`equivalence_test`]
#[allow(clippy::too_many_arguments)]
pub fn equivalence_test_raw(
    mean1: f64,
    sd1: f64,
    n1: usize,
    mean2: f64,
    sd2: f64,
    n2: usize,
    low_bound: f64,
    high_bound: f64,
    alpha: f64,
    equal_variance: bool,
) -> Result<EquivalenceTestResult> {
    let group1 = SampleSummary::new(mean1, sd1, n1)?;
    let group2 = SampleSummary::new(mean2, sd2, n2)?;
    let config = EquivalenceConfig {
        alpha,
        equal_variance,
        bounds: EquivalenceBounds::new(low_bound, high_bound)?,
    };
    equivalence_test(&group1, &group2, &config)
}

/// diff +/- t(1 - tail) * se
fn interval(
    t_dist: &TailDistribution,
    diff: f64,
    se: f64,
    tail: f64,
    level: f64,
) -> ConfidenceInterval {
    let margin = t_dist.quantile(1.0 - tail) * se;
    ConfidenceInterval {
        lower: diff - margin,
        upper: diff + margin,
        level,
    }
}

fn cohens_d(group1: &SampleSummary, group2: &SampleSummary) -> f64 {
    let n1 = group1.size as f64;
    let n2 = group2.size as f64;
    let pooled_sd = (((n1 - 1.0) * group1.variance() + (n2 - 1.0) * group2.variance())
        / (n1 + n2 - 2.0))
        .sqrt();
    (group1.mean - group2.mean) / pooled_sd
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vot_groups() -> (SampleSummary, SampleSummary) {
        (
            SampleSummary::new(17.56, 6.57, 40).unwrap(),
            SampleSummary::new(15.77, 5.75, 40).unwrap(),
        )
    }

    #[test]
    fn test_pooled_standard_error() {
        let (g1, g2) = vot_groups();
        let se = standard_error(&g1, &g2, true).unwrap();
        assert_eq!(se.df, 78.0);
        assert!((se.value - 1.38049).abs() < 1e-4, "se = {}", se.value);
    }

    #[test]
    fn test_welch_standard_error() {
        let (g1, g2) = vot_groups();
        let se = standard_error(&g1, &g2, false).unwrap();
        // Equal n: Welch se equals pooled se, df shrinks below n1 + n2 - 2
        assert!((se.value - 1.38049).abs() < 1e-4);
        assert!(se.df < 78.0 && se.df > 75.0, "df = {}", se.df);
    }

    #[test]
    fn test_welch_df_unequal_sizes() {
        let g1 = SampleSummary::new(10.0, 1.0, 10).unwrap();
        let g2 = SampleSummary::new(10.0, 10.0, 100).unwrap();
        let se = standard_error(&g1, &g2, false).unwrap();
        // 1.21 / (0.01 / 9 + 1 / 99)
        assert!((se.df - 107.919).abs() < 0.01, "df = {}", se.df);
        assert!(se.df < 108.0);
        assert!((se.value - (0.1f64 + 1.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_vot_scenario() {
        let (g1, g2) = vot_groups();
        let r = equivalence_test(&g1, &g2, &EquivalenceConfig::default()).unwrap();

        assert!((r.t_lower - 4.92).abs() < 0.01, "t_lower = {}", r.t_lower);
        assert!(r.p_lower < 1e-5 && r.p_lower > 1e-7, "p_lower = {}", r.p_lower);
        assert!((r.t_upper + 2.33).abs() < 0.01, "t_upper = {}", r.t_upper);
        assert!((r.p_upper - 0.011).abs() < 0.002, "p_upper = {}", r.p_upper);
        assert_eq!(r.degrees_of_freedom, 78.0);
        assert!((r.nhst_p - 0.199).abs() < 0.005, "nhst_p = {}", r.nhst_p);
        assert_eq!(r.tost_p(), r.p_upper);
        assert!(r.is_equivalent());
        assert!(!r.is_different());
        assert_eq!(r.conclusion, EquivalenceOutcome::Equivalent);
    }

    #[test]
    fn test_vot_intervals() {
        let (g1, g2) = vot_groups();
        let r = equivalence_test(&g1, &g2, &EquivalenceConfig::default()).unwrap();

        // t(0.95, 78) = 1.6646, t(0.975, 78) = 1.9908
        assert!((r.tost_ci.lower - (1.79 - 1.6646 * 1.38049)).abs() < 1e-3);
        assert!((r.tost_ci.upper - (1.79 + 1.6646 * 1.38049)).abs() < 1e-3);
        assert!((r.nhst_ci.lower - (1.79 - 1.9908 * 1.38049)).abs() < 1e-3);
        assert!((r.nhst_ci.upper - (1.79 + 1.9908 * 1.38049)).abs() < 1e-3);
        assert!((r.tost_ci.level - 0.90).abs() < 1e-12);
        assert!((r.nhst_ci.level - 0.95).abs() < 1e-12);
        assert!(r.nhst_ci.encloses(&r.tost_ci));
        assert!(r.nhst_ci.contains(0.0));
    }

    #[test]
    fn test_effect_size() {
        let (g1, g2) = vot_groups();
        let r = equivalence_test(&g1, &g2, &EquivalenceConfig::default()).unwrap();
        // 1.79 / 6.1737
        assert!((r.effect_size - 0.2899).abs() < 1e-3, "d = {}", r.effect_size);
    }

    #[test]
    fn test_raw_matches_summary_form() {
        let (g1, g2) = vot_groups();
        let a = equivalence_test(&g1, &g2, &EquivalenceConfig::default()).unwrap();
        let b =
            equivalence_test_raw(17.56, 6.57, 40, 15.77, 5.75, 40, -5.0, 5.0, 0.05, true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_size_one_is_invalid_input() {
        let err = equivalence_test_raw(17.56, 6.57, 1, 15.77, 5.75, 40, -5.0, 5.0, 0.05, true)
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_invalid_inputs() {
        let cases = [
            equivalence_test_raw(1.0, 0.0, 10, 1.0, 1.0, 10, -1.0, 1.0, 0.05, true),
            equivalence_test_raw(1.0, 1.0, 10, 1.0, -1.0, 10, -1.0, 1.0, 0.05, true),
            equivalence_test_raw(1.0, 1.0, 10, 1.0, 1.0, 10, 1.0, -1.0, 0.05, true),
            equivalence_test_raw(1.0, 1.0, 10, 1.0, 1.0, 10, 1.0, 1.0, 0.05, true),
            equivalence_test_raw(1.0, 1.0, 10, 1.0, 1.0, 10, -1.0, 1.0, 0.0, true),
            equivalence_test_raw(1.0, 1.0, 10, 1.0, 1.0, 10, -1.0, 1.0, 1.0, true),
            equivalence_test_raw(f64::NAN, 1.0, 10, 1.0, 1.0, 10, -1.0, 1.0, 0.05, true),
        ];
        for (i, case) in cases.into_iter().enumerate() {
            match case {
                Err(EquivalenceError::InvalidInput(_)) => {}
                other => panic!("case {} expected InvalidInput, got {:?}", i, other),
            }
        }
    }

    #[test]
    fn test_degenerate_standard_error_is_numerical() {
        // Constructed directly to bypass SampleSummary::new validation
        let g1 = SampleSummary {
            mean: 1.0,
            std_dev: 1e-300,
            size: 10,
        };
        let g2 = g1;
        let err = standard_error(&g1, &g2, true).unwrap_err();
        assert!(matches!(err, EquivalenceError::Numerical(_)));
    }

    #[test]
    fn test_normal_approximation_for_large_df() {
        let r = equivalence_test_raw(
            17.56, 6.57, 100_000, 15.77, 5.75, 100_000, -5.0, 5.0, 0.05, true,
        )
        .unwrap();
        assert_eq!(r.degrees_of_freedom, 199_998.0);
        // z(0.975) = 1.95996
        let half_width = (r.nhst_ci.upper - r.nhst_ci.lower) / 2.0;
        assert!((half_width / r.standard_error - 1.95996).abs() < 1e-4);
        assert_eq!(r.conclusion, EquivalenceOutcome::EquivalentAndDifferent);
    }

    #[test]
    fn test_p_values_in_unit_interval() {
        let r = equivalence_test_raw(0.0, 1.0, 5, 0.0, 1.0, 5, -0.1, 0.1, 0.05, true).unwrap();
        for p in [r.p_lower, r.p_upper, r.nhst_p] {
            assert!((0.0..=1.0).contains(&p), "p = {}", p);
        }
        assert_eq!(r.nhst_t, 0.0);
        assert!((r.nhst_p - 1.0).abs() < 1e-9);
    }
}
