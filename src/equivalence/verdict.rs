// Classification and reporting of an equivalence analysis
//
// Combines the TOST verdict with the two-sided t-test into one of four
// mutually exclusive outcomes, and renders the human-readable report.

use crate::equivalence::engine::EquivalenceTestResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Combined verdict of TOST and the two-sided t-test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquivalenceOutcome {
    /// Both significant: the effect is non-zero but smaller than the bounds
    EquivalentAndDifferent,

    /// Equivalence significant, t-test not
    Equivalent,

    /// t-test significant, equivalence not
    DifferentNotEquivalent,

    /// Neither significant: the data cannot decide (often underpowered)
    Undetermined,
}

impl EquivalenceOutcome {
    pub fn from_significance(equivalent: bool, different: bool) -> Self {
        match (equivalent, different) {
            (true, true) => Self::EquivalentAndDifferent,
            (true, false) => Self::Equivalent,
            (false, true) => Self::DifferentNotEquivalent,
            (false, false) => Self::Undetermined,
        }
    }

    /// Whether the TOST half of the verdict rejected non-equivalence
    pub fn is_equivalent(&self) -> bool {
        matches!(self, Self::EquivalentAndDifferent | Self::Equivalent)
    }

    /// Whether the two-sided half of the verdict rejected a zero difference
    pub fn is_different(&self) -> bool {
        matches!(self, Self::EquivalentAndDifferent | Self::DifferentNotEquivalent)
    }
}

impl fmt::Display for EquivalenceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EquivalentAndDifferent => write!(f, "equivalent and statistically different"),
            Self::Equivalent => write!(f, "statistically equivalent to zero"),
            Self::DifferentNotEquivalent => write!(f, "different and not equivalent"),
            Self::Undetermined => write!(f, "undetermined / underpowered"),
        }
    }
}

impl EquivalenceTestResult {
    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();
        let df = format_df(self.degrees_of_freedom);

        let header = match self.conclusion {
            EquivalenceOutcome::EquivalentAndDifferent => {
                "✅ EQUIVALENT (but statistically different)"
            }
            EquivalenceOutcome::Equivalent => "✅ EQUIVALENT",
            EquivalenceOutcome::DifferentNotEquivalent => "❌ NOT EQUIVALENT",
            EquivalenceOutcome::Undetermined => "⚠️  UNDETERMINED",
        };
        report.push_str(header);
        report.push_str("\n\n");

        report.push_str(&format!(
            "{} t-test, alpha = {}, equivalence bounds [{}, {}]\n",
            if self.equal_variance { "Student's" } else { "Welch's" },
            self.alpha,
            self.bounds.low,
            self.bounds.high
        ));
        report.push_str(&format!(
            "Mean difference: {:.3} (SE = {:.3}, Cohen's d = {:.3})\n",
            self.mean_difference, self.standard_error, self.effect_size
        ));

        report.push_str("\n📊 Equivalence test (TOST):\n");
        report.push_str(&format!(
            "  lower bound: t({}) = {:.3}, p = {}\n",
            df,
            self.t_lower,
            format_p(self.p_lower)
        ));
        report.push_str(&format!(
            "  upper bound: t({}) = {:.3}, p = {}\n",
            df,
            self.t_upper,
            format_p(self.p_upper)
        ));
        report.push_str(&format!(
            "  {}% CI: [{:.3}, {:.3}]\n",
            format_level(self.tost_ci.level),
            self.tost_ci.lower,
            self.tost_ci.upper
        ));

        report.push_str("\n📊 Null hypothesis test:\n");
        report.push_str(&format!(
            "  t({}) = {:.3}, p = {}\n",
            df,
            self.nhst_t,
            format_p(self.nhst_p)
        ));
        report.push_str(&format!(
            "  {}% CI: [{:.3}, {:.3}]\n",
            format_level(self.nhst_ci.level),
            self.nhst_ci.lower,
            self.nhst_ci.upper
        ));

        report.push_str(&format!("\nConclusion: {}\n", self.interpretation()));

        report.push('\n');
        report.push_str(&render_interval_chart(self, 60));
        report
    }

    /// One-sentence reading of the conclusion
    pub fn interpretation(&self) -> String {
        let tost = if self.conclusion.is_equivalent() {
            format!(
                "the equivalence test was significant (p = {})",
                format_p(self.tost_p())
            )
        } else {
            format!(
                "the equivalence test was non-significant (p = {})",
                format_p(self.tost_p())
            )
        };
        let nhst = if self.conclusion.is_different() {
            format!("the null hypothesis test was significant (p = {})", format_p(self.nhst_p))
        } else {
            format!(
                "the null hypothesis test was non-significant (p = {})",
                format_p(self.nhst_p)
            )
        };
        format!("{}, {}; the result is {}.", capitalize(&tost), nhst, self.conclusion)
    }
}

/// Text chart of both intervals against the equivalence bounds
///
/// `[` `]` mark the bounds, `|` zero, `-` the NHST interval, `=` the TOST
/// interval and `o` the observed difference. The axis spans everything drawn.
pub fn render_interval_chart(result: &EquivalenceTestResult, width: usize) -> String {
    let width = width.max(10);
    let points = [
        result.bounds.low,
        result.bounds.high,
        result.nhst_ci.lower,
        result.nhst_ci.upper,
        result.tost_ci.lower,
        result.tost_ci.upper,
        0.0,
    ];
    let mut min = points.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = points.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let pad = (max - min) * 0.05;
    min -= pad;
    max += pad;

    let column = |v: f64| -> usize {
        let pos = ((v - min) / (max - min) * (width - 1) as f64).round();
        (pos.max(0.0) as usize).min(width - 1)
    };

    let mut row = vec![' '; width];
    let fill = |lo: f64, hi: f64, c: char, row: &mut [char]| {
        let (a, b) = (column(lo.min(hi)), column(lo.max(hi)));
        for cell in &mut row[a..=b] {
            *cell = c;
        }
    };
    fill(result.nhst_ci.lower, result.nhst_ci.upper, '-', &mut row);
    fill(result.tost_ci.lower, result.tost_ci.upper, '=', &mut row);
    row[column(0.0)] = '|';
    row[column(result.bounds.low)] = '[';
    row[column(result.bounds.high)] = ']';
    row[column(result.mean_difference)] = 'o';

    let line: String = row.into_iter().collect();
    format!(
        "{}\n{:<half$}{:>rest$}\n",
        line,
        format!("{:.2}", min),
        format!("{:.2}", max),
        half = width / 2,
        rest = width - width / 2
    )
}

fn format_p(p: f64) -> String {
    if p < 0.001 {
        format!("{:.2e}", p)
    } else {
        format!("{:.3}", p)
    }
}

fn format_df(df: f64) -> String {
    if df.fract() == 0.0 {
        format!("{}", df as u64)
    } else {
        format!("{:.2}", df)
    }
}

fn format_level(level: f64) -> String {
    let pct = level * 100.0;
    if (pct - pct.round()).abs() < 1e-9 {
        format!("{}", pct.round() as i64)
    } else {
        format!("{:.1}", pct)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
