//! Property-based tests for the equivalence engine
//!
//! Properties covered:
//! 1. Pooled degrees of freedom are exactly n1 + n2 - 2
//! 2. Swapping groups (with mirrored bounds) exchanges the one-sided tests
//! 3. The TOST interval lies inside the NHST interval
//! 4. TOST significance agrees with the TOST interval lying inside the bounds
//! 5. Classification is consistent with the reported p-values
//! 6. Simulation is deterministic per seed

use proptest::prelude::*;
use tost::equivalence::{
    equivalence_test, EquivalenceBounds, EquivalenceConfig, EquivalenceOutcome,
};
use tost::simulation::VotSimulation;
use tost::summary::SampleSummary;

fn group() -> impl Strategy<Value = SampleSummary> {
    (-50.0f64..50.0, 0.5f64..20.0, 2usize..200)
        .prop_map(|(mean, sd, n)| SampleSummary::new(mean, sd, n).unwrap())
}

fn bounds() -> impl Strategy<Value = EquivalenceBounds> {
    (-20.0f64..20.0, 0.1f64..20.0)
        .prop_map(|(low, width)| EquivalenceBounds::new(low, low + width).unwrap())
}

fn config() -> impl Strategy<Value = EquivalenceConfig> {
    (bounds(), prop::sample::select(vec![0.01, 0.05, 0.10]), any::<bool>()).prop_map(
        |(bounds, alpha, equal_variance)| EquivalenceConfig {
            alpha,
            equal_variance,
            bounds,
        },
    )
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_pooled_df_is_n1_plus_n2_minus_2(g1 in group(), g2 in group(), b in bounds()) {
        let r = equivalence_test(&g1, &g2, &EquivalenceConfig::with_bounds(b)).unwrap();
        prop_assert_eq!(r.degrees_of_freedom, (g1.size + g2.size - 2) as f64);
    }

    #[test]
    fn prop_welch_df_between_min_and_pooled(g1 in group(), g2 in group(), b in bounds()) {
        let cfg = EquivalenceConfig { equal_variance: false, ..EquivalenceConfig::with_bounds(b) };
        let r = equivalence_test(&g1, &g2, &cfg).unwrap();
        let min_df = (g1.size.min(g2.size) - 1) as f64;
        let pooled_df = (g1.size + g2.size - 2) as f64;
        prop_assert!(r.degrees_of_freedom >= min_df - 1e-9);
        prop_assert!(r.degrees_of_freedom <= pooled_df + 1e-9);
    }

    #[test]
    fn prop_group_swap_mirrors_tests(g1 in group(), g2 in group(), cfg in config()) {
        let forward = equivalence_test(&g1, &g2, &cfg).unwrap();
        let swapped_cfg = EquivalenceConfig { bounds: cfg.bounds.mirrored(), ..cfg.clone() };
        let swapped = equivalence_test(&g2, &g1, &swapped_cfg).unwrap();

        prop_assert!(close(swapped.t_lower, -forward.t_upper));
        prop_assert!(close(swapped.t_upper, -forward.t_lower));
        prop_assert!(close(swapped.p_lower, forward.p_upper));
        prop_assert!(close(swapped.p_upper, forward.p_lower));
        prop_assert!(close(swapped.nhst_p, forward.nhst_p));
        prop_assert_eq!(swapped.conclusion, forward.conclusion);
    }

    #[test]
    fn prop_tost_ci_inside_nhst_ci(g1 in group(), g2 in group(), cfg in config()) {
        let r = equivalence_test(&g1, &g2, &cfg).unwrap();
        prop_assert!(r.nhst_ci.encloses(&r.tost_ci));
        prop_assert!(r.tost_ci.width() < r.nhst_ci.width());
        prop_assert!(r.tost_ci.contains(r.mean_difference));
    }

    #[test]
    fn prop_tost_matches_interval_inside_bounds(g1 in group(), g2 in group(), cfg in config()) {
        let r = equivalence_test(&g1, &g2, &cfg).unwrap();
        let margin = 1e-9 * r.standard_error;
        let clearly_inside = r.bounds.low + margin < r.tost_ci.lower
            && r.tost_ci.upper < r.bounds.high - margin;
        let clearly_outside = r.tost_ci.lower < r.bounds.low - margin
            || r.bounds.high + margin < r.tost_ci.upper;

        if clearly_inside {
            prop_assert!(r.is_equivalent());
        }
        if clearly_outside {
            prop_assert!(!r.is_equivalent());
        }
    }

    #[test]
    fn prop_conclusion_consistent_with_p_values(g1 in group(), g2 in group(), cfg in config()) {
        let r = equivalence_test(&g1, &g2, &cfg).unwrap();
        let expected = EquivalenceOutcome::from_significance(
            r.p_lower < cfg.alpha && r.p_upper < cfg.alpha,
            r.nhst_p < cfg.alpha,
        );
        prop_assert_eq!(r.conclusion, expected);
        prop_assert_eq!(r.tost_p(), r.p_lower.max(r.p_upper));
        for p in [r.p_lower, r.p_upper, r.nhst_p] {
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn prop_simulation_deterministic(seed in any::<u64>()) {
        let a = VotSimulation::with_seed(seed).simulate().unwrap();
        let b = VotSimulation::with_seed(seed).simulate().unwrap();
        prop_assert_eq!(a, b);
    }
}
