use loam_quality::{GovernorConfig, QualityGovernor, QualityTier};
use proptest::prelude::*;

proptest! {
    // under 2000ms of any input cannot demote
    #[test]
    fn short_dips_never_demote(fps in proptest::collection::vec(0.0f64..120.0, 1..4)) {
        let mut g = QualityGovernor::default();
        for f in fps {
            prop_assert_eq!(g.sample(f, 500.0).transition, None);
        }
        prop_assert_eq!(g.tier(), QualityTier::High);
    }

    // flapping around the low threshold never pushes out of the hysteresis band fast enough to promote
    #[test]
    fn oscillating_near_low_threshold_never_promotes(n in 1usize..200) {
        let mut g = QualityGovernor::default();
        for _ in 0..4 {
            g.sample(30.0, 500.0);
        }
        prop_assert_eq!(g.tier(), QualityTier::Low);
        for i in 0..n {
            let f = if i % 2 == 0 { 44.0 } else { 46.0 };
            prop_assert_eq!(g.sample(f, 500.0).transition, None);
        }
        prop_assert_eq!(g.tier(), QualityTier::Low);
    }

    // the scale always stays inside the configured bounds
    #[test]
    fn scale_stays_bounded(fps in proptest::collection::vec(prop_oneof![0.0f64..200.0, Just(f64::NAN)], 1..300)) {
        let mut g = QualityGovernor::new(GovernorConfig::default());
        for f in fps {
            let r = g.sample(f, 500.0);
            prop_assert!(r.scale >= 0.72 - 1e-6 && r.scale <= 1.0 + 1e-6);
            prop_assert!(r.low_streak_ms >= 0.0 && r.high_streak_ms >= 0.0);
            prop_assert!(r.low_streak_ms == 0.0 || r.high_streak_ms == 0.0);
        }
    }

    // with auto quality off no sequence moves the tier
    #[test]
    fn manual_mode_never_transitions(fps in proptest::collection::vec(0.0f64..200.0, 1..100)) {
        let mut g = QualityGovernor::new(GovernorConfig { auto: false, ..GovernorConfig::default() });
        for f in fps {
            let r = g.sample(f, 500.0);
            prop_assert_eq!(r.transition, None);
            prop_assert_eq!(r.low_streak_ms, 0.0);
            prop_assert_eq!(r.high_streak_ms, 0.0);
        }
    }
}
