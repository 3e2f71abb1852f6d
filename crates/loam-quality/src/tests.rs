use super::*;

#[derive(Default)]
struct Recorder {
    tiers: Vec<QualityTier>,
    scales: Vec<f32>,
    particles: u32,
}

impl QualityTarget for Recorder {
    fn set_resolution_scale(&mut self, scale: f32) {
        self.scales.push(scale);
    }
    fn apply_tier(&mut self, tier: QualityTier, effects: &TierEffects) {
        self.tiers.push(tier);
        self.particles = effects.particle_budget;
    }
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn target_curve_is_piecewise() {
    assert!(close(resolution_target(10.0), 0.72));
    assert!(close(resolution_target(34.9), 0.72));
    assert!(close(resolution_target(40.0), 0.785));
    assert!(close(resolution_target(45.0), 0.85));
    assert!(close(resolution_target(51.5), 0.925));
    assert!(close(resolution_target(58.0), 1.0));
    assert!(close(resolution_target(144.0), 1.0));
}

#[test]
fn scale_is_blended_not_snapped() {
    let mut g = QualityGovernor::default();
    let r = g.sample(30.0, 500.0);
    assert!(close(r.scale, 1.0 + (0.72 - 1.0) * 0.35));
    assert_eq!(r.tier, QualityTier::High);
}

#[test]
fn sustained_low_then_high_switches_once_each_way() {
    let mut g = QualityGovernor::default();
    let mut transitions = Vec::new();
    for _ in 0..10 {
        if let Some(t) = g.sample(30.0, 500.0).transition {
            transitions.push(t);
        }
    }
    assert_eq!(transitions, vec![QualityTier::Low]);
    for i in 0..12 {
        let r = g.sample(60.0, 500.0);
        if i < 5 {
            assert_eq!(r.tier, QualityTier::Low, "sample {i}");
        }
        if let Some(t) = r.transition {
            transitions.push(t);
        }
    }
    assert_eq!(transitions, vec![QualityTier::Low, QualityTier::High]);
    assert_eq!(g.transitions(), 2);
}

#[test]
fn downgrade_lands_on_fourth_window() {
    let mut g = QualityGovernor::default();
    for _ in 0..3 {
        assert_eq!(g.sample(40.0, 500.0).transition, None);
    }
    let r = g.sample(40.0, 500.0);
    assert_eq!(r.transition, Some(QualityTier::Low));
    assert!(close(r.scale, 0.85));
}

#[test]
fn middle_band_decays_streaks() {
    let mut g = QualityGovernor::default();
    g.sample(30.0, 500.0);
    g.sample(30.0, 500.0);
    let r = g.sample(50.0, 500.0);
    assert_eq!(r.low_streak_ms, 750.0);
    assert_eq!(r.high_streak_ms, 0.0);
    let r = g.sample(60.0, 500.0);
    assert_eq!(r.low_streak_ms, 0.0);
    assert_eq!(r.high_streak_ms, 500.0);
}

#[test]
fn low_tier_caps_target() {
    let mut g = QualityGovernor::default();
    for _ in 0..4 {
        g.sample(30.0, 500.0);
    }
    assert_eq!(g.tier(), QualityTier::Low);
    let r = g.sample(60.0, 500.0);
    assert!(close(r.scale, 0.85 + (0.90 - 0.85) * 0.35));
}

#[test]
fn manual_mode_holds_everything() {
    let mut g = QualityGovernor::new(GovernorConfig { auto: false, ..GovernorConfig::default() });
    for _ in 0..20 {
        let r = g.sample(10.0, 500.0);
        assert_eq!(r.transition, None);
        assert_eq!(r.low_streak_ms, 0.0);
        assert_eq!(r.scale, 1.0);
    }
    assert_eq!(g.tier(), QualityTier::High);
}

#[test]
fn disabling_auto_clears_streaks() {
    let mut g = QualityGovernor::default();
    g.sample(30.0, 500.0);
    g.sample(30.0, 500.0);
    g.set_auto(false);
    g.set_auto(true);
    g.sample(30.0, 500.0);
    let r = g.sample(30.0, 500.0);
    assert_eq!(r.transition, None);
    assert_eq!(r.low_streak_ms, 1000.0);
}

#[test]
fn reduced_motion_skips_entry_scale() {
    let mut g = QualityGovernor::default();
    g.set_reduced_motion(true);
    let mut last = 0.0;
    for _ in 0..4 {
        last = g.sample(40.0, 500.0).scale;
    }
    assert_eq!(g.tier(), QualityTier::Low);
    // still on the smoothed curve toward the 40 fps target
    assert!((last - 0.8234).abs() < 1e-3);
}

#[test]
fn bad_samples_are_ignored() {
    let mut g = QualityGovernor::default();
    g.sample(f64::NAN, 500.0);
    g.sample(30.0, 0.0);
    g.sample(30.0, f64::INFINITY);
    let r = g.sample(-5.0, 500.0);
    assert_eq!(r.low_streak_ms, 0.0);
    assert_eq!(r.scale, 1.0);
}

#[test]
fn apply_is_idempotent() {
    let mut g = QualityGovernor::default();
    let mut rec = Recorder::default();
    g.apply(&mut rec);
    g.apply(&mut rec);
    assert_eq!(rec.tiers, vec![QualityTier::High]);
    assert_eq!(rec.scales.len(), 1);
    assert_eq!(rec.particles, 400);

    for _ in 0..4 {
        g.sample(30.0, 500.0);
    }
    g.apply(&mut rec);
    g.apply(&mut rec);
    assert_eq!(rec.tiers, vec![QualityTier::High, QualityTier::Low]);
    assert_eq!(rec.particles, 220);
    assert_eq!(rec.scales.len(), 2);

    g.invalidate_applied();
    g.apply(&mut rec);
    assert_eq!(rec.tiers.len(), 3);
}

#[test]
fn tier_effects_table() {
    let hi = TierEffects::for_tier(QualityTier::High);
    let lo = TierEffects::for_tier(QualityTier::Low);
    assert!(hi.glow && !lo.glow);
    assert_eq!(lo.light_flush_interval_ms, 50.0);
    assert_eq!(hi.light_flush_interval_ms, 0.0);
    assert_eq!(lo.minimap_interval_ms, 240.0);
    assert!(lo.low_power && !hi.low_power);
    assert_eq!(lo.ambient_opacity, 0.7);
}

#[test]
fn meter_reports_once_per_window() {
    let mut m = FpsMeter::default();
    let mut samples = Vec::new();
    let mut t = 0.0;
    for _ in 0..200 {
        if let Some(s) = m.frame(t) {
            samples.push(s);
        }
        t += 10.0;
    }
    // 2000ms of frames at 10ms spacing after the first
    assert_eq!(samples.len(), 3);
    assert!(samples.iter().all(|s| s.span_ms == 500.0));
    assert!((samples[1].fps - 100.0).abs() < 1e-9);
    assert_eq!(m.frame(f64::NAN), None);
}

#[test]
fn meter_reset_starts_a_new_window() {
    let mut m = FpsMeter::new(100.0);
    m.frame(0.0);
    m.frame(50.0);
    m.reset();
    assert_eq!(m.frame(10_000.0), None);
    let s = m.frame(10_100.0).unwrap();
    assert_eq!(s.span_ms, 100.0);
    assert!((s.fps - 20.0).abs() < 1e-9);
}

#[test]
fn config_reads_partial_toml() {
    let cfg: GovernorConfig = toml::from_str("auto = false\nlow_fps = 30.0").unwrap();
    assert!(!cfg.auto);
    assert_eq!(cfg.low_fps, 30.0);
    assert_eq!(cfg.high_fps, 56.0);
    assert_eq!(cfg.upgrade_after_ms, 3000.0);
}

#[test]
fn inverted_thresholds_are_swapped() {
    let cfg = GovernorConfig { low_fps: 60.0, high_fps: 40.0, ..GovernorConfig::default() }.sanitized();
    assert_eq!((cfg.low_fps, cfg.high_fps), (40.0, 60.0));
}
