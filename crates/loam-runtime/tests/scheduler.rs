use loam_geom::Vec2;
use loam_runtime::{FixedStepConfig, FixedStepScheduler, Simulation};
use proptest::prelude::*;

/// Moves the camera a fixed distance per step and records every dt it was handed.
#[derive(Default)]
struct Walker {
    pos: Vec2,
    dts: Vec<f64>,
}

impl Simulation for Walker {
    fn step(&mut self, dt_ms: f64) {
        self.dts.push(dt_ms);
        self.pos += Vec2::new(3.0, -1.0);
    }
    fn camera(&self) -> Vec2 {
        self.pos
    }
}

fn cfg(step_ms: f64) -> FixedStepConfig {
    FixedStepConfig { step_ms, ..FixedStepConfig::default() }
}

#[test]
fn fifty_ms_runs_two_steps() {
    let mut s = FixedStepScheduler::new(cfg(16.667));
    let mut w = Walker::default();
    assert_eq!(s.advance(0.0, &mut w).steps, 0);
    let t = s.advance(50.0, &mut w);
    assert_eq!(t.steps, 2);
    assert!((s.accumulator_ms() - 16.666).abs() < 1e-9);
    assert!((t.alpha - 0.9999).abs() < 1e-3);
    assert!(t.alpha < 1.0);
    assert_eq!(w.dts, vec![16.667, 16.667]);
    // interpolated between the snapshot before the last step and the current camera
    let expect = Vec2::new(3.0, -1.0).lerp(Vec2::new(6.0, -2.0), t.alpha as f32);
    assert!((t.camera - expect).length_sq() < 1e-6);
}

#[test]
fn stall_is_clamped_and_remainder_dropped() {
    let mut s = FixedStepScheduler::new(FixedStepConfig::default());
    let mut w = Walker::default();
    s.advance(1000.0, &mut w);
    let t = s.advance(6000.0, &mut w);
    assert_eq!(t.dt_ms, 250.0);
    assert_eq!(t.steps, 5);
    assert!(t.discarded_ms > 0.0);
    assert_eq!(s.accumulator_ms(), 0.0);
    assert_eq!(t.alpha, 0.0);
    // alpha 0 renders the snapshot taken before the last step
    assert_eq!(t.camera, w.pos - Vec2::new(3.0, -1.0));
    assert_eq!(s.counters().saturated_frames, 1);
}

#[test]
fn idle_frame_renders_current_camera() {
    let mut s = FixedStepScheduler::new(FixedStepConfig::default());
    let mut w = Walker::default();
    s.advance(0.0, &mut w);
    s.advance(20.0, &mut w);
    w.pos = Vec2::new(50.0, 50.0);
    let t = s.advance(21.0, &mut w);
    assert_eq!(t.steps, 0);
    assert_eq!(t.camera, Vec2::new(50.0, 50.0));
}

#[test]
fn pause_renders_without_stepping() {
    let mut s = FixedStepScheduler::new(FixedStepConfig::default());
    let mut w = Walker::default();
    s.advance(0.0, &mut w);
    s.advance(10.0, &mut w);
    s.set_paused(true);
    let t = s.advance(200.0, &mut w);
    assert!(t.paused);
    assert_eq!(t.steps, 0);
    assert_eq!(s.accumulator_ms(), 0.0);
    assert_eq!(t.camera, w.pos);
    s.set_paused(false);
    // time spent paused is not owed back
    assert_eq!(s.advance(210.0, &mut w).steps, 0);
}

#[test]
fn hidden_scheduler_does_nothing_and_resumes_fresh() {
    let mut s = FixedStepScheduler::new(FixedStepConfig::default());
    let mut w = Walker::default();
    s.advance(0.0, &mut w);
    s.advance(10.0, &mut w);
    s.set_visible(false);
    let t = s.advance(100.0, &mut w);
    assert!(t.suspended);
    assert_eq!(t.steps, 0);
    assert!(w.dts.is_empty());
    assert!(!s.is_running());

    s.set_visible(true);
    assert_eq!(s.accumulator_ms(), 0.0);
    let t = s.advance(5000.0, &mut w);
    assert_eq!(t.dt_ms, 0.0);
    assert_eq!(t.steps, 0);
    assert_eq!(s.advance(5020.0, &mut w).steps, 1);
}

proptest! {
    // no frame ever runs more sub-steps than configured, and alpha stays in [0, 1)
    #[test]
    fn sub_steps_are_bounded(deltas in proptest::collection::vec(-50.0f64..2000.0, 1..200), max in 1u32..8) {
        let mut s = FixedStepScheduler::new(FixedStepConfig { max_sub_steps: max, ..FixedStepConfig::default() });
        let mut w = Walker::default();
        let mut now = 0.0;
        s.advance(now, &mut w);
        for d in deltas {
            now += d;
            let t = s.advance(now, &mut w);
            prop_assert!(t.steps <= max);
            prop_assert!(t.dt_ms >= 0.0 && t.dt_ms <= 250.0);
            prop_assert!(t.alpha >= 0.0 && t.alpha < 1.0);
            prop_assert!(s.accumulator_ms() >= 0.0);
        }
    }

    // equal elapsed time split into different frame patterns yields the same step sequence
    // as long as no frame is clamped or saturated
    #[test]
    fn steps_depend_on_time_not_frame_pattern(splits in proptest::collection::vec(1u32..4, 1..40)) {
        let total: u32 = splits.iter().sum();
        let step = 16.0;
        let mut a = FixedStepScheduler::new(cfg(step));
        let mut b = FixedStepScheduler::new(cfg(step));
        let (mut wa, mut wb) = (Walker::default(), Walker::default());
        a.advance(0.0, &mut wa);
        b.advance(0.0, &mut wb);

        let mut now = 0.0;
        for k in &splits {
            now += f64::from(*k) * 8.0;
            a.advance(now, &mut wa);
        }
        for i in 1..=total {
            b.advance(f64::from(i) * 8.0, &mut wb);
        }
        prop_assert_eq!(wa.dts.len(), wb.dts.len());
        prop_assert_eq!(wa.pos, wb.pos);
        prop_assert!(wa.dts.iter().all(|&d| d == step));
    }
}
