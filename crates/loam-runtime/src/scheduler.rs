use loam_geom::Vec2;

pub const DEFAULT_STEP_MS: f64 = 1000.0 / 60.0;
pub const DEFAULT_MAX_SUB_STEPS: u32 = 5;
pub const DEFAULT_MAX_FRAME_DELTA_MS: f64 = 250.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedStepConfig {
    pub step_ms: f64,
    pub max_sub_steps: u32,
    /// Longer gaps between frames (stalls, debugger pauses) count as this much.
    pub max_frame_delta_ms: f64,
}

impl Default for FixedStepConfig {
    fn default() -> Self {
        Self {
            step_ms: DEFAULT_STEP_MS,
            max_sub_steps: DEFAULT_MAX_SUB_STEPS,
            max_frame_delta_ms: DEFAULT_MAX_FRAME_DELTA_MS,
        }
    }
}

impl FixedStepConfig {
    /// Replace unusable values with the defaults.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let pos = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        Self {
            step_ms: pos(self.step_ms, d.step_ms),
            max_sub_steps: self.max_sub_steps.max(1),
            max_frame_delta_ms: pos(self.max_frame_delta_ms, d.max_frame_delta_ms),
        }
    }
}

/// What the scheduler advances. `camera` is sampled around steps for render interpolation.
pub trait Simulation {
    fn step(&mut self, dt_ms: f64);
    fn camera(&self) -> Vec2;
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTiming {
    /// Clamped time credited to this frame.
    pub dt_ms: f64,
    pub steps: u32,
    /// Fraction of a step left in the accumulator, `0..1`.
    pub alpha: f64,
    /// Camera interpolated between the last two step snapshots.
    pub camera: Vec2,
    /// Accumulator dropped because the sub-step limit was hit.
    pub discarded_ms: f64,
    pub paused: bool,
    /// Set when the scheduler is stopped; nothing else in the struct is meaningful then.
    pub suspended: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulerCounters {
    pub frames: u64,
    pub steps: u64,
    /// Frames that hit the sub-step limit.
    pub saturated_frames: u64,
}

#[derive(Debug)]
pub struct FixedStepScheduler {
    cfg: FixedStepConfig,
    accumulator: f64,
    last_ms: Option<f64>,
    prev_cam: Vec2,
    cur_cam: Vec2,
    running: bool,
    paused: bool,
    counters: SchedulerCounters,
}

impl FixedStepScheduler {
    pub fn new(cfg: FixedStepConfig) -> Self {
        Self {
            cfg: cfg.sanitized(),
            accumulator: 0.0,
            last_ms: None,
            prev_cam: Vec2::ZERO,
            cur_cam: Vec2::ZERO,
            running: true,
            paused: false,
            counters: SchedulerCounters::default(),
        }
    }

    pub fn config(&self) -> FixedStepConfig {
        self.cfg
    }

    /// Takes effect on the next `advance`; the accumulator is kept.
    pub fn set_config(&mut self, cfg: FixedStepConfig) {
        self.cfg = cfg.sanitized();
    }

    /// Called once per display refresh with the frame timestamp.
    pub fn advance<S: Simulation + ?Sized>(&mut self, now_ms: f64, sim: &mut S) -> FrameTiming {
        if !self.running {
            return FrameTiming {
                camera: self.cur_cam,
                paused: self.paused,
                suspended: true,
                ..Default::default()
            };
        }
        self.counters.frames += 1;

        let dt = self.frame_delta(now_ms);
        let step = self.cfg.step_ms;

        if self.paused {
            self.accumulator = 0.0;
            self.cur_cam = sim.camera();
            self.prev_cam = self.cur_cam;
            return FrameTiming {
                dt_ms: dt,
                camera: self.cur_cam,
                paused: true,
                ..Default::default()
            };
        }

        self.accumulator += dt;
        let mut steps = 0;
        while steps < self.cfg.max_sub_steps && self.accumulator >= step {
            self.prev_cam = sim.camera();
            sim.step(step);
            self.accumulator -= step;
            steps += 1;
        }
        self.cur_cam = sim.camera();
        if steps == 0 {
            self.prev_cam = self.cur_cam;
        }

        let mut discarded = 0.0;
        if steps == self.cfg.max_sub_steps {
            discarded = self.accumulator;
            self.accumulator = 0.0;
            self.counters.saturated_frames += 1;
            if discarded > 0.0 {
                log::debug!(
                    target: "frame",
                    "sub-step limit {} reached, dropping {:.2}ms",
                    steps,
                    discarded
                );
            }
        }
        self.counters.steps += u64::from(steps);

        let alpha = (self.accumulator / step).clamp(0.0, 1.0);
        let camera = self.prev_cam.lerp(self.cur_cam, alpha as f32);
        FrameTiming {
            dt_ms: dt,
            steps,
            alpha,
            camera,
            discarded_ms: discarded,
            paused: false,
            suspended: false,
        }
    }

    fn frame_delta(&mut self, now_ms: f64) -> f64 {
        if !now_ms.is_finite() {
            return 0.0;
        }
        let dt = match self.last_ms {
            Some(last) => {
                let d = now_ms - last;
                if d.is_finite() && d > 0.0 {
                    d.min(self.cfg.max_frame_delta_ms)
                } else {
                    0.0
                }
            }
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt
    }

    /// Stop on visibility loss; regaining visibility drops the time spent hidden.
    pub fn set_visible(&mut self, visible: bool) {
        if visible == self.running {
            return;
        }
        self.running = visible;
        if visible {
            self.last_ms = None;
            self.accumulator = 0.0;
        }
        log::debug!(target: "frame", "scheduler {}", if visible { "resumed" } else { "suspended" });
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn accumulator_ms(&self) -> f64 {
        self.accumulator
    }

    pub fn counters(&self) -> SchedulerCounters {
        self.counters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        steps: u32,
        x: f32,
    }

    impl Simulation for Counter {
        fn step(&mut self, _dt_ms: f64) {
            self.steps += 1;
            self.x += 10.0;
        }
        fn camera(&self) -> Vec2 {
            Vec2::new(self.x, 0.0)
        }
    }

    #[test]
    fn sanitize_replaces_bad_values() {
        let cfg = FixedStepConfig {
            step_ms: f64::NAN,
            max_sub_steps: 0,
            max_frame_delta_ms: -3.0,
        }
        .sanitized();
        assert_eq!(cfg, FixedStepConfig { max_sub_steps: 1, ..FixedStepConfig::default() });
    }

    #[test]
    fn backwards_and_nan_timestamps_credit_nothing() {
        let mut s = FixedStepScheduler::new(FixedStepConfig::default());
        let mut sim = Counter { steps: 0, x: 0.0 };
        s.advance(100.0, &mut sim);
        assert_eq!(s.advance(90.0, &mut sim).dt_ms, 0.0);
        assert_eq!(s.advance(f64::NAN, &mut sim).dt_ms, 0.0);
        // NaN did not replace the last timestamp
        assert_eq!(s.advance(100.0, &mut sim).dt_ms, 10.0);
        assert_eq!(sim.steps, 0);
    }
}
