use loam_geom::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Frame-rate independent follow camera. `pos` is the top-left corner of the view in pixels.
#[derive(Clone, Debug)]
pub struct FollowCamera {
    pub pos: Vec2,
    pub view: Vec2,
    pub smoothing: f32,
}

impl FollowCamera {
    pub fn new(view: Vec2, smoothing: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            view,
            smoothing: Self::sane_smoothing(smoothing),
        }
    }

    fn sane_smoothing(k: f32) -> f32 {
        if k.is_finite() { k.clamp(0.0, 1.0) } else { 0.08 }
    }

    pub fn set_smoothing(&mut self, k: f32) {
        self.smoothing = Self::sane_smoothing(k);
    }

    /// View origin that centers `focus`, kept inside a world of `world_px`.
    pub fn target_for(&self, focus: Vec2, world_px: Vec2) -> Vec2 {
        let max = world_px - self.view;
        Vec2::new(
            (focus.x - self.view.x * 0.5).min(max.x).max(0.0),
            (focus.y - self.view.y * 0.5).min(max.y).max(0.0),
        )
    }

    pub fn snap_to(&mut self, focus: Vec2, world_px: Vec2) {
        self.pos = self.target_for(focus, world_px);
    }

    pub fn follow(&mut self, focus: Vec2, world_px: Vec2, dt_scale: f32) {
        let target = self.target_for(focus, world_px);
        let k = 1.0 - (1.0 - self.smoothing).powf(dt_scale.max(0.0));
        self.pos += (target - self.pos) * k;
    }
}

/// Decaying random camera offset. Stacking keeps the stronger amplitude and the
/// longer duration. Disabled entirely while `suppressed` is set.
#[derive(Clone, Debug)]
pub struct CameraShake {
    amp: f32,
    remaining_ms: f64,
    total_ms: f64,
    offset: Vec2,
    suppressed: bool,
    rng: SmallRng,
}

impl CameraShake {
    pub fn new(seed: u64) -> Self {
        Self {
            amp: 0.0,
            remaining_ms: 0.0,
            total_ms: 0.0,
            offset: Vec2::ZERO,
            suppressed: false,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn add(&mut self, amp: f32, ms: f64) {
        if self.suppressed {
            return;
        }
        let amp = if amp.is_finite() { amp.max(0.0) } else { 0.0 };
        let ms = if ms.is_finite() { ms.max(0.0) } else { 0.0 };
        if amp <= 0.0 || ms <= 0.0 {
            return;
        }
        self.amp = self.amp.max(amp);
        self.remaining_ms = self.remaining_ms.max(ms);
        self.total_ms = self.total_ms.max(self.remaining_ms);
    }

    pub fn set_suppressed(&mut self, on: bool) {
        self.suppressed = on;
        if on {
            self.clear();
        }
    }

    pub fn clear(&mut self) {
        self.amp = 0.0;
        self.remaining_ms = 0.0;
        self.total_ms = 0.0;
        self.offset = Vec2::ZERO;
    }

    pub fn tick(&mut self, dt_ms: f64) {
        if self.remaining_ms <= 0.0 {
            self.clear();
            return;
        }
        self.remaining_ms = (self.remaining_ms - dt_ms).max(0.0);
        let t = (self.remaining_ms / self.total_ms.max(1.0)) as f32;
        let strength = self.amp * t;
        self.offset = Vec2::new(
            self.rng.random_range(-1.0f32..=1.0) * strength,
            self.rng.random_range(-1.0f32..=1.0) * strength * 0.65,
        );
    }

    pub fn offset(&self) -> Vec2 {
        if self.remaining_ms > 0.0 { self.offset } else { Vec2::ZERO }
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_converges_and_respects_bounds() {
        let mut cam = FollowCamera::new(Vec2::new(320.0, 180.0), 0.08);
        let world = Vec2::new(1600.0, 800.0);
        let focus = Vec2::new(800.0, 400.0);
        for _ in 0..400 {
            cam.follow(focus, world, 1.0);
        }
        assert!((cam.pos - Vec2::new(640.0, 310.0)).length_sq() < 0.01);

        cam.snap_to(Vec2::new(-50.0, 5000.0), world);
        assert_eq!(cam.pos, Vec2::new(0.0, 620.0));
    }

    #[test]
    fn smoothing_is_frame_rate_independent() {
        let world = Vec2::new(10_000.0, 10_000.0);
        let focus = Vec2::new(3000.0, 3000.0);
        let mut a = FollowCamera::new(Vec2::new(100.0, 100.0), 0.08);
        let mut b = a.clone();
        for _ in 0..10 {
            a.follow(focus, world, 1.0);
        }
        for _ in 0..5 {
            b.follow(focus, world, 2.0);
        }
        assert!((a.pos - b.pos).length_sq() < 1e-2);
    }

    #[test]
    fn world_smaller_than_view_pins_to_origin() {
        let cam = FollowCamera::new(Vec2::new(640.0, 480.0), 0.08);
        let t = cam.target_for(Vec2::new(100.0, 100.0), Vec2::new(200.0, 200.0));
        assert_eq!(t, Vec2::ZERO);
    }

    #[test]
    fn shake_stacks_and_decays() {
        let mut s = CameraShake::new(7);
        s.add(1.5, 100.0);
        s.add(0.5, 300.0);
        assert!(s.is_active());
        s.tick(16.0);
        let o = s.offset();
        assert!(o.x.abs() <= 1.5 && o.y.abs() <= 1.5 * 0.65);
        for _ in 0..30 {
            s.tick(16.0);
        }
        assert!(!s.is_active());
        assert_eq!(s.offset(), Vec2::ZERO);
    }

    #[test]
    fn suppressed_shake_never_moves() {
        let mut s = CameraShake::new(1);
        s.add(3.0, 200.0);
        s.set_suppressed(true);
        assert!(!s.is_active());
        s.add(3.0, 200.0);
        s.tick(16.0);
        assert_eq!(s.offset(), Vec2::ZERO);
    }
}
