use loam_geom::Vec2;
use loam_quality::{QualityTarget, QualityTier, TierEffects};
use loam_tiles::{TileGrid, TileId, ids};

/// What the renderer gets each frame. The grid is read-only here.
pub struct FrameView<'a> {
    /// Interpolated camera origin with shake already added.
    pub camera: Vec2,
    pub alpha: f64,
    pub scale: f32,
    pub tier: QualityTier,
    pub grid: &'a TileGrid,
    pub tile_size: f32,
    pub time_of_day: f64,
    pub player: Vec2,
}

pub trait Renderer: QualityTarget {
    fn render(&mut self, view: &FrameView<'_>);
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub sprint: bool,
    /// Pointer position in view pixels.
    pub aim: Vec2,
    pub primary: bool,
    pub secondary: bool,
    pub selected: Option<TileId>,
}

pub trait InputSource {
    fn snapshot(&mut self) -> InputSnapshot;
}

/// UI refreshes, reached only through the deferred-work flush.
pub trait UiHooks {
    fn invalidate_minimap(&mut self);
    fn rebuild_hotbar(&mut self);
    fn set_minimap_interval_ms(&mut self, _ms: f64) {}
}

/// Renderer that draws nothing and remembers what it was told.
#[derive(Clone, Debug, Default)]
pub struct HeadlessRenderer {
    pub frames: u64,
    pub scale: f32,
    pub tier: Option<QualityTier>,
    pub effects: Option<TierEffects>,
    pub tier_applies: u32,
    pub scale_applies: u32,
    pub last_camera: Vec2,
    pub last_time_of_day: f64,
}

impl QualityTarget for HeadlessRenderer {
    fn set_resolution_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.scale_applies += 1;
    }

    fn apply_tier(&mut self, tier: QualityTier, effects: &TierEffects) {
        self.tier = Some(tier);
        self.effects = Some(*effects);
        self.tier_applies += 1;
    }
}

impl Renderer for HeadlessRenderer {
    fn render(&mut self, view: &FrameView<'_>) {
        self.frames += 1;
        self.last_camera = view.camera;
        self.last_time_of_day = view.time_of_day;
        log::trace!(
            target: "render",
            "frame {} cam ({:.1}, {:.1}) alpha {:.3} scale {:.3}",
            self.frames,
            view.camera.x,
            view.camera.y,
            view.alpha,
            view.scale
        );
    }
}

#[derive(Clone, Debug, Default)]
pub struct HeadlessUi {
    pub minimap_invalidations: u32,
    pub hotbar_rebuilds: u32,
    pub minimap_interval_ms: f64,
}

impl UiHooks for HeadlessUi {
    fn invalidate_minimap(&mut self) {
        self.minimap_invalidations += 1;
    }

    fn rebuild_hotbar(&mut self) {
        self.hotbar_rebuilds += 1;
    }

    fn set_minimap_interval_ms(&mut self, ms: f64) {
        self.minimap_interval_ms = ms;
    }
}

/// Fixed input, same snapshot every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedInput(pub InputSnapshot);

impl InputSource for FixedInput {
    fn snapshot(&mut self) -> InputSnapshot {
        self.0
    }
}

/// Walks back and forth, digging below and to the side and dropping torches.
/// Used by the soak harness to keep edits flowing.
#[derive(Clone, Debug)]
pub struct WanderInput {
    frame: u64,
    period: u64,
    view: Vec2,
    tile_size: f32,
}

impl WanderInput {
    pub fn new(view: Vec2, tile_size: f32) -> Self {
        Self {
            frame: 0,
            period: 240,
            view,
            tile_size,
        }
    }
}

impl InputSource for WanderInput {
    fn snapshot(&mut self) -> InputSnapshot {
        let f = self.frame;
        self.frame += 1;
        let phase = f % self.period;
        let going_right = (f / self.period) % 2 == 0;
        let center = self.view * 0.5;
        let side = if going_right { 1.5 } else { -1.5 };
        // dig straight down, then walk, then drop a torch beside the walker
        let digging = phase < 180;
        let walking = (180..210).contains(&phase);
        let aim = if digging {
            center + Vec2::new(0.0, self.tile_size * 1.5)
        } else {
            center + Vec2::new(side * self.tile_size, 0.0)
        };
        InputSnapshot {
            left: walking && !going_right,
            right: walking && going_right,
            jump: phase == 180,
            sprint: walking,
            aim,
            primary: digging,
            secondary: phase >= 210,
            selected: Some(ids::TORCH),
        }
    }
}
