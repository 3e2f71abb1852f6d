use loam_geom::{Rect, Vec2};
use loam_quality::QualityTier;
use loam_runtime::{DeferredWork, Simulation};
use loam_tiles::{TileGrid, TileId, TileTable, ids};

use crate::app::InputSnapshot;
use crate::bootstrap::WorldSeed;
use crate::camera::{CameraShake, FollowCamera};
use crate::config::CoreConfig;
use crate::player::{WalkInput, Walker};

const REFERENCE_STEP_MS: f64 = 1000.0 / 60.0;
// Per-step dt used for gameplay is capped so one long step cannot teleport the walker.
const MAX_GAMEPLAY_DT_MS: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKind {
    Mined,
    Placed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileEdit {
    pub x: i32,
    pub y: i32,
    pub from: TileId,
    pub to: TileId,
    pub kind: EditKind,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MiningState {
    pub target: Option<(i32, i32)>,
    pub progress: f32,
}

/// Everything advanced by the fixed step. The frame loop owns one of these and the
/// scheduler drives it through `Simulation`.
pub struct GameState {
    pub tick: u64,
    pub sim_ms: f64,
    pub grid: TileGrid,
    pub table: TileTable,
    pub walker: Walker,
    pub camera: FollowCamera,
    pub shake: CameraShake,
    pub mining: MiningState,
    pub next_place_at_ms: f64,
    /// Fraction of the day in `[0, 1)`.
    pub time_of_day: f64,
    pub day_length_ms: f64,
    pub tile_size: f32,
    pub reach_tiles: f32,
    pub place_interval_ms: f64,
    pub low_tier_place_penalty_ms: f64,
    pub mine_speed: f32,
    /// Tier in effect for gameplay tweaks that depend on it.
    pub tier: QualityTier,
    pub input: InputSnapshot,
    pub deferred: DeferredWork,
    pub edits: Vec<TileEdit>,
}

impl GameState {
    pub fn new(seed: WorldSeed, table: TileTable, cfg: &CoreConfig, view: Vec2) -> Self {
        let ts = if cfg.world.tile_size.is_finite() && cfg.world.tile_size > 0.0 {
            cfg.world.tile_size
        } else {
            16.0
        };
        let walker = Walker::spawn_at(seed.spawn.0, seed.spawn.1, ts, &cfg.player);
        let mut gs = Self {
            tick: 0,
            sim_ms: 0.0,
            grid: seed.grid,
            table,
            walker,
            camera: FollowCamera::new(view, cfg.motion.camera_smoothing),
            shake: CameraShake::new(cfg.world.shake_seed),
            mining: MiningState::default(),
            next_place_at_ms: 0.0,
            time_of_day: 0.25,
            day_length_ms: cfg.world.day_length_ms.max(1.0),
            tile_size: ts,
            reach_tiles: cfg.interaction.reach_tiles,
            place_interval_ms: cfg.interaction.place_interval_ms.max(0.0),
            low_tier_place_penalty_ms: cfg.interaction.low_tier_place_penalty_ms.max(0.0),
            mine_speed: cfg.interaction.mine_speed.max(0.0),
            tier: QualityTier::High,
            input: InputSnapshot::default(),
            deferred: DeferredWork::new(),
            edits: Vec::new(),
        };
        gs.shake.set_suppressed(cfg.motion.reduced_motion || !cfg.motion.shake);
        let focus = gs.walker.center();
        let world = gs.world_px();
        gs.camera.snap_to(focus, world);
        gs
    }

    /// Re-read the gameplay tunables after a config reload.
    pub fn apply_config(&mut self, cfg: &CoreConfig) {
        self.camera.set_smoothing(cfg.motion.camera_smoothing);
        self.shake
            .set_suppressed(cfg.motion.reduced_motion || !cfg.motion.shake);
        self.day_length_ms = cfg.world.day_length_ms.max(1.0);
        self.reach_tiles = cfg.interaction.reach_tiles;
        self.place_interval_ms = cfg.interaction.place_interval_ms.max(0.0);
        self.low_tier_place_penalty_ms = cfg.interaction.low_tier_place_penalty_ms.max(0.0);
        self.mine_speed = cfg.interaction.mine_speed.max(0.0);
    }

    pub fn world_px(&self) -> Vec2 {
        Vec2::new(
            self.grid.w() as f32 * self.tile_size,
            self.grid.h() as f32 * self.tile_size,
        )
    }

    pub fn add_camera_shake(&mut self, amp: f32, ms: f64) {
        self.shake.add(amp, ms);
    }

    /// Tile under the aim point, with the aim given in view pixels.
    pub fn aimed_tile(&self) -> (i32, i32, Vec2) {
        let world = self.camera.pos + self.input.aim;
        let tx = (world.x / self.tile_size).floor() as i32;
        let ty = (world.y / self.tile_size).floor() as i32;
        (tx, ty, world)
    }

    fn in_reach(&self, world: Vec2) -> bool {
        let reach = self.reach_tiles * self.tile_size;
        (world - self.walker.center()).length_sq() <= reach * reach
    }

    fn place_interval(&self) -> f64 {
        match self.tier {
            QualityTier::Low => self.place_interval_ms + self.low_tier_place_penalty_ms,
            QualityTier::High => self.place_interval_ms,
        }
    }

    fn reset_mining(&mut self) {
        self.mining = MiningState::default();
    }

    fn handle_interaction(&mut self, dt_scale: f32) {
        let (tx, ty, world) = self.aimed_tile();
        let Some(tile) = self.grid.tile(tx, ty) else {
            self.reset_mining();
            return;
        };
        let in_range = self.in_reach(world);
        let input = self.input;

        if input.primary && in_range {
            let props = self.table.props(tile);
            if tile != ids::AIR && props.breakable {
                if self.mining.target != Some((tx, ty)) {
                    self.mining = MiningState {
                        target: Some((tx, ty)),
                        progress: 0.0,
                    };
                }
                self.mining.progress += self.mine_speed * dt_scale;
                if self.mining.progress >= props.hardness {
                    self.grid.set_tile(tx, ty, ids::AIR);
                    self.record_edit(tx, ty, tile, ids::AIR, EditKind::Mined);
                    self.shake.add(1.5, 100.0);
                    self.reset_mining();
                }
            }
        } else {
            self.reset_mining();
        }

        if input.secondary && in_range && !input.primary {
            self.try_place(tx, ty, tile);
        }
    }

    fn try_place(&mut self, tx: i32, ty: i32, under: TileId) {
        let Some(item) = self.input.selected else {
            return;
        };
        if item == ids::AIR || self.sim_ms < self.next_place_at_ms {
            return;
        }
        if !self.table.props(under).replaceable {
            return;
        }
        let ts = self.tile_size;
        let tile_rect = Rect::from_pos_size(Vec2::new(tx as f32 * ts, ty as f32 * ts), ts, ts);
        // flush against the body counts as inside it
        let blocked = tile_rect.touches(&self.walker.rect());
        if blocked && !self.table.props(item).passable {
            return;
        }
        self.grid.set_tile(tx, ty, item);
        self.next_place_at_ms = self.sim_ms + self.place_interval();
        self.record_edit(tx, ty, under, item, EditKind::Placed);
    }

    fn record_edit(&mut self, x: i32, y: i32, from: TileId, to: TileId, kind: EditKind) {
        self.deferred.request_light(x, y);
        self.deferred.request_minimap_refresh();
        if kind == EditKind::Placed {
            self.deferred.request_hotbar_refresh();
        }
        log::trace!(target: "edits", "{:?} ({}, {}) {} -> {}", kind, x, y, from, to);
        self.edits.push(TileEdit { x, y, from, to, kind });
    }

    /// Edits made since the last call, oldest first.
    pub fn drain_edits(&mut self) -> std::vec::Drain<'_, TileEdit> {
        self.edits.drain(..)
    }
}

impl Simulation for GameState {
    fn step(&mut self, dt_ms: f64) {
        let dt = dt_ms.clamp(0.0, MAX_GAMEPLAY_DT_MS);
        let dt_scale = (dt / REFERENCE_STEP_MS) as f32;
        self.tick += 1;
        self.sim_ms += dt;

        self.shake.tick(dt);
        let walk = WalkInput {
            left: self.input.left,
            right: self.input.right,
            jump: self.input.jump,
            sprint: self.input.sprint,
        };
        self.walker
            .update(walk, &self.grid, &self.table, self.tile_size, dt_scale);

        let focus = self.walker.center();
        let world = self.world_px();
        self.camera.follow(focus, world, dt_scale);

        self.handle_interaction(dt_scale);

        self.time_of_day += dt / self.day_length_ms;
        if self.time_of_day >= 1.0 {
            self.time_of_day = 0.0;
        }
    }

    fn camera(&self) -> Vec2 {
        self.camera.pos
    }
}
