use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use loam_geom::Vec2;
use loam_lighting::LightingEngine;
use loam_quality::{FpsMeter, QualityGovernor, QualityReport};
use loam_runtime::{FixedStepScheduler, FlushReport, FrameTiming};
use loam_tiles::TileTable;

use super::collab::{InputSource, Renderer, UiHooks};
use crate::bootstrap::WorldSeed;
use crate::config::CoreConfig;
use crate::gamestate::GameState;

/// The per-frame pipeline: input, fixed steps, deferred flush, render, quality.
pub struct App<R, I, U> {
    pub gs: GameState,
    pub scheduler: FixedStepScheduler,
    pub lighting: LightingEngine,
    pub governor: QualityGovernor,
    pub meter: FpsMeter,
    pub renderer: R,
    pub input: I,
    pub ui: U,
    pub config: CoreConfig,
    pub stats: RunStats,
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) config_rx: Option<Receiver<()>>,
}

/// Totals over the life of the app.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunStats {
    pub frames: u64,
    pub rendered: u64,
    pub steps: u64,
    pub discarded_ms: f64,
    pub light_recomputes: u64,
    pub light_cells_written: u64,
    pub truncated_fills: u64,
    pub minimap_flushes: u64,
    pub hotbar_flushes: u64,
    pub tier_transitions: u32,
    pub config_reloads: u32,
    pub config_rejects: u32,
    pub last_fps: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub timing: FrameTiming,
    pub flush: FlushReport,
    pub quality: Option<QualityReport>,
}

impl<R: Renderer, I: InputSource, U: UiHooks> App<R, I, U> {
    pub fn new(
        seed: WorldSeed,
        table: TileTable,
        config: CoreConfig,
        view: Vec2,
        renderer: R,
        input: I,
        ui: U,
    ) -> Self {
        let gs = GameState::new(seed, table, &config, view);
        let mut governor = QualityGovernor::new(config.governor());
        governor.set_reduced_motion(config.motion.reduced_motion);
        let mut app = Self {
            gs,
            scheduler: FixedStepScheduler::new(config.fixed_step()),
            lighting: LightingEngine::new(config.lighting_params()),
            governor,
            meter: FpsMeter::new(config.quality.window_ms),
            renderer,
            input,
            ui,
            config,
            stats: RunStats::default(),
            config_path: None,
            config_rx: None,
        };
        app.sync_tier_intervals();
        app.governor.apply(&mut app.renderer);
        log::info!(
            "app ready: {}x{} tiles, step {:.3}ms, tier {}",
            app.gs.grid.w(),
            app.gs.grid.h(),
            app.scheduler.config().step_ms,
            app.governor.tier().as_str()
        );
        app
    }

    /// Push the current tier's flush intervals to the coalescer and the UI.
    /// A light interval pinned in the config wins over the tier's.
    pub(crate) fn sync_tier_intervals(&mut self) {
        let effects = self.governor.effects();
        let light = self
            .config
            .deferred
            .light_interval_ms
            .unwrap_or(effects.light_flush_interval_ms);
        self.gs.deferred.set_light_interval_ms(light);
        self.ui.set_minimap_interval_ms(effects.minimap_interval_ms);
        self.gs.tier = self.governor.tier();
    }

    /// Visibility changes stop or resume the scheduler. Measurement restarts on
    /// either edge so hidden time never reaches the governor.
    pub fn set_visible(&mut self, visible: bool) {
        self.scheduler.set_visible(visible);
        self.meter.reset();
        self.governor.reset_streaks();
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.scheduler.set_paused(paused);
    }

    /// Apply a new configuration. Tier, world and accumulated time are kept.
    pub fn apply_config(&mut self, config: CoreConfig) {
        self.scheduler.set_config(config.fixed_step());
        self.lighting.set_params(config.lighting_params());
        self.governor.set_config(config.governor());
        self.governor.set_reduced_motion(config.motion.reduced_motion);
        if config.quality.window_ms != self.config.quality.window_ms {
            self.meter = FpsMeter::new(config.quality.window_ms);
        }
        self.gs.apply_config(&config);
        self.config = config;
        self.sync_tier_intervals();
    }
}
