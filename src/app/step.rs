use loam_lighting::LightingEngine;
use loam_quality::QualityTier;
use loam_runtime::DeferredSink;
use loam_tiles::{TileGrid, TileTable};

use super::collab::{FrameView, InputSource, Renderer, UiHooks};
use super::state::{App, FrameReport, RunStats};

/// Flush target. Borrows the grid and engine but not the coalescer, so nothing
/// run from here can queue more work into the flush in progress.
struct FlushSink<'a, U: UiHooks> {
    grid: &'a mut TileGrid,
    table: &'a TileTable,
    engine: &'a mut LightingEngine,
    ui: &'a mut U,
    stats: &'a mut RunStats,
}

impl<U: UiHooks> DeferredSink for FlushSink<'_, U> {
    fn recompute_light(&mut self, x: i32, y: i32) {
        let r = self.engine.recompute(self.grid, self.table, x, y);
        self.stats.light_recomputes += 1;
        self.stats.light_cells_written += r.cells_written as u64;
        self.stats.truncated_fills += r.truncated_fills as u64;
    }

    fn invalidate_minimap(&mut self) {
        self.ui.invalidate_minimap();
        self.stats.minimap_flushes += 1;
    }

    fn rebuild_hotbar(&mut self) {
        self.ui.rebuild_hotbar();
        self.stats.hotbar_flushes += 1;
    }
}

impl<R: Renderer, I: InputSource, U: UiHooks> App<R, I, U> {
    /// Run one display refresh at `now_ms`. Order is fixed: steps, flush,
    /// render, quality.
    pub fn frame(&mut self, now_ms: f64) -> FrameReport {
        self.poll_config_reload();

        self.gs.input = self.input.snapshot();
        self.gs.tier = self.governor.tier();
        let timing = self.scheduler.advance(now_ms, &mut self.gs);
        self.stats.frames += 1;
        if timing.suspended {
            return FrameReport {
                timing,
                ..Default::default()
            };
        }
        self.stats.steps += u64::from(timing.steps);
        self.stats.discarded_ms += timing.discarded_ms;

        let flush = {
            let mut sink = FlushSink {
                grid: &mut self.gs.grid,
                table: &self.gs.table,
                engine: &mut self.lighting,
                ui: &mut self.ui,
                stats: &mut self.stats,
            };
            self.gs.deferred.flush(now_ms, &mut sink)
        };
        self.gs.edits.clear();

        let view = FrameView {
            camera: timing.camera + self.gs.shake.offset(),
            alpha: timing.alpha,
            scale: self.governor.scale(),
            tier: self.governor.tier(),
            grid: &self.gs.grid,
            tile_size: self.gs.tile_size,
            time_of_day: self.gs.time_of_day,
            player: self.gs.walker.center(),
        };
        self.renderer.render(&view);
        self.stats.rendered += 1;

        let mut quality = None;
        if let Some(sample) = self.meter.frame(now_ms) {
            let report = self.governor.sample(sample.fps, sample.span_ms);
            self.stats.last_fps = Some(sample.fps);
            if let Some(tier) = report.transition {
                self.on_tier_change(tier);
            }
            quality = Some(report);
        }
        self.governor.apply(&mut self.renderer);

        log::trace!(
            target: "frame",
            "dt {:.2} steps {} alpha {:.3} lights {} held {}",
            timing.dt_ms,
            timing.steps,
            timing.alpha,
            flush.lights,
            flush.lights_held
        );
        FrameReport {
            timing,
            flush,
            quality,
        }
    }

    fn on_tier_change(&mut self, tier: QualityTier) {
        self.stats.tier_transitions += 1;
        self.sync_tier_intervals();
        log::debug!(
            "tier {} intervals: light {:.0}ms minimap {:.0}ms",
            tier.as_str(),
            self.gs.deferred.light_interval_ms(),
            self.governor.effects().minimap_interval_ms
        );
    }
}
