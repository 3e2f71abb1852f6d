//! Tile lighting: per-column sunlight scan plus point-light flood fill.
#![forbid(unsafe_code)]

use loam_tiles::{MAX_LIGHT, TileGrid, TileTable};

mod queue;
mod stamps;

pub use queue::SpreadQueue;
pub use stamps::VisitStamps;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightingParams {
    /// Half-extent of the box recomputed around an edit.
    pub radius: i32,
    /// A fill stops once its queue holds more than this many entries.
    pub queue_cap: usize,
}

impl Default for LightingParams {
    fn default() -> Self {
        Self {
            radius: 14,
            queue_cap: 12_000,
        }
    }
}

/// Inclusive cell rectangle, always inside the grid it was built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl Region {
    /// The box `[cx-r, cx+r] x [cy-r, cy+r]` clamped to the grid, or `None` if nothing is left.
    pub fn around(grid: &TileGrid, cx: i32, cy: i32, r: i32) -> Option<Region> {
        if grid.is_empty() {
            return None;
        }
        let r = i64::from(r.max(0));
        let (w, h) = (grid.w() as i64, grid.h() as i64);
        let x0 = (i64::from(cx) - r).max(0);
        let y0 = (i64::from(cy) - r).max(0);
        let x1 = (i64::from(cx) + r).min(w - 1);
        let y1 = (i64::from(cy) + r).min(h - 1);
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some(Region {
            x0: x0 as usize,
            y0: y0 as usize,
            x1: x1 as usize,
            y1: y1 as usize,
        })
    }

    pub fn whole(grid: &TileGrid) -> Option<Region> {
        if grid.is_empty() {
            return None;
        }
        Some(Region {
            x0: 0,
            y0: 0,
            x1: grid.w() - 1,
            y1: grid.h() - 1,
        })
    }

    pub fn cells(&self) -> usize {
        (self.x1 - self.x0 + 1) * (self.y1 - self.y0 + 1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LightSource {
    pub x: i32,
    pub y: i32,
    pub level: u8,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpreadStats {
    pub visited: usize,
    pub raised: usize,
    /// Peak queue length (entries pushed) during the fill.
    pub queued: usize,
    pub truncated: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecomputeStats {
    pub region: Option<Region>,
    pub cells_written: usize,
    pub sources: usize,
    pub visited: usize,
    pub raised: usize,
    pub truncated_fills: usize,
}

/// Owns the scratch buffers reused across recomputes: visit stamps, the fill
/// queue and the source list. Not reentrant; one engine per grid.
#[derive(Debug, Default)]
pub struct LightingEngine {
    params: LightingParams,
    stamps: VisitStamps,
    queue: SpreadQueue,
    sources: SpreadQueue,
}

impl LightingEngine {
    pub fn new(params: LightingParams) -> Self {
        Self {
            params,
            stamps: VisitStamps::new(),
            queue: SpreadQueue::new(),
            sources: SpreadQueue::new(),
        }
    }

    pub fn params(&self) -> LightingParams {
        self.params
    }

    pub fn set_params(&mut self, params: LightingParams) {
        self.params = params;
    }

    /// Recompute light in the box around `(cx, cy)` after an edit there.
    pub fn recompute(
        &mut self,
        grid: &mut TileGrid,
        table: &TileTable,
        cx: i32,
        cy: i32,
    ) -> RecomputeStats {
        let region = Region::around(grid, cx, cy, self.params.radius);
        self.recompute_region(grid, table, region)
    }

    /// Light the whole grid from scratch. Used after bulk loads.
    pub fn recompute_all(&mut self, grid: &mut TileGrid, table: &TileTable) -> RecomputeStats {
        let region = Region::whole(grid);
        self.recompute_region(grid, table, region)
    }

    fn recompute_region(
        &mut self,
        grid: &mut TileGrid,
        table: &TileTable,
        region: Option<Region>,
    ) -> RecomputeStats {
        let mut stats = RecomputeStats {
            region,
            ..Default::default()
        };
        let Some(region) = region else {
            self.sources.clear();
            return stats;
        };
        stats.cells_written = self.scan_sunlight(grid, table, region);
        self.collect_border_sources(grid, table, region);
        stats.sources = self.sources.len();

        // spread() never touches the source list; take it to free the borrow on self
        let sources = std::mem::take(&mut self.sources);
        for (x, y, level) in sources.iter() {
            let s = self.spread(grid, table, x, y, level);
            stats.visited += s.visited;
            stats.raised += s.raised;
            if s.truncated {
                stats.truncated_fills += 1;
            }
        }
        self.sources = sources;

        log::trace!(
            target: "lighting",
            "recompute {:?}: wrote={} sources={} visited={} raised={}",
            region,
            stats.cells_written,
            stats.sources,
            stats.visited,
            stats.raised
        );
        stats
    }

    /// Overwrite every cell of `region` with `max(sun, emission)` and collect emitting
    /// cells as sources, x outer and y ascending. Sunlight is accumulated from row 0 so
    /// cover above the box still dims it. Returns cells written.
    pub fn scan_sunlight(&mut self, grid: &mut TileGrid, table: &TileTable, region: Region) -> usize {
        self.sources.clear();
        let mut written = 0;
        for x in region.x0..=region.x1 {
            let Some((tiles, light)) = grid.column_split_mut(x) else {
                continue;
            };
            let bottom = region.y1.min(tiles.len().saturating_sub(1));
            let mut sun = MAX_LIGHT;
            for y in 0..=bottom {
                let id = tiles[y];
                sun = sun.saturating_sub(table.sun_decay(id));
                if y < region.y0 {
                    continue;
                }
                let emission = table.emission(id);
                light[y] = sun.max(emission);
                written += 1;
                if emission > 0 {
                    self.sources.push(x as i32, y as i32, emission);
                }
            }
        }
        written
    }

    /// Emitters close enough outside `region` to reach into it. Their own light is
    /// left alone; they are only re-spread so the reset box gets their contribution back.
    fn collect_border_sources(&mut self, grid: &TileGrid, table: &TileTable, region: Region) {
        let reach = usize::from(MAX_LIGHT);
        let bx0 = region.x0.saturating_sub(reach);
        let by0 = region.y0.saturating_sub(reach);
        let bx1 = (region.x1 + reach).min(grid.w().saturating_sub(1));
        let by1 = (region.y1 + reach).min(grid.h().saturating_sub(1));
        for x in bx0..=bx1 {
            let Some(tiles) = grid.tile_column(x) else {
                continue;
            };
            let inside_x = (region.x0..=region.x1).contains(&x);
            for y in by0..=by1.min(tiles.len().saturating_sub(1)) {
                if inside_x && (region.y0..=region.y1).contains(&y) {
                    continue;
                }
                let emission = table.emission(tiles[y]);
                if emission > 0 {
                    self.sources.push(x as i32, y as i32, emission);
                }
            }
        }
    }

    /// Sources spread by the last recompute (or found by the last bare sunlight scan),
    /// box emitters first in scan order, then emitters bordering the box.
    pub fn sources(&self) -> impl Iterator<Item = LightSource> + '_ {
        self.sources
            .iter()
            .map(|(x, y, level)| LightSource { x, y, level })
    }

    /// Breadth-first fill from one source. Each cell is entered at most once per fill
    /// and only ever raised. Light drops by 2 leaving a solid tile, 1 otherwise.
    pub fn spread(
        &mut self,
        grid: &mut TileGrid,
        table: &TileTable,
        x: i32,
        y: i32,
        level: u8,
    ) -> SpreadStats {
        let mut stats = SpreadStats::default();
        let level = level.min(MAX_LIGHT);
        if grid.is_empty() || level == 0 {
            return stats;
        }
        let (w, h) = (grid.w(), grid.h());
        let cap = self.params.queue_cap;
        self.stamps.ensure_len(grid.len());
        self.stamps.next_mark();
        self.queue.clear();
        self.queue.push(x, y, level);

        let (tiles, light) = grid.split_mut();
        while let Some((qx, qy, l)) = self.queue.pop() {
            if l == 0 || qx < 0 || qy < 0 || qx as usize >= w || qy as usize >= h {
                continue;
            }
            let i = qx as usize * h + qy as usize;
            if !self.stamps.visit(i) {
                continue;
            }
            stats.visited += 1;
            if l > light[i] {
                light[i] = l;
                stats.raised += 1;
            }
            let loss = if table.is_solid(tiles[i]) { 2 } else { 1 };
            let next = l.saturating_sub(loss);
            if next > 0 {
                self.queue.push(qx - 1, qy, next);
                self.queue.push(qx + 1, qy, next);
                self.queue.push(qx, qy - 1, next);
                self.queue.push(qx, qy + 1, next);
            }
            if self.queue.len() > cap {
                stats.truncated = true;
                log::debug!(
                    target: "lighting",
                    "fill from ({}, {}) level {} truncated at {} queued",
                    x,
                    y,
                    level,
                    self.queue.len()
                );
                break;
            }
        }
        stats.queued = self.queue.len();
        stats
    }
}
