use loam_geom::{Rect, Vec2};
use loam_tiles::{TileGrid, TileTable};

use crate::config;

/// Side-view walker with axis-aligned tile collision. Units are pixels;
/// `pos` is the top-left corner of the body.
#[derive(Clone, Debug)]
pub struct Walker {
    pub pos: Vec2,
    pub vel: Vec2,
    pub on_ground: bool,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub run_mult: f32,
    pub jump_speed: f32,
    pub gravity: f32,
    pub max_fall: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WalkInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub sprint: bool,
}

impl Walker {
    pub fn new(pos: Vec2, cfg: &config::Player) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            on_ground: false,
            width: cfg.width,
            height: cfg.height,
            speed: cfg.speed,
            run_mult: cfg.sprint_mult,
            jump_speed: cfg.jump_speed,
            gravity: cfg.gravity,
            max_fall: cfg.max_fall,
        }
    }

    /// Place the walker with its feet on the bottom edge of tile `(tx, ty)`.
    pub fn spawn_at(tx: i32, ty: i32, tile_size: f32, cfg: &config::Player) -> Self {
        let x = tx as f32 * tile_size + (tile_size - cfg.width) * 0.5;
        let y = (ty + 1) as f32 * tile_size - cfg.height;
        Self::new(Vec2::new(x, y.max(0.0)), cfg)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    fn collides_at(&self, grid: &TileGrid, table: &TileTable, ts: f32, pos: Vec2) -> bool {
        let min_x = (pos.x / ts).floor() as i32;
        let max_x = ((pos.x + self.width - 0.001) / ts).floor() as i32;
        let min_y = (pos.y / ts).floor() as i32;
        let max_y = ((pos.y + self.height - 0.001) / ts).floor() as i32;
        for x in min_x..=max_x {
            for y in min_y..=max_y {
                // world edges are walls
                if !grid.contains(x, y) || grid.is_solid(table, x, y) {
                    return true;
                }
            }
        }
        false
    }

    fn move_axis(&mut self, grid: &TileGrid, table: &TileTable, ts: f32, axis: usize, amt: f32) -> f32 {
        if amt == 0.0 {
            return 0.0;
        }
        let step_res = ts * 0.25;
        let step = step_res * amt.signum();
        let mut moved = 0.0_f32;
        let mut remaining = amt;
        while remaining.abs() > 0.0001 {
            let s = if remaining.abs() < step.abs() { remaining } else { step };
            let mut p = self.pos;
            match axis {
                0 => p.x += s,
                _ => p.y += s,
            }
            if self.collides_at(grid, table, ts, p) {
                break;
            }
            self.pos = p;
            moved += s;
            remaining -= s;
        }
        moved
    }

    /// Advance by one fixed step. `dt_scale` is the step length relative to 16.67ms.
    pub fn update(&mut self, input: WalkInput, grid: &TileGrid, table: &TileTable, ts: f32, dt_scale: f32) {
        let mut wish = 0.0;
        if input.left {
            wish -= 1.0;
        }
        if input.right {
            wish += 1.0;
        }
        let run = if input.sprint { self.run_mult } else { 1.0 };
        self.vel.x = wish * self.speed * run;

        let below = Vec2::new(self.pos.x, self.pos.y + 0.5);
        self.on_ground = self.collides_at(grid, table, ts, below);
        if self.on_ground {
            if self.vel.y > 0.0 {
                self.vel.y = 0.0;
            }
            if input.jump {
                self.vel.y = -self.jump_speed;
                self.on_ground = false;
            }
        } else {
            self.vel.y = (self.vel.y + self.gravity * dt_scale).min(self.max_fall);
        }

        let dx = self.vel.x * dt_scale;
        let dy = self.vel.y * dt_scale;
        self.move_axis(grid, table, ts, 0, dx);
        let moved_y = self.move_axis(grid, table, ts, 1, dy);
        if moved_y.abs() < dy.abs() * 0.5 {
            if dy > 0.0 {
                self.on_ground = true;
            }
            self.vel.y = 0.0;
        }
    }
}
