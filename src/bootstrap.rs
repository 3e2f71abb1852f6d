use loam_lighting::{LightingEngine, LightingParams};
use loam_tiles::{TileGrid, TileTable, ids};

/// A generated world handed to the core: tiles with a fully lit field, plus the spawn tile.
#[derive(Clone, Debug)]
pub struct WorldSeed {
    pub grid: TileGrid,
    pub spawn: (i32, i32),
}

/// Gently rolling layered terrain with a torch-lit tunnel. Stands in for a real
/// generator in headless runs and tests.
pub fn layered(w: usize, h: usize, table: &TileTable) -> WorldSeed {
    let mut grid = TileGrid::new(w, h);
    if grid.is_empty() {
        return WorldSeed { grid, spawn: (0, 0) };
    }
    let hi = h as i32;
    let base = hi / 3;
    let tunnel_y = (hi * 2 / 3).min(hi - 3);

    for x in 0..w as i32 {
        let wave = ((x as f32) * 0.15).sin() * 3.0 + ((x as f32) * 0.04).cos() * 2.0;
        let surface = (base + wave.round() as i32).max(1).min(hi - 1);
        for y in surface..hi {
            let tile = if y == hi - 1 {
                ids::BEDROCK
            } else if y == surface {
                ids::GRASS
            } else if y < surface + 4 {
                ids::DIRT
            } else {
                ids::STONE
            };
            grid.set_tile(x, y, tile);
        }
        if tunnel_y > surface + 4 {
            grid.set_tile(x, tunnel_y, ids::AIR);
            grid.set_tile(x, tunnel_y - 1, ids::AIR);
            if x % 20 == 10 {
                grid.set_tile(x, tunnel_y, ids::TORCH);
            }
        }
    }

    let mut engine = LightingEngine::new(LightingParams::default());
    engine.recompute_all(&mut grid, table);

    let sx = (w / 2) as i32;
    let sy = grid.surface_y(sx).map_or(0, |y| y - 2).max(0);
    log::debug!("layered world {}x{} spawn ({}, {})", w, h, sx, sy);
    WorldSeed {
        grid,
        spawn: (sx, sy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layered_world_is_lit_and_has_ground_under_spawn() {
        let table = TileTable::builtin();
        let seed = layered(120, 60, &table);
        let (sx, sy) = seed.spawn;
        assert_eq!(seed.grid.tile(sx, sy), Some(ids::AIR));
        let ground = seed.grid.surface_y(sx).unwrap();
        assert!(ground > sy);
        assert_eq!(seed.grid.light(sx, 0), Some(loam_tiles::MAX_LIGHT));
        assert_eq!(seed.grid.tile(3, 59), Some(ids::BEDROCK));
        // torches in the tunnel light their surroundings
        assert_eq!(seed.grid.light(10, 40), Some(14));
        assert_eq!(seed.grid.light(11, 40), Some(13));
    }

    #[test]
    fn degenerate_sizes_do_not_panic() {
        let table = TileTable::builtin();
        assert!(layered(0, 10, &table).grid.is_empty());
        let tiny = layered(2, 2, &table);
        assert_eq!(tiny.grid.len(), 4);
        assert_eq!(layered(3, 1, &table).grid.len(), 3);
    }
}
