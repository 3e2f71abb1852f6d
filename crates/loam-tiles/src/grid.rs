use crate::table::TileTable;
use crate::types::{MAX_LIGHT, TileId, ids};

/// Fixed-size tile and light store for one world.
///
/// Storage is column-major (`idx = x * h + y`) so a column is one contiguous slice;
/// the sunlight scan walks columns top to bottom. Dimensions never change after
/// construction, and both buffers always hold exactly `w * h` cells.
#[derive(Clone, Debug)]
pub struct TileGrid {
    w: usize,
    h: usize,
    tiles: Vec<TileId>,
    light: Vec<u8>,
}

impl TileGrid {
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, ids::AIR)
    }

    pub fn filled(w: usize, h: usize, tile: TileId) -> Self {
        Self {
            w,
            h,
            tiles: vec![tile; w * h],
            light: vec![0; w * h],
        }
    }

    /// Adopt buffers produced by a world generator. Buffers of the wrong length are
    /// truncated or padded (air, dark) rather than rejected; light is clamped to `MAX_LIGHT`.
    pub fn from_parts(w: usize, h: usize, tiles: Vec<TileId>, light: Vec<u8>) -> Self {
        let expect = w * h;
        let mut tiles = tiles;
        let mut light = light;
        if tiles.len() != expect || light.len() != expect {
            log::warn!(
                "grid {}x{}: resizing tiles {} / light {} to {}",
                w,
                h,
                tiles.len(),
                light.len(),
                expect
            );
        }
        tiles.resize(expect, ids::AIR);
        light.resize(expect, 0);
        for l in light.iter_mut() {
            *l = (*l).min(MAX_LIGHT);
        }
        Self { w, h, tiles, light }
    }

    #[inline]
    pub fn w(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn h(&self) -> usize {
        self.h
    }

    /// A grid with no cells; light recomputes and edits on it are no-ops.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        x * self.h + y
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h
    }

    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if self.contains(x, y) {
            Some(self.idx(x as usize, y as usize))
        } else {
            None
        }
    }

    #[inline]
    pub fn tile(&self, x: i32, y: i32) -> Option<TileId> {
        self.index_of(x, y).map(|i| self.tiles[i])
    }

    /// Replace the tile at `(x, y)`, returning the previous id. Out of range is ignored.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: TileId) -> Option<TileId> {
        let i = self.index_of(x, y)?;
        Some(std::mem::replace(&mut self.tiles[i], tile))
    }

    #[inline]
    pub fn light(&self, x: i32, y: i32) -> Option<u8> {
        self.index_of(x, y).map(|i| self.light[i])
    }

    pub fn set_light(&mut self, x: i32, y: i32, level: u8) -> bool {
        match self.index_of(x, y) {
            Some(i) => {
                self.light[i] = level.min(MAX_LIGHT);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn is_solid(&self, table: &TileTable, x: i32, y: i32) -> bool {
        self.tile(x, y).is_some_and(|t| table.is_solid(t))
    }

    pub fn tile_column(&self, x: usize) -> Option<&[TileId]> {
        if x >= self.w {
            return None;
        }
        let start = x * self.h;
        Some(&self.tiles[start..start + self.h])
    }

    pub fn light_column(&self, x: usize) -> Option<&[u8]> {
        if x >= self.w {
            return None;
        }
        let start = x * self.h;
        Some(&self.light[start..start + self.h])
    }

    /// Split borrow of one column: tiles read-only, light writable.
    pub fn column_split_mut(&mut self, x: usize) -> Option<(&[TileId], &mut [u8])> {
        if x >= self.w {
            return None;
        }
        let start = x * self.h;
        let end = start + self.h;
        Some((&self.tiles[start..end], &mut self.light[start..end]))
    }

    #[inline]
    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    #[inline]
    pub fn light_levels(&self) -> &[u8] {
        &self.light
    }

    /// Split borrow of the whole grid, for flood fills that read tiles and raise light.
    #[inline]
    pub fn split_mut(&mut self) -> (&[TileId], &mut [u8]) {
        (&self.tiles, &mut self.light)
    }

    /// First non-air row in column `x`, scanning from the top.
    pub fn surface_y(&self, x: i32) -> Option<i32> {
        if x < 0 {
            return None;
        }
        self.tile_column(x as usize)?
            .iter()
            .position(|&t| t != ids::AIR)
            .map(|y| y as i32)
    }
}
