//! Tile table and the tile/light grid store.
#![forbid(unsafe_code)]

pub mod config;
pub mod grid;
pub mod table;
pub mod types;

pub use grid::TileGrid;
pub use table::TileTable;
pub use types::{MAX_LIGHT, TileId, TileProps, ids};
