pub type TileId = u16;

/// Brightest light level a cell can hold. Sunlight starts here at the top of every column.
pub const MAX_LIGHT: u8 = 15;

#[derive(Clone, Debug, PartialEq)]
pub struct TileProps {
    pub id: TileId,
    pub name: String,
    /// Occupies its cell for movement and halves flood-fill reach through it.
    pub solid: bool,
    /// Sunlight lost when the column scan passes this tile.
    pub sun_decay: u8,
    /// Block light emitted by the tile itself, `0..=MAX_LIGHT`.
    pub emission: u8,
    pub hardness: f32,
    pub breakable: bool,
    /// Placement may overwrite this tile (air, liquids).
    pub replaceable: bool,
    /// May be placed overlapping the player.
    pub passable: bool,
}

impl TileProps {
    /// Properties of an id the table does not know about: behaves like air.
    pub const INERT: TileProps = TileProps {
        id: 0,
        name: String::new(),
        solid: false,
        sun_decay: 0,
        emission: 0,
        hardness: 0.0,
        breakable: false,
        replaceable: true,
        passable: true,
    };
}

/// Ids of the built-in table (`TileTable::builtin`).
pub mod ids {
    use super::TileId;

    pub const AIR: TileId = 0;
    pub const DIRT: TileId = 1;
    pub const GRASS: TileId = 2;
    pub const STONE: TileId = 3;
    pub const SAND: TileId = 4;
    pub const WOOD: TileId = 5;
    pub const LEAVES: TileId = 6;
    pub const GLASS: TileId = 7;
    pub const WATER: TileId = 8;
    pub const TORCH: TileId = 9;
    pub const LANTERN: TileId = 10;
    pub const GLOWSTONE: TileId = 11;
    pub const BEDROCK: TileId = 12;
}
