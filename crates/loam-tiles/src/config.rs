use serde::Deserialize;

use crate::types::TileId;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TilesConfig {
    #[serde(default)]
    pub tiles: Vec<TileDef>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TileDef {
    pub name: String,
    /// Explicit id; definitions without one take the next free slot.
    pub id: Option<TileId>,
    pub solid: Option<bool>,
    pub sun_decay: Option<u8>,
    pub emission: Option<u8>,
    pub hardness: Option<f32>,
    pub breakable: Option<bool>,
    pub replaceable: Option<bool>,
    pub passable: Option<bool>,
}

impl TileDef {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: None,
            solid: None,
            sun_decay: None,
            emission: None,
            hardness: None,
            breakable: None,
            replaceable: None,
            passable: None,
        }
    }
}

// Solid tiles dim the sky this much per row unless the definition says otherwise.
pub(crate) const DEFAULT_SOLID_SUN_DECAY: u8 = 3;
