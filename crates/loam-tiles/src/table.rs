use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::{DEFAULT_SOLID_SUN_DECAY, TileDef, TilesConfig};
use super::types::{MAX_LIGHT, TileId, TileProps, ids};

static INERT: TileProps = TileProps::INERT;

/// Per-id tile properties. Hot lighting lookups (`solid`, `sun_decay`, `emission`)
/// are kept in flat parallel vectors indexed by id.
#[derive(Clone, Debug, Default)]
pub struct TileTable {
    props: Vec<Option<TileProps>>,
    solid: Vec<bool>,
    sun_decay: Vec<u8>,
    emission: Vec<u8>,
    by_name: HashMap<String, TileId>,
}

impl TileTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: TilesConfig = toml::from_str(toml_str)?;
        Ok(Self::from_config(cfg))
    }

    pub fn from_config(cfg: TilesConfig) -> Self {
        let mut table = TileTable::new();
        for def in cfg.tiles {
            table.insert_def(def);
        }
        table
    }

    fn insert_def(&mut self, def: TileDef) {
        let id = def.id.unwrap_or(self.props.len() as TileId);
        let solid = def.solid.unwrap_or(true);
        let decay_default = if solid { DEFAULT_SOLID_SUN_DECAY } else { 0 };
        let props = TileProps {
            id,
            solid,
            sun_decay: def.sun_decay.unwrap_or(decay_default).min(MAX_LIGHT),
            emission: def.emission.unwrap_or(0).min(MAX_LIGHT),
            hardness: def.hardness.filter(|h| h.is_finite()).unwrap_or(1.0).max(0.0),
            breakable: def.breakable.unwrap_or(true),
            replaceable: def.replaceable.unwrap_or(false),
            passable: def.passable.unwrap_or(!solid),
            name: def.name,
        };
        let slot = id as usize;
        if slot >= self.props.len() {
            self.props.resize(slot + 1, None);
            self.solid.resize(slot + 1, false);
            self.sun_decay.resize(slot + 1, 0);
            self.emission.resize(slot + 1, 0);
        }
        if let Some(prev) = &self.props[slot] {
            log::warn!(
                "tile id {} redefined: '{}' replaces '{}'",
                id,
                props.name,
                prev.name
            );
            self.by_name.remove(&prev.name);
        }
        self.solid[slot] = props.solid;
        self.sun_decay[slot] = props.sun_decay;
        self.emission[slot] = props.emission;
        self.by_name.insert(props.name.clone(), id);
        self.props[slot] = Some(props);
    }

    /// The default tile set used when no table file is configured.
    pub fn builtin() -> Self {
        #[allow(clippy::too_many_arguments)]
        fn def(
            id: TileId,
            name: &str,
            solid: bool,
            sun_decay: u8,
            emission: u8,
            hardness: f32,
            breakable: bool,
            replaceable: bool,
        ) -> TileDef {
            TileDef {
                id: Some(id),
                solid: Some(solid),
                sun_decay: Some(sun_decay),
                emission: Some(emission),
                hardness: Some(hardness),
                breakable: Some(breakable),
                replaceable: Some(replaceable),
                passable: None,
                ..TileDef::named(name)
            }
        }
        Self::from_config(TilesConfig {
            tiles: vec![
                def(ids::AIR, "air", false, 0, 0, 0.0, false, true),
                def(ids::DIRT, "dirt", true, 3, 0, 1.0, true, false),
                def(ids::GRASS, "grass", true, 3, 0, 1.0, true, false),
                def(ids::STONE, "stone", true, 3, 0, 3.0, true, false),
                def(ids::SAND, "sand", true, 3, 0, 0.8, true, false),
                def(ids::WOOD, "wood", true, 3, 0, 2.0, true, false),
                def(ids::LEAVES, "leaves", false, 1, 0, 0.3, true, false),
                def(ids::GLASS, "glass", true, 0, 0, 0.5, true, false),
                def(ids::WATER, "water", false, 2, 0, 0.0, false, true),
                def(ids::TORCH, "torch", false, 0, 14, 0.2, true, false),
                def(ids::LANTERN, "lantern", false, 0, 12, 0.5, true, false),
                def(ids::GLOWSTONE, "glowstone", true, 3, 15, 1.5, true, false),
                def(ids::BEDROCK, "bedrock", true, 15, 0, 10.0, false, false),
            ],
        })
    }

    #[inline]
    pub fn get(&self, id: TileId) -> Option<&TileProps> {
        self.props.get(id as usize).and_then(Option::as_ref)
    }

    /// Like `get`, but unknown ids resolve to inert air-like properties.
    #[inline]
    pub fn props(&self, id: TileId) -> &TileProps {
        self.get(id).unwrap_or(&INERT)
    }

    pub fn id_by_name(&self, name: &str) -> Option<TileId> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn is_solid(&self, id: TileId) -> bool {
        self.solid.get(id as usize).copied().unwrap_or(false)
    }

    #[inline]
    pub fn sun_decay(&self, id: TileId) -> u8 {
        self.sun_decay.get(id as usize).copied().unwrap_or(0)
    }

    #[inline]
    pub fn emission(&self, id: TileId) -> u8 {
        self.emission.get(id as usize).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
