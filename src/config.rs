use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use loam_lighting::LightingParams;
use loam_quality::GovernorConfig;
use loam_runtime::FixedStepConfig;

/// Tunables for the frame pipeline, read from a TOML file. Every section and
/// field is optional; missing values take the defaults below.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct CoreConfig {
    #[serde(default)]
    pub timing: Timing,
    #[serde(default)]
    pub lighting: Lighting,
    #[serde(default)]
    pub deferred: Deferred,
    #[serde(default)]
    pub quality: Quality,
    #[serde(default)]
    pub motion: Motion,
    #[serde(default)]
    pub interaction: Interaction,
    #[serde(default)]
    pub player: Player,
    #[serde(default)]
    pub world: World,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Timing {
    pub step_ms: f64,
    pub max_sub_steps: u32,
    pub max_frame_delta_ms: f64,
}

impl Default for Timing {
    fn default() -> Self {
        let d = FixedStepConfig::default();
        Self {
            step_ms: d.step_ms,
            max_sub_steps: d.max_sub_steps,
            max_frame_delta_ms: d.max_frame_delta_ms,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Lighting {
    pub radius: i32,
    pub queue_cap: usize,
}

impl Default for Lighting {
    fn default() -> Self {
        let d = LightingParams::default();
        Self {
            radius: d.radius,
            queue_cap: d.queue_cap,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Deferred {
    /// Pins the light flush interval; unset follows the quality tier.
    pub light_interval_ms: Option<f64>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Quality {
    pub window_ms: f64,
    #[serde(flatten)]
    pub governor: GovernorConfig,
}

impl Default for Quality {
    fn default() -> Self {
        Self {
            window_ms: 500.0,
            governor: GovernorConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Motion {
    pub reduced_motion: bool,
    /// Per-16.67ms fraction of the distance the camera closes toward its target.
    pub camera_smoothing: f32,
    pub shake: bool,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            camera_smoothing: 0.08,
            shake: true,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Interaction {
    pub reach_tiles: f32,
    pub place_interval_ms: f64,
    /// Added to the place interval while the quality tier is Low.
    pub low_tier_place_penalty_ms: f64,
    /// Mining progress per 16.67ms of held input; a tile breaks when progress reaches its hardness.
    pub mine_speed: f32,
}

impl Default for Interaction {
    fn default() -> Self {
        Self {
            reach_tiles: 6.0,
            place_interval_ms: 80.0,
            low_tier_place_penalty_ms: 30.0,
            mine_speed: 0.4 * 0.02,
        }
    }
}

/// Player movement in pixels, per 16.67ms of simulation.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Player {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub sprint_mult: f32,
    pub gravity: f32,
    pub jump_speed: f32,
    pub max_fall: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            width: 12.0,
            height: 28.0,
            speed: 3.0,
            sprint_mult: 1.5,
            gravity: 0.45,
            jump_speed: 8.5,
            max_fall: 15.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct World {
    pub tile_size: f32,
    pub day_length_ms: f64,
    /// Optional tile table TOML; the built-in table is used when unset.
    pub tiles: Option<PathBuf>,
    pub shake_seed: u64,
}

impl Default for World {
    fn default() -> Self {
        Self {
            tile_size: 16.0,
            day_length_ms: 120_000.0,
            tiles: None,
            shake_seed: 0x5EED_0F_10A4,
        }
    }
}

impl CoreConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: CoreConfig = toml::from_str(s)?;
        Ok(cfg)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn fixed_step(&self) -> FixedStepConfig {
        FixedStepConfig {
            step_ms: self.timing.step_ms,
            max_sub_steps: self.timing.max_sub_steps,
            max_frame_delta_ms: self.timing.max_frame_delta_ms,
        }
        .sanitized()
    }

    pub fn lighting_params(&self) -> LightingParams {
        LightingParams {
            radius: self.lighting.radius.max(0),
            queue_cap: self.lighting.queue_cap.max(1),
        }
    }

    pub fn governor(&self) -> GovernorConfig {
        self.quality.governor.clone().sanitized()
    }
}
