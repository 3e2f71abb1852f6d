use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    #[default]
    High,
    Low,
}

impl QualityTier {
    pub fn as_str(self) -> &'static str {
        match self {
            QualityTier::High => "high",
            QualityTier::Low => "low",
        }
    }
}

/// Everything a tier switches. Applied as a whole, never as a diff against the previous tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierEffects {
    pub particle_budget: u32,
    pub glow: bool,
    /// Upper bound on the continuous resolution target while in this tier.
    pub resolution_ceiling: f32,
    /// Scale set on entering the tier.
    pub entry_scale: f32,
    pub ambient_opacity: f32,
    pub low_power: bool,
    pub light_flush_interval_ms: f64,
    pub minimap_interval_ms: f64,
}

impl TierEffects {
    pub const fn for_tier(tier: QualityTier) -> TierEffects {
        match tier {
            QualityTier::High => TierEffects {
                particle_budget: 400,
                glow: true,
                resolution_ceiling: 1.0,
                entry_scale: 1.0,
                ambient_opacity: 1.0,
                low_power: false,
                light_flush_interval_ms: 0.0,
                minimap_interval_ms: 120.0,
            },
            QualityTier::Low => TierEffects {
                particle_budget: 220,
                glow: false,
                resolution_ceiling: 0.90,
                entry_scale: 0.85,
                ambient_opacity: 0.7,
                low_power: true,
                light_flush_interval_ms: 50.0,
                minimap_interval_ms: 240.0,
            },
        }
    }
}

/// Consumer of governor output, normally the renderer.
pub trait QualityTarget {
    fn set_resolution_scale(&mut self, scale: f32);
    fn apply_tier(&mut self, tier: QualityTier, effects: &TierEffects);
}
