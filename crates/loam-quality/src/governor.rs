use serde::Deserialize;

use crate::tier::{QualityTarget, QualityTier, TierEffects};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GovernorConfig {
    pub auto: bool,
    pub low_fps: f64,
    pub high_fps: f64,
    /// Low streak needed to drop from High to Low.
    pub downgrade_after_ms: f64,
    /// High streak needed to return from Low to High.
    pub upgrade_after_ms: f64,
    /// Fraction of the gap to the resolution target closed per sample.
    pub scale_blend: f32,
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            auto: true,
            low_fps: 45.0,
            high_fps: 56.0,
            downgrade_after_ms: 2000.0,
            upgrade_after_ms: 3000.0,
            scale_blend: 0.35,
            min_scale: 0.72,
            max_scale: 1.0,
        }
    }
}

impl GovernorConfig {
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let fin = |v: f64, fallback: f64| if v.is_finite() && v >= 0.0 { v } else { fallback };
        let mut c = Self {
            auto: self.auto,
            low_fps: fin(self.low_fps, d.low_fps),
            high_fps: fin(self.high_fps, d.high_fps),
            downgrade_after_ms: fin(self.downgrade_after_ms, d.downgrade_after_ms),
            upgrade_after_ms: fin(self.upgrade_after_ms, d.upgrade_after_ms),
            scale_blend: if self.scale_blend.is_finite() {
                self.scale_blend.clamp(0.0, 1.0)
            } else {
                d.scale_blend
            },
            min_scale: if self.min_scale.is_finite() { self.min_scale } else { d.min_scale },
            max_scale: if self.max_scale.is_finite() { self.max_scale } else { d.max_scale },
        };
        if c.high_fps < c.low_fps {
            log::warn!(
                "quality: high_fps {} below low_fps {}, swapping",
                c.high_fps,
                c.low_fps
            );
            std::mem::swap(&mut c.low_fps, &mut c.high_fps);
        }
        if c.max_scale < c.min_scale {
            std::mem::swap(&mut c.min_scale, &mut c.max_scale);
        }
        c
    }
}

/// Resolution scale the governor steers toward for a measured frame rate.
pub fn resolution_target(fps: f64) -> f32 {
    let t = if fps < 35.0 {
        0.72
    } else if fps < 45.0 {
        0.72 + (fps - 35.0) * (0.13 / 10.0)
    } else if fps < 58.0 {
        0.85 + (fps - 45.0) * (0.15 / 13.0)
    } else {
        1.0
    };
    t as f32
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QualityReport {
    pub fps: f64,
    pub tier: QualityTier,
    /// Set on the sample that switched tiers.
    pub transition: Option<QualityTier>,
    pub scale: f32,
    pub low_streak_ms: f64,
    pub high_streak_ms: f64,
}

/// Two-tier controller with streak hysteresis plus a smoothed resolution scale.
///
/// `sample` only updates internal state; `apply` pushes it to a `QualityTarget`.
/// Tier effects are pushed whenever the applied tier differs from the current one,
/// so repeated `apply` calls are harmless.
#[derive(Clone, Debug)]
pub struct QualityGovernor {
    cfg: GovernorConfig,
    tier: QualityTier,
    low_streak_ms: f64,
    high_streak_ms: f64,
    scale: f32,
    applied_tier: Option<QualityTier>,
    applied_scale: Option<f32>,
    reduced_motion: bool,
    transitions: u32,
}

impl QualityGovernor {
    pub fn new(cfg: GovernorConfig) -> Self {
        let cfg = cfg.sanitized();
        Self {
            scale: cfg.max_scale,
            cfg,
            tier: QualityTier::High,
            low_streak_ms: 0.0,
            high_streak_ms: 0.0,
            applied_tier: None,
            applied_scale: None,
            reduced_motion: false,
            transitions: 0,
        }
    }

    pub fn config(&self) -> &GovernorConfig {
        &self.cfg
    }

    /// Swap thresholds at runtime (config reload). Tier and streaks are kept.
    pub fn set_config(&mut self, cfg: GovernorConfig) {
        let auto = cfg.auto;
        self.cfg = cfg.sanitized();
        self.set_auto(auto);
    }

    pub fn tier(&self) -> QualityTier {
        self.tier
    }

    pub fn effects(&self) -> TierEffects {
        TierEffects::for_tier(self.tier)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    pub fn is_auto(&self) -> bool {
        self.cfg.auto
    }

    pub fn set_auto(&mut self, auto: bool) {
        self.cfg.auto = auto;
        if !auto {
            self.reset_streaks();
        }
    }

    /// Under reduced motion tier changes keep the current scale instead of jumping
    /// to the tier's entry scale; smoothing alone moves it.
    pub fn set_reduced_motion(&mut self, on: bool) {
        self.reduced_motion = on;
    }

    pub fn reset_streaks(&mut self) {
        self.low_streak_ms = 0.0;
        self.high_streak_ms = 0.0;
    }

    /// Feed one window's measured rate. Non-finite or non-positive input is ignored.
    pub fn sample(&mut self, fps: f64, window_ms: f64) -> QualityReport {
        if !(fps.is_finite() && window_ms.is_finite() && fps >= 0.0 && window_ms > 0.0) {
            return self.report(fps, None);
        }

        if fps < self.cfg.low_fps {
            self.low_streak_ms += window_ms;
            self.high_streak_ms = 0.0;
        } else if fps > self.cfg.high_fps {
            self.high_streak_ms += window_ms;
            self.low_streak_ms = 0.0;
        } else {
            self.low_streak_ms = (self.low_streak_ms - window_ms * 0.5).max(0.0);
            self.high_streak_ms = (self.high_streak_ms - window_ms * 0.5).max(0.0);
        }

        if !self.cfg.auto {
            self.reset_streaks();
            return self.report(fps, None);
        }

        let ceiling = self.effects().resolution_ceiling;
        let target = resolution_target(fps)
            .min(ceiling)
            .clamp(self.cfg.min_scale, self.cfg.max_scale);
        self.scale += (target - self.scale) * self.cfg.scale_blend;

        let next = match self.tier {
            QualityTier::High if self.low_streak_ms >= self.cfg.downgrade_after_ms => {
                Some(QualityTier::Low)
            }
            QualityTier::Low if self.high_streak_ms >= self.cfg.upgrade_after_ms => {
                Some(QualityTier::High)
            }
            _ => None,
        };
        if let Some(tier) = next {
            self.enter(tier, fps);
        }
        self.report(fps, next)
    }

    fn enter(&mut self, tier: QualityTier, fps: f64) {
        self.tier = tier;
        self.transitions += 1;
        if !self.reduced_motion {
            self.scale = TierEffects::for_tier(tier).entry_scale;
        }
        log::info!(
            "quality -> {} (fps {:.1}, low {:.0}ms, high {:.0}ms)",
            tier.as_str(),
            fps,
            self.low_streak_ms,
            self.high_streak_ms
        );
    }

    fn report(&self, fps: f64, transition: Option<QualityTier>) -> QualityReport {
        QualityReport {
            fps,
            tier: self.tier,
            transition,
            scale: self.scale,
            low_streak_ms: self.low_streak_ms,
            high_streak_ms: self.high_streak_ms,
        }
    }

    /// Push tier effects (when the tier changed since the last push) and the scale
    /// (when it moved) to `target`.
    pub fn apply<T: QualityTarget + ?Sized>(&mut self, target: &mut T) {
        if self.applied_tier != Some(self.tier) {
            let effects = self.effects();
            target.apply_tier(self.tier, &effects);
            self.applied_tier = Some(self.tier);
        }
        let moved = self
            .applied_scale
            .is_none_or(|prev| (prev - self.scale).abs() >= 0.001);
        if moved {
            target.set_resolution_scale(self.scale);
            self.applied_scale = Some(self.scale);
        }
    }

    /// Forget what was pushed so the next `apply` re-sends everything.
    pub fn invalidate_applied(&mut self) {
        self.applied_tier = None;
        self.applied_scale = None;
    }
}

impl Default for QualityGovernor {
    fn default() -> Self {
        Self::new(GovernorConfig::default())
    }
}
