//! Frame-rate sampling and the two-tier adaptive quality governor.
#![forbid(unsafe_code)]

mod governor;
mod meter;
mod tier;

pub use governor::{GovernorConfig, QualityGovernor, QualityReport, resolution_target};
pub use meter::{FpsMeter, FpsSample};
pub use tier::{QualityTarget, QualityTier, TierEffects};

#[cfg(test)]
mod tests;
