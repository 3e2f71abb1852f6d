//! Frame pacing and per-frame work batching (single-threaded).
#![forbid(unsafe_code)]

pub mod clock;
pub mod deferred;
pub mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use deferred::{DeferredSink, DeferredWork, FlushReport};
pub use scheduler::{FixedStepConfig, FixedStepScheduler, FrameTiming, SchedulerCounters, Simulation};
