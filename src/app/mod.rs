pub mod collab;
mod state;
mod step;
mod watchers;


pub use collab::{
    FixedInput, FrameView, HeadlessRenderer, HeadlessUi, InputSnapshot, InputSource, Renderer,
    UiHooks, WanderInput,
};
pub use state::{App, FrameReport, RunStats};
pub use watchers::spawn_config_watcher;
