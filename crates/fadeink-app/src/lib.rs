//! FadeInk Application
//!
//! The doodle layer that ties capture, storage, timed fading and redraw
//! together, plus the shells that drive it: a headless replay runner for
//! native builds and the browser entry point for WASM.

mod layer;
mod replay;

pub use layer::{DoodleLayer, LayerStats};
pub use replay::{
    ReplayAction, ReplayError, ReplayOptions, ReplayReport, ReplayResult, ReplayScript,
    ReplayStep, Replayer, RunUntil, Snapshot, StrokeSnapshot, replay,
};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{WebError, WebHost, WebLayer, WebSurface, run_wasm};
