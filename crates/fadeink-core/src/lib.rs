//! FadeInk Core Library
//!
//! Platform-agnostic data structures and logic for the FadeInk doodle layer:
//! strokes, their store, live capture, the timed fade state machine and the
//! host interfaces (drawing surface, clock and scheduler) they run against.
//! The page around it contributes section routing and sticky-note dragging.

pub mod config;
pub mod fade;
pub mod greeting;
pub mod host;
pub mod input;
pub mod navigation;
pub mod notes;
pub mod recorder;
pub mod session;
pub mod store;
pub mod stroke;
pub mod surface;
pub mod viewer;

pub use config::{ConfigError, ConfigResult, DoodleConfig, InkStyle};
pub use fade::{FadePhase, FadeScheduler, FadeTiming, TickOutcome, ease_fade};
pub use host::{FrameHandle, HostScheduler, HostTask, SimulatedHost, TimerHandle};
pub use input::{PointerEvent, PointerPhase, TouchPhase};
pub use navigation::{Navigator, Route, Section, Transition};
pub use notes::{NoteDrag, NoteLook, PaperColor};
pub use recorder::{Capture, StrokeRecorder};
pub use session::{DoodleSession, Palette};
pub use store::StrokeStore;
pub use stroke::{InkColor, InkPoint, Stroke, StrokeId};
pub use surface::{DrawingSurface, LineCap, LineJoin, RecordingSurface, SurfaceOp};
pub use viewer::ZoomViewer;
