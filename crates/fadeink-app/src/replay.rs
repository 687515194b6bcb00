//! Headless replay of scripted doodle sessions.
//!
//! A script is a JSON list of timestamped input steps. Replaying it drives a
//! [`DoodleLayer`] over a [`RecordingSurface`] and a [`SimulatedHost`], so the
//! whole draw, wait, fade and remove cycle runs without a browser.

use crate::layer::{DoodleLayer, LayerStats};
use fadeink_core::config::{ConfigError, DoodleConfig};
use fadeink_core::host::{HostScheduler, SimulatedHost};
use fadeink_core::input::{PointerEvent, PointerPhase};
use fadeink_core::stroke::{InkColor, StrokeId};
use fadeink_core::surface::{RecordingSurface, SurfaceOp};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Replay errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Script parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Step {index} at {at} ms comes before the previous step at {previous} ms")]
    OutOfOrder { index: usize, at: f64, previous: f64 },
}

/// Result type for replay operations.
pub type ReplayResult<T> = Result<T, ReplayError>;

/// A single scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReplayAction {
    Pointer { phase: PointerPhase, x: f64, y: f64 },
    SetColor { color: InkColor },
    SelectSwatch { index: usize },
    DoodleMode { active: bool },
    ToggleDoodleMode,
    ClearAll,
    Resize { width: f64, height: f64 },
    /// Hide the drawing surface, as on a project detail page.
    Detach,
    /// Bring the drawing surface back.
    Attach,
    /// Record the live strokes into the report.
    Snapshot,
}

/// An input at a point in simulated time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayStep {
    /// Milliseconds since the start of the replay.
    pub at: f64,
    #[serde(flatten)]
    pub action: ReplayAction,
}

/// A scripted session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Drawing surface size.
    #[serde(default = "default_surface")]
    pub surface: Size,
    /// Whether doodle mode starts switched on.
    #[serde(default = "default_doodle_mode")]
    pub doodle_mode: bool,
    pub steps: Vec<ReplayStep>,
}

fn default_surface() -> Size {
    Size::new(1280.0, 800.0)
}

fn default_doodle_mode() -> bool {
    true
}

impl ReplayScript {
    pub fn from_json(json: &str) -> ReplayResult<Self> {
        let script: Self = serde_json::from_str(json)?;
        script.check_order()?;
        Ok(script)
    }

    pub fn load(path: impl AsRef<Path>) -> ReplayResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn check_order(&self) -> ReplayResult<()> {
        for (index, pair) in self.steps.windows(2).enumerate() {
            if pair[1].at < pair[0].at {
                return Err(ReplayError::OutOfOrder {
                    index: index + 1,
                    at: pair[1].at,
                    previous: pair[0].at,
                });
            }
        }
        Ok(())
    }
}

/// How far to run past the last step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum RunUntil {
    /// Until every pending fade has finished.
    #[default]
    Settled,
    /// Until this simulated time.
    Time(f64),
}

/// Replay options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayOptions {
    pub until: RunUntil,
    /// Include the surface call log in the report.
    pub record_ops: bool,
}

/// One live stroke at snapshot time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrokeSnapshot {
    pub id: StrokeId,
    pub color: InkColor,
    pub points: usize,
    pub opacity: f64,
    pub timestamp: f64,
}

/// The live strokes at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub at: f64,
    pub capturing: bool,
    pub strokes: Vec<StrokeSnapshot>,
}

/// Outcome of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub final_time: f64,
    pub sealed: usize,
    pub faded: usize,
    pub cleared: usize,
    pub redraws: u64,
    pub live_strokes: usize,
    pub pending_fades: usize,
    pub snapshots: Vec<Snapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ops: Option<Vec<SurfaceOp>>,
}

type ReplayLayer = DoodleLayer<RecordingSurface, SimulatedHost>;

/// Drives a layer through a script.
pub struct Replayer {
    layer: ReplayLayer,
    /// Surface parked while detached.
    parked: Option<RecordingSurface>,
    snapshots: Vec<Snapshot>,
}

impl Replayer {
    pub fn new(config: &DoodleConfig, script: &ReplayScript) -> ReplayResult<Self> {
        config.validate()?;
        let host = SimulatedHost::with_frame_interval(config.frame_interval_ms);
        let mut layer = DoodleLayer::new(config, RecordingSurface::new(script.surface), host);
        layer.set_doodle_mode(script.doodle_mode);
        Ok(Self {
            layer,
            parked: None,
            snapshots: Vec::new(),
        })
    }

    pub fn layer(&self) -> &ReplayLayer {
        &self.layer
    }

    /// Run every step, then keep the clock going per `options`.
    pub fn run(mut self, script: &ReplayScript, options: ReplayOptions) -> ReplayReport {
        for step in &script.steps {
            self.layer.advance_to(step.at);
            self.apply(&step.action);
        }

        match options.until {
            RunUntil::Settled => {
                while let Some(due) = self.layer.host().next_due() {
                    self.layer.advance_to(due);
                }
            }
            RunUntil::Time(time) => {
                self.layer.advance_to(time);
            }
        }

        let stats: LayerStats = self.layer.stats();
        let ops = if options.record_ops {
            self.layer
                .surface_mut()
                .or(self.parked.as_mut())
                .map(RecordingSurface::take_ops)
        } else {
            None
        };
        log::info!(
            "Replay finished at {} ms: {} sealed, {} faded, {} cleared",
            self.layer.host().now(),
            stats.sealed,
            stats.faded,
            stats.cleared
        );

        ReplayReport {
            final_time: self.layer.host().now(),
            sealed: stats.sealed,
            faded: stats.faded,
            cleared: stats.cleared,
            redraws: stats.redraws,
            live_strokes: self.layer.store().len(),
            pending_fades: self.layer.fades().pending(),
            snapshots: self.snapshots,
            ops,
        }
    }

    fn apply(&mut self, action: &ReplayAction) {
        log::trace!("Replay step at {} ms: {:?}", self.layer.host().now(), action);
        match action {
            ReplayAction::Pointer { phase, x, y } => {
                self.layer
                    .handle_pointer(PointerEvent::new(*phase, Point::new(*x, *y)));
            }
            ReplayAction::SetColor { color } => self.layer.set_color(color.clone()),
            ReplayAction::SelectSwatch { index } => {
                if !self.layer.select_swatch(*index) {
                    log::warn!("No palette swatch at index {}", index);
                }
            }
            ReplayAction::DoodleMode { active } => self.layer.set_doodle_mode(*active),
            ReplayAction::ToggleDoodleMode => {
                self.layer.toggle_doodle_mode();
            }
            ReplayAction::ClearAll => self.layer.clear_all(),
            ReplayAction::Resize { width, height } => {
                self.layer.resize(Size::new(*width, *height));
            }
            ReplayAction::Detach => {
                if let Some(surface) = self.layer.detach_surface() {
                    self.parked = Some(surface);
                }
            }
            ReplayAction::Attach => {
                if let Some(surface) = self.parked.take() {
                    self.layer.attach_surface(surface);
                }
            }
            ReplayAction::Snapshot => self.snapshots.push(self.snapshot()),
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            at: self.layer.host().now(),
            capturing: self.layer.is_capturing(),
            strokes: self
                .layer
                .store()
                .iter()
                .map(|stroke| StrokeSnapshot {
                    id: stroke.id(),
                    color: stroke.color().clone(),
                    points: stroke.len(),
                    opacity: stroke.opacity(),
                    timestamp: stroke.timestamp(),
                })
                .collect(),
        }
    }
}

/// Replay `script` under `config`.
pub fn replay(
    config: &DoodleConfig,
    script: &ReplayScript,
    options: ReplayOptions,
) -> ReplayResult<ReplayReport> {
    Ok(Replayer::new(config, script)?.run(script, options))
}
