//! Drawing surface abstraction.
//!
//! The doodle layer draws through [`DrawingSurface`], a minimal subset of a
//! 2D canvas context. The browser build implements it over
//! `CanvasRenderingContext2d`; [`RecordingSurface`] keeps an in-memory log of
//! operations for tests and headless replay.

use crate::stroke::InkColor;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Line cap style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

impl LineCap {
    /// CSS keyword for this cap.
    pub fn as_css(self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

/// Line join style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
    Bevel,
}

impl LineJoin {
    /// CSS keyword for this join.
    pub fn as_css(self) -> &'static str {
        match self {
            LineJoin::Miter => "miter",
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
        }
    }
}

/// A canvas-like drawing surface shared by live capture and redraws.
///
/// Context state (alpha, width, colors, blur) persists between calls, like a
/// 2D canvas context.
pub trait DrawingSurface {
    /// Surface size in drawing units.
    fn size(&self) -> Size;

    /// Clear the entire surface.
    fn clear(&mut self);

    fn begin_path(&mut self);
    fn move_to(&mut self, point: Point);
    fn line_to(&mut self, point: Point);
    /// Stroke the current path with the current context state.
    fn stroke(&mut self);

    fn set_alpha(&mut self, alpha: f64);
    fn set_line_width(&mut self, width: f64);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);
    fn set_stroke_color(&mut self, color: &InkColor);
    fn set_shadow_blur(&mut self, blur: f64);
    fn set_shadow_color(&mut self, color: &InkColor);

    /// Resize the surface. Resizing clears its contents.
    fn resize(&mut self, size: Size);

    /// Whether a point lies inside the surface bounds.
    fn contains(&self, point: Point) -> bool {
        let size = self.size();
        point.x >= 0.0 && point.y >= 0.0 && point.x <= size.width && point.y <= size.height
    }
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SurfaceOp {
    Clear,
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Stroke,
    SetAlpha { alpha: f64 },
    SetLineWidth { width: f64 },
    SetLineCap { cap: LineCap },
    SetLineJoin { join: LineJoin },
    SetStrokeColor { color: InkColor },
    SetShadowBlur { blur: f64 },
    SetShadowColor { color: InkColor },
    Resize { width: f64, height: f64 },
}

impl SurfaceOp {
    /// Whether this op builds or strokes a path.
    pub fn is_path_op(&self) -> bool {
        matches!(
            self,
            SurfaceOp::BeginPath | SurfaceOp::MoveTo { .. } | SurfaceOp::LineTo { .. } | SurfaceOp::Stroke
        )
    }
}

/// Snapshot of the context state of a surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextState {
    pub alpha: f64,
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub stroke_color: InkColor,
    pub shadow_blur: f64,
    pub shadow_color: InkColor,
}

impl Default for ContextState {
    /// The 2D canvas defaults.
    fn default() -> Self {
        Self {
            alpha: 1.0,
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            stroke_color: InkColor::black(),
            shadow_blur: 0.0,
            shadow_color: InkColor::new("rgba(0, 0, 0, 0)"),
        }
    }
}

/// A stroked path as it would appear on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokedPath {
    pub points: Vec<Point>,
    pub state: ContextState,
}

/// In-memory surface that records every call.
///
/// Besides the raw op log it tracks the context state and the paths stroked
/// since the last clear, which is what a viewer would currently see.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: Size,
    ops: Vec<SurfaceOp>,
    state: ContextState,
    current_path: Vec<Point>,
    visible: Vec<StrokedPath>,
}

impl RecordingSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ops: Vec::new(),
            state: ContextState::default(),
            current_path: Vec::new(),
            visible: Vec::new(),
        }
    }

    /// Every call recorded so far.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Drop the op log, keeping state and visible paths.
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn state(&self) -> &ContextState {
        &self.state
    }

    /// Paths stroked since the last clear, in paint order.
    pub fn visible(&self) -> &[StrokedPath] {
        &self.visible
    }

    /// Whether any currently visible path passes through `point`.
    pub fn shows_point(&self, point: Point) -> bool {
        self.visible.iter().any(|p| p.points.contains(&point))
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new(Size::new(1280.0, 800.0))
    }
}

impl DrawingSurface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        self.ops.push(SurfaceOp::Clear);
        self.visible.clear();
    }

    fn begin_path(&mut self) {
        self.ops.push(SurfaceOp::BeginPath);
        self.current_path.clear();
    }

    fn move_to(&mut self, point: Point) {
        self.ops.push(SurfaceOp::MoveTo { x: point.x, y: point.y });
        self.current_path.push(point);
    }

    fn line_to(&mut self, point: Point) {
        self.ops.push(SurfaceOp::LineTo { x: point.x, y: point.y });
        self.current_path.push(point);
    }

    fn stroke(&mut self) {
        self.ops.push(SurfaceOp::Stroke);
        if !self.current_path.is_empty() {
            self.visible.push(StrokedPath {
                points: self.current_path.clone(),
                state: self.state.clone(),
            });
        }
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.ops.push(SurfaceOp::SetAlpha { alpha });
        self.state.alpha = alpha;
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(SurfaceOp::SetLineWidth { width });
        self.state.line_width = width;
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.ops.push(SurfaceOp::SetLineCap { cap });
        self.state.line_cap = cap;
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.ops.push(SurfaceOp::SetLineJoin { join });
        self.state.line_join = join;
    }

    fn set_stroke_color(&mut self, color: &InkColor) {
        self.ops.push(SurfaceOp::SetStrokeColor { color: color.clone() });
        self.state.stroke_color = color.clone();
    }

    fn set_shadow_blur(&mut self, blur: f64) {
        self.ops.push(SurfaceOp::SetShadowBlur { blur });
        self.state.shadow_blur = blur;
    }

    fn set_shadow_color(&mut self, color: &InkColor) {
        self.ops.push(SurfaceOp::SetShadowColor { color: color.clone() });
        self.state.shadow_color = color.clone();
    }

    fn resize(&mut self, size: Size) {
        self.ops.push(SurfaceOp::Resize {
            width: size.width,
            height: size.height,
        });
        self.size = size;
        // Resizing a canvas resets its context state and contents.
        self.state = ContextState::default();
        self.current_path.clear();
        self.visible.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let surface = RecordingSurface::new(Size::new(100.0, 50.0));
        assert!(surface.contains(Point::new(0.0, 0.0)));
        assert!(surface.contains(Point::new(100.0, 50.0)));
        assert!(!surface.contains(Point::new(-1.0, 10.0)));
        assert!(!surface.contains(Point::new(10.0, 51.0)));
    }

    #[test]
    fn test_stroke_snapshots_state() {
        let mut surface = RecordingSurface::default();
        surface.set_stroke_color(&InkColor::new("#FF0000"));
        surface.begin_path();
        surface.move_to(Point::new(1.0, 1.0));
        surface.line_to(Point::new(2.0, 2.0));
        surface.stroke();

        assert_eq!(surface.visible().len(), 1);
        assert_eq!(surface.visible()[0].state.stroke_color.as_str(), "#FF0000");
        assert!(surface.shows_point(Point::new(2.0, 2.0)));

        surface.clear();
        assert!(surface.visible().is_empty());
    }

    #[test]
    fn test_resize_resets_context() {
        let mut surface = RecordingSurface::default();
        surface.set_line_width(4.0);
        surface.resize(Size::new(10.0, 10.0));
        assert_eq!(surface.state(), &ContextState::default());
        assert_eq!(surface.size(), Size::new(10.0, 10.0));
    }
}
