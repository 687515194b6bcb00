//! Live capture of freehand strokes.

use crate::config::InkStyle;
use crate::stroke::{InkColor, InkPoint};
use crate::surface::DrawingSurface;
use kurbo::Point;

/// A finished capture, ready to be sealed into a stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    pub points: Vec<InkPoint>,
    pub color: InkColor,
}

/// Captures pointer samples into a point list while inking them live.
///
/// The color is fixed when capture begins: every recorded point and every
/// live segment of a stroke use it, even if the active color changes before
/// the pointer is released.
#[derive(Debug, Clone, Default)]
pub struct StrokeRecorder {
    capturing: bool,
    color: InkColor,
    points: Vec<InkPoint>,
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// Points captured so far.
    pub fn points(&self) -> &[InkPoint] {
        &self.points
    }

    /// Color of the capture in progress.
    pub fn color(&self) -> Option<&InkColor> {
        self.capturing.then_some(&self.color)
    }

    /// Start a capture at `position`: open a path there and record one point.
    pub fn begin(
        &mut self,
        position: Point,
        color: &InkColor,
        style: &InkStyle,
        surface: &mut impl DrawingSurface,
    ) {
        self.capturing = true;
        self.color = color.clone();
        self.points.clear();

        style.apply(surface, &self.color, 1.0);
        surface.begin_path();
        surface.move_to(position);
        self.points.push(InkPoint {
            position,
            color: self.color.clone(),
        });
    }

    /// Extend the capture to `position`, inking the new segment immediately.
    ///
    /// Returns `false` when no capture is in progress.
    pub fn extend(&mut self, position: Point, surface: &mut impl DrawingSurface) -> bool {
        if !self.capturing {
            return false;
        }
        surface.line_to(position);
        surface.stroke();
        self.points.push(InkPoint {
            position,
            color: self.color.clone(),
        });
        true
    }

    /// Stop capturing. Returns the captured points if there are any.
    ///
    /// The buffer is cleared either way.
    pub fn finish(&mut self) -> Option<Capture> {
        if !self.capturing {
            return None;
        }
        self.capturing = false;
        let points = std::mem::take(&mut self.points);
        if points.is_empty() {
            return None;
        }
        Some(Capture {
            points,
            color: self.color.clone(),
        })
    }

    /// Abandon the capture without producing a stroke.
    pub fn cancel(&mut self) {
        self.capturing = false;
        self.points.clear();
    }

    /// Re-ink the in-progress path after the surface was cleared under it,
    /// leaving the path open so further segments continue it.
    pub fn restore_live_ink(&self, style: &InkStyle, surface: &mut impl DrawingSurface) {
        if !self.capturing {
            return;
        }
        let Some((first, rest)) = self.points.split_first() else {
            return;
        };
        style.apply(surface, &self.color, 1.0);
        surface.begin_path();
        surface.move_to(first.position);
        for point in rest {
            surface.line_to(point.position);
        }
        if !rest.is_empty() {
            surface.stroke();
        }
    }
}
