//! Freehand doodle strokes.

use kurbo::{BezPath, Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a stroke.
pub type StrokeId = Uuid;

/// A CSS color string, as consumed by a 2D canvas context (e.g. `"#FF0000"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InkColor(String);

impl InkColor {
    pub fn new(css: impl Into<String>) -> Self {
        Self(css.into())
    }

    pub fn black() -> Self {
        Self::new("#000000")
    }

    /// The CSS representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for InkColor {
    fn default() -> Self {
        Self::black()
    }
}

impl fmt::Display for InkColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InkColor {
    fn from(css: &str) -> Self {
        Self::new(css)
    }
}

impl From<String> for InkColor {
    fn from(css: String) -> Self {
        Self(css)
    }
}

impl From<Color> for InkColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        if rgba.a == 255 {
            Self(format!("#{:02X}{:02X}{:02X}", rgba.r, rgba.g, rgba.b))
        } else {
            Self(format!(
                "#{:02X}{:02X}{:02X}{:02X}",
                rgba.r, rgba.g, rgba.b, rgba.a
            ))
        }
    }
}

/// A single sampled pointer position with the color active at sample time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InkPoint {
    pub position: Point,
    pub color: InkColor,
}

impl InkPoint {
    pub fn new(x: f64, y: f64, color: impl Into<InkColor>) -> Self {
        Self {
            position: Point::new(x, y),
            color: color.into(),
        }
    }
}

/// A sealed freehand gesture plus its fade state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stroke {
    pub(crate) id: StrokeId,
    /// Sampled points in drawing order. Immutable once sealed.
    points: Vec<InkPoint>,
    /// Nominal draw color, also used for the glow.
    color: InkColor,
    /// Host time (ms) at which capture completed. Informational only.
    timestamp: f64,
    /// Current opacity in `[0, 1]`. Only the fade scheduler lowers it.
    pub(crate) opacity: f64,
}

impl Stroke {
    /// Seal captured points into a stroke. Returns `None` for an empty capture.
    pub fn seal(points: Vec<InkPoint>, color: InkColor, timestamp: f64) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            points,
            color,
            timestamp,
            opacity: 1.0,
        })
    }

    pub fn id(&self) -> StrokeId {
        self.id
    }

    pub fn points(&self) -> &[InkPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Draw color fixed at seal time.
    pub fn color(&self) -> &InkColor {
        &self.color
    }

    /// Host time (ms) at which capture completed.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Lower the opacity. Raising it is ignored so a fade never brightens.
    pub(crate) fn fade_to(&mut self, opacity: f64) {
        let opacity = opacity.clamp(0.0, 1.0);
        if opacity < self.opacity {
            self.opacity = opacity;
        }
    }

    /// Bounding box of all points.
    pub fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .fold(Rect::from_points(first.position, first.position), |rect, p| {
                rect.union_pt(p.position)
            })
    }

    /// A single connected path through every point, in order.
    ///
    /// A one-point stroke yields a zero-length segment so it can still be stroked.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some(first) = self.points.first() else {
            return path;
        };
        path.move_to(first.position);
        for point in &self.points {
            path.line_to(point.position);
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_rejects_empty() {
        assert!(Stroke::seal(Vec::new(), InkColor::black(), 0.0).is_none());
    }

    #[test]
    fn test_seal_starts_opaque() {
        let stroke = Stroke::seal(vec![InkPoint::new(1.0, 2.0, "#FF0000")], "#FF0000".into(), 5.0)
            .unwrap();
        assert_eq!(stroke.opacity(), 1.0);
        assert_eq!(stroke.len(), 1);
        assert_eq!(stroke.timestamp(), 5.0);
        assert_eq!(stroke.color().as_str(), "#FF0000");
    }

    #[test]
    fn test_identical_strokes_have_distinct_ids() {
        let points = vec![InkPoint::new(0.0, 0.0, "#000000")];
        let a = Stroke::seal(points.clone(), InkColor::black(), 0.0).unwrap();
        let b = Stroke::seal(points, InkColor::black(), 0.0).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_fade_never_brightens() {
        let mut stroke = Stroke::seal(vec![InkPoint::new(0.0, 0.0, "#000")], InkColor::black(), 0.0)
            .unwrap();
        stroke.fade_to(0.4);
        stroke.fade_to(0.9);
        assert_eq!(stroke.opacity(), 0.4);
        stroke.fade_to(-1.0);
        assert_eq!(stroke.opacity(), 0.0);
    }

    #[test]
    fn test_bounds() {
        let stroke = Stroke::seal(
            vec![
                InkPoint::new(0.0, 0.0, "#000"),
                InkPoint::new(100.0, 50.0, "#000"),
                InkPoint::new(50.0, 100.0, "#000"),
            ],
            InkColor::black(),
            0.0,
        )
        .unwrap();

        let bounds = stroke.bounds();
        assert!((bounds.x0).abs() < f64::EPSILON);
        assert!((bounds.y0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 100.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_single_point_path_is_zero_length() {
        let stroke = Stroke::seal(vec![InkPoint::new(3.0, 4.0, "#000")], InkColor::black(), 0.0)
            .unwrap();
        let path = stroke.to_path();
        assert_eq!(path.elements().len(), 2);
    }

    #[test]
    fn test_color_from_peniko() {
        let color: InkColor = Color::from_rgba8(255, 0, 16, 255).into();
        assert_eq!(color.as_str(), "#FF0010");
    }
}
