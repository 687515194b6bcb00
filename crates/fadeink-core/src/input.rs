//! Unified pointer input for mouse and touch.
//!
//! Mouse and touch events are normalized into one stream of
//! [`PointerEvent`]s in surface-relative coordinates.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    /// Mouse down or touch start.
    Down,
    /// Mouse or touch move.
    Move,
    /// Mouse up.
    Up,
    /// Pointer left the surface.
    Leave,
    /// Touch end.
    TouchEnd,
}

impl PointerPhase {
    /// Whether this phase ends an in-progress gesture.
    pub fn ends_gesture(self) -> bool {
        matches!(self, PointerPhase::Up | PointerPhase::Leave | PointerPhase::TouchEnd)
    }
}

/// Raw touch lifecycle, as delivered by a touch screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    Start,
    Move,
    End,
}

/// A pointer event with a position relative to the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Point,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, position: Point) -> Self {
        Self { phase, position }
    }

    pub fn down(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Down, Point::new(x, y))
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Move, Point::new(x, y))
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Up, Point::new(x, y))
    }

    pub fn leave(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Leave, Point::new(x, y))
    }

    /// Normalize a touch sample into a pointer event.
    pub fn from_touch(phase: TouchPhase, position: Point) -> Self {
        let phase = match phase {
            TouchPhase::Start => PointerPhase::Down,
            TouchPhase::Move => PointerPhase::Move,
            TouchPhase::End => PointerPhase::TouchEnd,
        };
        Self { phase, position }
    }

    /// Convert a client (viewport) position into surface-relative coordinates.
    pub fn from_client(phase: PointerPhase, client: Point, surface_rect: Rect) -> Self {
        let offset = Vec2::new(surface_rect.x0, surface_rect.y0);
        Self {
            phase,
            position: client - offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_normalization() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(PointerEvent::from_touch(TouchPhase::Start, p).phase, PointerPhase::Down);
        assert_eq!(PointerEvent::from_touch(TouchPhase::Move, p).phase, PointerPhase::Move);
        assert_eq!(PointerEvent::from_touch(TouchPhase::End, p).phase, PointerPhase::TouchEnd);
    }

    #[test]
    fn test_ends_gesture() {
        assert!(PointerPhase::Up.ends_gesture());
        assert!(PointerPhase::Leave.ends_gesture());
        assert!(PointerPhase::TouchEnd.ends_gesture());
        assert!(!PointerPhase::Down.ends_gesture());
        assert!(!PointerPhase::Move.ends_gesture());
    }

    #[test]
    fn test_client_to_surface() {
        let rect = Rect::new(10.0, 20.0, 110.0, 220.0);
        let event = PointerEvent::from_client(PointerPhase::Down, Point::new(15.0, 30.0), rect);
        assert_eq!(event.position, Point::new(5.0, 10.0));
    }
}
