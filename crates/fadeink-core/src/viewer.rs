//! Pan/zoom state for the project detail image viewer.

use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom level a project image opens at.
pub const DEFAULT_ZOOM: f64 = 0.5;
/// Zoom change per button press or wheel notch.
pub const ZOOM_STEP: f64 = 0.25;
pub const MIN_ZOOM: f64 = 0.3;
pub const MAX_ZOOM: f64 = 3.0;

/// State captured when a two-finger pinch starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct PinchStart {
    distance: f64,
    zoom: f64,
}

/// State captured when a drag-to-pan starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct DragStart {
    pointer: Point,
    scroll: Vec2,
}

/// Zoomable, scrollable view of a static image inside a fixed viewport.
///
/// `scroll` mirrors a scroll container: it is the offset of the viewport into
/// the scaled image and is kept inside the scrollable range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoomViewer {
    /// Current zoom factor.
    pub zoom: f64,
    /// Scroll offset into the scaled image.
    pub scroll: Vec2,
    /// Size of the viewport.
    pub viewport: Size,
    /// Unscaled image size.
    pub image: Size,
    pinch: Option<PinchStart>,
    drag: Option<DragStart>,
}

impl ZoomViewer {
    /// Open an image at the default zoom, centered.
    pub fn new(viewport: Size, image: Size) -> Self {
        let mut viewer = Self {
            zoom: DEFAULT_ZOOM,
            scroll: Vec2::ZERO,
            viewport,
            image,
            pinch: None,
            drag: None,
        };
        viewer.set_zoom(DEFAULT_ZOOM);
        viewer
    }

    /// Image size at the current zoom.
    pub fn scaled_size(&self) -> Size {
        Size::new(self.image.width * self.zoom, self.image.height * self.zoom)
    }

    /// Largest valid scroll offset on each axis.
    pub fn max_scroll(&self) -> Vec2 {
        let scaled = self.scaled_size();
        Vec2::new(
            (scaled.width - self.viewport.width).max(0.0),
            (scaled.height - self.viewport.height).max(0.0),
        )
    }

    /// Set the zoom, clamped, and re-center the image.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let max = self.max_scroll();
        self.scroll = Vec2::new(max.x / 2.0, max.y / 2.0);
    }

    /// Set the zoom, keeping the viewport point `center` over the same image pixel.
    pub fn set_zoom_at(&mut self, zoom: f64, center: Point) {
        let clamped = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let ratio = clamped / self.zoom;
        self.zoom = clamped;
        self.scroll = Vec2::new(
            ((center.x + self.scroll.x) * ratio - center.x).max(0.0),
            ((center.y + self.scroll.y) * ratio - center.y).max(0.0),
        );
        self.constrain_scroll();
    }

    pub fn zoom_in_at(&mut self, point: Point) {
        let zoom = (self.zoom + ZOOM_STEP).min(MAX_ZOOM);
        self.set_zoom_at(zoom, point);
    }

    pub fn zoom_out_at(&mut self, point: Point) {
        let zoom = (self.zoom - ZOOM_STEP).max(MIN_ZOOM);
        self.set_zoom_at(zoom, point);
    }

    /// Zoom in around the viewport center.
    pub fn zoom_in(&mut self) {
        self.zoom_in_at(self.viewport_center());
    }

    /// Zoom out around the viewport center.
    pub fn zoom_out(&mut self) {
        self.zoom_out_at(self.viewport_center());
    }

    /// Handle a wheel event. Only zooms while Ctrl/Cmd is held; returns whether it was consumed.
    pub fn wheel(&mut self, delta_y: f64, zoom_modifier: bool, at: Point) -> bool {
        if !zoom_modifier {
            return false;
        }
        if delta_y < 0.0 {
            self.zoom_in_at(at);
        } else {
            self.zoom_out_at(at);
        }
        true
    }

    /// Two fingers touched down.
    pub fn pinch_start(&mut self, a: Point, b: Point) {
        self.pinch = Some(PinchStart {
            distance: a.distance(b),
            zoom: self.zoom,
        });
    }

    /// Two fingers moved. Zoom is relative to the pinch start, around the midpoint.
    pub fn pinch_move(&mut self, a: Point, b: Point) {
        let Some(start) = self.pinch else {
            return;
        };
        if start.distance <= f64::EPSILON {
            return;
        }
        let scale = a.distance(b) / start.distance;
        self.set_zoom_at(start.zoom * scale, a.midpoint(b));
    }

    pub fn pinch_end(&mut self) {
        self.pinch = None;
    }

    /// Start a drag-to-pan. Only possible while zoomed past 100%.
    pub fn drag_start(&mut self, pointer: Point) -> bool {
        if self.zoom <= 1.0 {
            return false;
        }
        self.drag = Some(DragStart {
            pointer,
            scroll: self.scroll,
        });
        true
    }

    pub fn drag_move(&mut self, pointer: Point) {
        let Some(start) = self.drag else {
            return;
        };
        self.scroll = start.scroll - (pointer - start.pointer);
        self.constrain_scroll();
    }

    pub fn drag_end(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Keep the scroll offset inside the scrollable range.
    pub fn constrain_scroll(&mut self) {
        let max = self.max_scroll();
        self.scroll = Vec2::new(self.scroll.x.clamp(0.0, max.x), self.scroll.y.clamp(0.0, max.y));
    }

    /// Top-left of the scaled image in viewport coordinates.
    ///
    /// An axis that fits inside the viewport is centered on that axis.
    pub fn image_origin(&self) -> Point {
        let scaled = self.scaled_size();
        let axis = |viewport: f64, image: f64, scroll: f64| {
            if image <= viewport {
                (viewport - image) / 2.0
            } else {
                -scroll
            }
        };
        Point::new(
            axis(self.viewport.width, scaled.width, self.scroll.x),
            axis(self.viewport.height, scaled.height, self.scroll.y),
        )
    }

    /// Image-to-viewport transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.image_origin().to_vec2()) * Affine::scale(self.zoom)
    }

    /// Convert a viewport point to image pixel coordinates.
    pub fn viewport_to_image(&self, point: Point) -> Point {
        self.transform().inverse() * point
    }

    pub fn can_zoom_in(&self) -> bool {
        self.zoom < MAX_ZOOM
    }

    pub fn can_zoom_out(&self) -> bool {
        self.zoom > MIN_ZOOM
    }

    /// Zoom label, e.g. `"50%"`.
    pub fn label(&self) -> String {
        format!("{}%", (self.zoom * 100.0).round() as i64)
    }

    /// CSS cursor for the viewport.
    pub fn cursor(&self) -> &'static str {
        if self.drag.is_some() {
            "grabbing"
        } else if self.zoom > 1.0 {
            "grab"
        } else {
            "zoom-in"
        }
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }
}
