//! Full-surface stroke redraw.

use fadeink_core::config::InkStyle;
use fadeink_core::store::StrokeStore;
use fadeink_core::stroke::{InkColor, Stroke};
use fadeink_core::surface::DrawingSurface;
use kurbo::PathEl;

/// Inputs of a single redraw.
pub struct RenderContext<'a> {
    /// The strokes to draw, in insertion order.
    pub store: &'a StrokeStore,
    /// The active color, restored into the context after drawing.
    pub active_color: &'a InkColor,
    /// Ink appearance.
    pub style: InkStyle,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context with the default ink style.
    pub fn new(store: &'a StrokeStore, active_color: &'a InkColor) -> Self {
        Self {
            store,
            active_color,
            style: InkStyle::default(),
        }
    }

    /// Set the ink style.
    pub fn with_style(mut self, style: InkStyle) -> Self {
        self.style = style;
        self
    }
}

/// What a redraw drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub strokes: usize,
    pub points: usize,
}

/// Redraws every stored stroke at its current opacity.
#[derive(Debug, Clone, Default)]
pub struct StrokeRenderer {
    frames: u64,
}

impl StrokeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of redraws performed so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Clear the surface and draw every stroke in the store.
    ///
    /// Afterwards the context is reset to the live-ink defaults so capture
    /// drawing is not affected by the last stroke's alpha or glow.
    pub fn redraw(&mut self, ctx: &RenderContext, surface: &mut impl DrawingSurface) -> RenderStats {
        self.frames += 1;
        surface.clear();

        let mut stats = RenderStats::default();
        for stroke in ctx.store.iter() {
            if stroke.is_empty() {
                continue;
            }
            self.draw_stroke(stroke, &ctx.style, surface);
            stats.strokes += 1;
            stats.points += stroke.len();
        }

        ctx.style.apply(surface, ctx.active_color, 1.0);
        log::trace!(
            "Redraw #{}: {} strokes, {} points",
            self.frames,
            stats.strokes,
            stats.points
        );
        stats
    }

    fn draw_stroke(&self, stroke: &Stroke, style: &InkStyle, surface: &mut impl DrawingSurface) {
        style.apply(surface, stroke.color(), stroke.opacity());
        surface.begin_path();
        for element in stroke.to_path().elements() {
            match *element {
                PathEl::MoveTo(p) => surface.move_to(p),
                PathEl::LineTo(p) => surface.line_to(p),
                // Strokes are polylines; nothing else is ever emitted.
                PathEl::QuadTo(..) | PathEl::CurveTo(..) | PathEl::ClosePath => {}
            }
        }
        surface.stroke();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fadeink_core::stroke::InkPoint;
    use fadeink_core::surface::{LineCap, LineJoin, RecordingSurface, SurfaceOp};
    use kurbo::Point;

    fn stroke(points: &[(f64, f64)], color: &str) -> Stroke {
        let points = points.iter().map(|&(x, y)| InkPoint::new(x, y, color)).collect();
        Stroke::seal(points, InkColor::new(color), 0.0).unwrap()
    }

    #[test]
    fn test_empty_store_clears_without_paths() {
        let store = StrokeStore::new();
        let active = InkColor::black();
        let mut surface = RecordingSurface::default();

        let stats = StrokeRenderer::new().redraw(&RenderContext::new(&store, &active), &mut surface);

        assert_eq!(stats, RenderStats::default());
        assert_eq!(surface.ops()[0], SurfaceOp::Clear);
        assert!(!surface.ops().iter().any(SurfaceOp::is_path_op));
    }

    #[test]
    fn test_draws_in_insertion_order_with_stroke_color() {
        let mut store = StrokeStore::new();
        store.push(stroke(&[(0.0, 0.0), (10.0, 10.0)], "#FF0000"));
        store.push(stroke(&[(5.0, 5.0), (6.0, 6.0), (7.0, 7.0)], "#0000FF"));
        let active = InkColor::black();
        let mut surface = RecordingSurface::default();

        let stats = StrokeRenderer::new().redraw(&RenderContext::new(&store, &active), &mut surface);

        assert_eq!(stats.strokes, 2);
        assert_eq!(stats.points, 5);
        let visible = surface.visible();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].state.stroke_color.as_str(), "#FF0000");
        assert_eq!(visible[0].state.shadow_color.as_str(), "#FF0000");
        assert_eq!(visible[1].state.stroke_color.as_str(), "#0000FF");
        assert_eq!(visible[1].points.last(), Some(&Point::new(7.0, 7.0)));
        assert_eq!(visible[0].state.line_cap, LineCap::Round);
        assert_eq!(visible[0].state.line_join, LineJoin::Round);
        assert_eq!(visible[0].state.line_width, 1.5);
    }

    #[test]
    fn test_single_point_stroke_is_harmless() {
        let mut store = StrokeStore::new();
        store.push(stroke(&[(3.0, 3.0)], "#000000"));
        let active = InkColor::black();
        let mut surface = RecordingSurface::default();

        let stats = StrokeRenderer::new().redraw(&RenderContext::new(&store, &active), &mut surface);
        assert_eq!(stats.strokes, 1);
        assert_eq!(surface.visible()[0].points, vec![Point::new(3.0, 3.0), Point::new(3.0, 3.0)]);
    }

    #[test]
    fn test_context_reset_after_redraw() {
        let mut store = StrokeStore::new();
        store.push(stroke(&[(0.0, 0.0), (1.0, 1.0)], "#FF0000"));
        let active = InkColor::new("#00FF00");
        let mut surface = RecordingSurface::default();

        StrokeRenderer::new().redraw(&RenderContext::new(&store, &active), &mut surface);

        let state = surface.state();
        assert_eq!(state.alpha, 1.0);
        assert_eq!(state.line_width, 1.5);
        assert_eq!(state.shadow_blur, 3.0);
        assert_eq!(state.stroke_color.as_str(), "#00FF00");
        assert_eq!(state.shadow_color.as_str(), "#00FF00");
    }

    #[test]
    fn test_frames_counted() {
        let store = StrokeStore::new();
        let active = InkColor::black();
        let mut surface = RecordingSurface::default();
        let mut renderer = StrokeRenderer::new();
        renderer.redraw(&RenderContext::new(&store, &active), &mut surface);
        renderer.redraw(&RenderContext::new(&store, &active), &mut surface);
        assert_eq!(renderer.frames(), 2);
    }
}
