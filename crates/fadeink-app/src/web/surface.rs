//! Canvas 2D drawing surface.

use super::WebError;
use fadeink_core::stroke::InkColor;
use fadeink_core::surface::{DrawingSurface, LineCap, LineJoin};
use kurbo::{Point, Size};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// A `<canvas>` element and its 2D context.
pub struct WebSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl WebSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, WebError> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(WebError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| WebError::NoContext)?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl DrawingSurface for WebSurface {
    fn size(&self) -> Size {
        Size::new(self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn clear(&mut self) {
        let size = self.size();
        self.ctx.clear_rect(0.0, 0.0, size.width, size.height);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, point: Point) {
        self.ctx.move_to(point.x, point.y);
    }

    fn line_to(&mut self, point: Point) {
        self.ctx.line_to(point.x, point.y);
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.ctx.set_line_cap(cap.as_css());
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.ctx.set_line_join(join.as_css());
    }

    fn set_stroke_color(&mut self, color: &InkColor) {
        self.ctx.set_stroke_style_str(color.as_str());
    }

    fn set_shadow_blur(&mut self, blur: f64) {
        self.ctx.set_shadow_blur(blur);
    }

    fn set_shadow_color(&mut self, color: &InkColor) {
        self.ctx.set_shadow_color(color.as_str());
    }

    // Setting the canvas size resets the context to its defaults.
    fn resize(&mut self, size: Size) {
        self.canvas.set_width(size.width.max(0.0) as u32);
        self.canvas.set_height(size.height.max(0.0) as u32);
    }
}
