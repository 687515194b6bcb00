//! The doodle layer: pointer input in, fading ink out.

use fadeink_core::config::{DoodleConfig, InkStyle};
use fadeink_core::fade::{FadeScheduler, TickOutcome};
use fadeink_core::host::{HostScheduler, HostTask, SimulatedHost};
use fadeink_core::input::{PointerEvent, PointerPhase};
use fadeink_core::recorder::StrokeRecorder;
use fadeink_core::session::DoodleSession;
use fadeink_core::store::StrokeStore;
use fadeink_core::stroke::{InkColor, Stroke, StrokeId};
use fadeink_core::surface::DrawingSurface;
use fadeink_render::{RenderContext, StrokeRenderer};
use kurbo::Size;

/// Lifetime counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerStats {
    /// Strokes sealed into the store.
    pub sealed: usize,
    /// Strokes removed after fading out.
    pub faded: usize,
    /// Strokes dropped by [`DoodleLayer::clear_all`].
    pub cleared: usize,
    /// Full redraws performed.
    pub redraws: u64,
}

/// Freehand doodling over a shared surface, with every stroke fading away
/// a few seconds after it is drawn.
///
/// The layer owns its host scheduler and, when the page has one, its drawing
/// surface. Without a surface every drawing operation is a silent no-op,
/// while already-armed fades keep running.
pub struct DoodleLayer<S: DrawingSurface, H: HostScheduler> {
    session: DoodleSession,
    style: InkStyle,
    recorder: StrokeRecorder,
    store: StrokeStore,
    fades: FadeScheduler,
    renderer: StrokeRenderer,
    surface: Option<S>,
    host: H,
    stats: LayerStats,
}

impl<S: DrawingSurface, H: HostScheduler> DoodleLayer<S, H> {
    /// Create a layer drawing onto `surface`.
    pub fn new(config: &DoodleConfig, surface: S, host: H) -> Self {
        let mut layer = Self::detached(config, host);
        layer.attach_surface(surface);
        layer
    }

    /// Create a layer with no drawing surface.
    pub fn detached(config: &DoodleConfig, host: H) -> Self {
        Self {
            session: DoodleSession::new(config.palette.clone()),
            style: config.ink,
            recorder: StrokeRecorder::new(),
            store: StrokeStore::new(),
            fades: FadeScheduler::new(config.fade, config.seed),
            renderer: StrokeRenderer::new(),
            surface: None,
            host,
            stats: LayerStats::default(),
        }
    }

    pub fn session(&self) -> &DoodleSession {
        &self.session
    }

    pub fn store(&self) -> &StrokeStore {
        &self.store
    }

    pub fn stroke(&self, id: StrokeId) -> Option<&Stroke> {
        self.store.get(id)
    }

    pub fn fades(&self) -> &FadeScheduler {
        &self.fades
    }

    pub fn recorder(&self) -> &StrokeRecorder {
        &self.recorder
    }

    pub fn is_capturing(&self) -> bool {
        self.recorder.is_capturing()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn stats(&self) -> LayerStats {
        self.stats
    }

    /// Attach a drawing surface, load the ink defaults into it and draw the
    /// current strokes.
    pub fn attach_surface(&mut self, mut surface: S) {
        self.style.apply(&mut surface, self.session.color(), 1.0);
        self.surface = Some(surface);
        self.redraw();
    }

    /// Detach the drawing surface. Any capture in progress is abandoned.
    pub fn detach_surface(&mut self) -> Option<S> {
        self.recorder.cancel();
        self.surface.take()
    }

    /// Resize the surface, e.g. to follow the viewport.
    pub fn resize(&mut self, size: Size) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.resize(size);
        self.style.apply(surface, self.session.color(), 1.0);
        self.redraw();
    }

    pub fn is_doodle_mode(&self) -> bool {
        self.session.is_doodle_mode()
    }

    /// Switch doodle mode on or off.
    ///
    /// Switching off mid-capture stops further segments but the gesture is
    /// still sealed when the pointer is released.
    pub fn set_doodle_mode(&mut self, active: bool) {
        self.session.set_doodle_mode(active);
        log::info!("Doodle mode {}", if active { "on" } else { "off" });
    }

    pub fn toggle_doodle_mode(&mut self) -> bool {
        let active = !self.session.is_doodle_mode();
        self.set_doodle_mode(active);
        active
    }

    /// Change the active color. A stroke already in progress keeps its color.
    pub fn set_color(&mut self, color: InkColor) {
        self.session.set_color(color);
        self.sync_context_color();
    }

    /// Select a palette swatch by index.
    pub fn select_swatch(&mut self, index: usize) -> bool {
        if !self.session.select_swatch(index) {
            return false;
        }
        self.sync_context_color();
        true
    }

    fn sync_context_color(&mut self) {
        if self.recorder.is_capturing() {
            return;
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.set_stroke_color(self.session.color());
            surface.set_shadow_color(self.session.color());
        }
    }

    /// Feed one normalized pointer event.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if event.phase.ends_gesture() {
            self.end_capture();
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if !self.session.is_doodle_mode() {
            return;
        }
        if event.phase == PointerPhase::Down {
            if surface.contains(event.position) {
                self.recorder
                    .begin(event.position, self.session.color(), &self.style, surface);
            }
        } else {
            self.recorder.extend(event.position, surface);
        }
    }

    /// Seal the capture in progress, if any, and arm its fade.
    fn end_capture(&mut self) {
        let Some(capture) = self.recorder.finish() else {
            return;
        };
        let color_changed = &capture.color != self.session.color();
        let Some(stroke) = Stroke::seal(capture.points, capture.color, self.host.now()) else {
            return;
        };
        let id = stroke.id();
        let points = stroke.len();
        if !self.store.push(stroke) {
            return;
        }
        self.stats.sealed += 1;
        let delay = self.fades.arm(id, &mut self.host);
        log::debug!("Sealed stroke {} ({} points), fading in {} ms", id, points, delay);

        if color_changed {
            self.sync_context_color();
        }
    }

    /// Run a callback owed by the host.
    pub fn dispatch(&mut self, task: HostTask) {
        match task {
            HostTask::FadeTimer(id) => self.on_fade_timer(id),
            HostTask::Frame(id) => self.on_frame(id),
        }
    }

    /// The pre-fade delay of `id` elapsed.
    pub fn on_fade_timer(&mut self, id: StrokeId) {
        if !self.fades.on_timer(id, &mut self.host) {
            log::trace!("Ignoring stale fade timer for {}", id);
        }
    }

    /// A display frame arrived for the fade of `id`.
    pub fn on_frame(&mut self, id: StrokeId) {
        match self.fades.tick(id, &mut self.store, &mut self.host) {
            TickOutcome::Stale => log::trace!("Ignoring stale frame for {}", id),
            TickOutcome::Continue { .. } => self.redraw(),
            TickOutcome::Finished => {
                self.redraw();
                if self.store.remove(id).is_some() {
                    self.stats.faded += 1;
                    log::debug!("Stroke {} faded out", id);
                }
                self.redraw();
            }
        }
    }

    /// Clear the surface and draw every live stroke at its current opacity.
    pub fn redraw(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let ctx = RenderContext::new(&self.store, self.session.color()).with_style(self.style);
        self.renderer.redraw(&ctx, surface);
        self.recorder.restore_live_ink(&self.style, surface);
        self.stats.redraws += 1;
    }

    /// Drop every stroke and cancel every pending fade.
    ///
    /// No callback scheduled before the clear can draw a cleared stroke again.
    pub fn clear_all(&mut self) {
        let cancelled = self.fades.cancel_all(&mut self.host);
        let removed = self.store.clear();
        self.stats.cleared += removed.len();
        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
            self.recorder.restore_live_ink(&self.style, surface);
        }
        log::info!(
            "Cleared {} doodles ({} pending fades cancelled)",
            removed.len(),
            cancelled
        );
    }
}

impl<S: DrawingSurface> DoodleLayer<S, SimulatedHost> {
    /// Run every simulated callback due up to `time`, then move the clock there.
    ///
    /// Returns the number of callbacks run.
    pub fn advance_to(&mut self, time: f64) -> usize {
        let mut ran = 0;
        while let Some(task) = self.host.pop_due(time) {
            self.dispatch(task);
            ran += 1;
        }
        self.host.set_now(time);
        ran
    }

    /// Advance the simulated clock by `ms`.
    pub fn advance_by(&mut self, ms: f64) -> usize {
        let target = self.host.now() + ms;
        self.advance_to(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fadeink_core::surface::{RecordingSurface, SurfaceOp};
    use kurbo::Point;

    type TestLayer = DoodleLayer<RecordingSurface, SimulatedHost>;

    fn layer() -> TestLayer {
        let mut layer = DoodleLayer::new(
            &DoodleConfig::default(),
            RecordingSurface::default(),
            SimulatedHost::new(),
        );
        layer.set_doodle_mode(true);
        layer
    }

    fn draw(layer: &mut TestLayer, points: &[(f64, f64)]) {
        let (x, y) = points[0];
        layer.handle_pointer(PointerEvent::down(x, y));
        for &(x, y) in &points[1..] {
            layer.handle_pointer(PointerEvent::moved(x, y));
        }
        let (x, y) = points[points.len() - 1];
        layer.handle_pointer(PointerEvent::up(x, y));
    }

    #[test]
    fn test_ignores_input_outside_doodle_mode() {
        let mut layer = layer();
        layer.set_doodle_mode(false);
        draw(&mut layer, &[(1.0, 1.0), (2.0, 2.0)]);
        assert!(layer.store().is_empty());
        assert_eq!(layer.host().pending_timers(), 0);
    }

    #[test]
    fn test_down_outside_bounds_is_ignored() {
        let mut layer = layer();
        draw(&mut layer, &[(-5.0, 10.0), (2.0, 2.0)]);
        assert!(layer.store().is_empty());
    }

    #[test]
    fn test_leave_and_touch_end_seal() {
        let mut layer = layer();
        layer.handle_pointer(PointerEvent::down(1.0, 1.0));
        layer.handle_pointer(PointerEvent::leave(1.0, 1.0));
        layer.handle_pointer(PointerEvent::down(2.0, 2.0));
        layer.handle_pointer(PointerEvent::new(PointerPhase::TouchEnd, Point::ZERO));
        assert_eq!(layer.store().len(), 2);
        assert_eq!(layer.stats().sealed, 2);
    }

    #[test]
    fn test_mode_off_mid_capture_stops_segments_but_seals() {
        let mut layer = layer();
        layer.handle_pointer(PointerEvent::down(1.0, 1.0));
        layer.handle_pointer(PointerEvent::moved(2.0, 2.0));
        layer.set_doodle_mode(false);
        layer.handle_pointer(PointerEvent::moved(3.0, 3.0));
        layer.handle_pointer(PointerEvent::up(3.0, 3.0));

        let stroke = layer.store().iter().next().unwrap();
        assert_eq!(stroke.len(), 2);
    }

    #[test]
    fn test_color_change_mid_capture_applies_to_next_stroke() {
        let mut layer = layer();
        layer.set_color("#FF0000".into());
        layer.handle_pointer(PointerEvent::down(1.0, 1.0));
        layer.set_color("#0000FF".into());
        layer.handle_pointer(PointerEvent::moved(2.0, 2.0));

        // Live ink keeps the capture color.
        let surface = layer.surface().unwrap();
        assert_eq!(surface.state().stroke_color.as_str(), "#FF0000");

        layer.handle_pointer(PointerEvent::up(2.0, 2.0));
        let first = layer.store().iter().next().unwrap();
        assert_eq!(first.color().as_str(), "#FF0000");
        assert!(first.points().iter().all(|p| p.color.as_str() == "#FF0000"));

        // The context picks up the new color once the stroke is sealed.
        assert_eq!(layer.surface().unwrap().state().stroke_color.as_str(), "#0000FF");

        draw(&mut layer, &[(5.0, 5.0), (6.0, 6.0)]);
        let second = layer.store().iter().nth(1).unwrap();
        assert_eq!(second.color().as_str(), "#0000FF");
    }

    #[test]
    fn test_redraw_mid_capture_keeps_live_ink() {
        let mut layer = layer();
        draw(&mut layer, &[(50.0, 50.0), (60.0, 60.0)]);
        layer.handle_pointer(PointerEvent::down(1.0, 1.0));
        layer.handle_pointer(PointerEvent::moved(2.0, 2.0));

        layer.redraw();

        let surface = layer.surface().unwrap();
        assert!(surface.shows_point(Point::new(60.0, 60.0)));
        assert!(surface.shows_point(Point::new(2.0, 2.0)));
    }

    #[test]
    fn test_detached_layer_is_a_no_op() {
        let mut layer: TestLayer = DoodleLayer::detached(&DoodleConfig::default(), SimulatedHost::new());
        layer.set_doodle_mode(true);
        draw(&mut layer, &[(1.0, 1.0), (2.0, 2.0)]);
        layer.redraw();
        layer.clear_all();
        assert!(layer.store().is_empty());
        assert_eq!(layer.stats().redraws, 0);
    }

    #[test]
    fn test_detach_keeps_fades_running() {
        let mut layer = layer();
        draw(&mut layer, &[(1.0, 1.0), (2.0, 2.0)]);
        let surface = layer.detach_surface();
        assert!(surface.is_some());

        layer.advance_by(20_000.0);
        assert!(layer.store().is_empty());
        assert_eq!(layer.stats().faded, 1);
    }

    #[test]
    fn test_resize_redraws_strokes() {
        let mut layer = layer();
        draw(&mut layer, &[(1.0, 1.0), (2.0, 2.0)]);
        layer.resize(Size::new(640.0, 480.0));

        let surface = layer.surface().unwrap();
        assert_eq!(surface.size(), Size::new(640.0, 480.0));
        assert!(surface.shows_point(Point::new(2.0, 2.0)));
        assert_eq!(surface.state().line_width, 1.5);
    }

    #[test]
    fn test_select_swatch_updates_context() {
        let mut layer = layer();
        assert!(layer.select_swatch(2));
        let expected = layer.session().palette().get(2).unwrap().clone();
        let surface = layer.surface().unwrap();
        assert_eq!(surface.state().stroke_color, expected);
        assert_eq!(surface.state().shadow_color, expected);
        assert!(!layer.select_swatch(100));
    }

    #[test]
    fn test_attach_loads_ink_defaults() {
        let layer = layer();
        let surface = layer.surface().unwrap();
        assert_eq!(surface.state().line_width, 1.5);
        assert_eq!(surface.state().shadow_blur, 3.0);
        assert!(surface.ops().contains(&SurfaceOp::Clear));
    }
}
