//! Browser timers and animation frames as a [`HostScheduler`].

use super::WebLayer;
use fadeink_core::host::{FrameHandle, HostScheduler, TimerHandle};
use fadeink_core::stroke::StrokeId;
use std::cell::RefCell;
use std::rc::Weak;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;
use web_time::Instant;

/// Schedules fade callbacks with `setTimeout` and `requestAnimationFrame`.
///
/// Callbacks reach the layer through a weak reference, so a dropped layer
/// simply ignores them.
pub struct WebHost {
    window: Window,
    origin: Instant,
    layer: Weak<RefCell<WebLayer>>,
}

impl WebHost {
    pub fn new(window: Window, layer: Weak<RefCell<WebLayer>>) -> Self {
        Self {
            window,
            origin: Instant::now(),
            layer,
        }
    }
}

/// Run `f` against the layer if it is still alive and not already borrowed.
pub(super) fn with_layer(layer: &Weak<RefCell<WebLayer>>, f: impl FnOnce(&mut WebLayer)) {
    let Some(layer) = layer.upgrade() else {
        return;
    };
    match layer.try_borrow_mut() {
        Ok(mut layer) => f(&mut layer),
        Err(_) => log::warn!("Doodle layer busy, dropping callback"),
    };
}

impl HostScheduler for WebHost {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn set_timeout(&mut self, delay_ms: f64, stroke: StrokeId) -> TimerHandle {
        let layer = self.layer.clone();
        let callback = Closure::once_into_js(move || {
            with_layer(&layer, |layer| layer.on_fade_timer(stroke));
        });
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                delay_ms as i32,
            ) {
            Ok(id) => TimerHandle(id as u64),
            Err(err) => {
                log::warn!("setTimeout failed for stroke {}: {:?}", stroke, err);
                TimerHandle(0)
            }
        }
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.window.clear_timeout_with_handle(handle.0 as i32);
    }

    fn request_frame(&mut self, stroke: StrokeId) -> FrameHandle {
        let layer = self.layer.clone();
        let callback = Closure::once_into_js(move |_timestamp: f64| {
            with_layer(&layer, |layer| layer.on_frame(stroke));
        });
        match self.window.request_animation_frame(callback.unchecked_ref()) {
            Ok(id) => FrameHandle(id as u64),
            Err(err) => {
                log::warn!("requestAnimationFrame failed for stroke {}: {:?}", stroke, err);
                FrameHandle(0)
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(err) = self.window.cancel_animation_frame(handle.0 as i32) {
            log::warn!("cancelAnimationFrame failed: {:?}", err);
        }
    }
}
