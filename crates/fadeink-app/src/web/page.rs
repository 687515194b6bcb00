//! Doodle canvas, pen button and color palette.

use super::host::with_layer;
use super::{
    WebError, WebHost, WebLayer, WebSurface, client_rect, get_element, listen, local_point,
    mouse_client, set_class, set_style, touch_client,
};
use crate::layer::DoodleLayer;
use fadeink_core::config::DoodleConfig;
use fadeink_core::input::{PointerEvent, PointerPhase, TouchPhase};
use fadeink_core::stroke::InkColor;
use fadeink_core::surface::DrawingSurface;
use kurbo::{Point, Size};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent, Window};

const CANVAS_ID: &str = "doodleCanvas";
const PEN_BUTTON_ID: &str = "doodlePenBtn";
const PALETTE_ID: &str = "colorPalette";
const SWATCH_SELECTOR: &str = ".color-option";
const PEN_CONTAINER_SELECTOR: &str = ".doodle-pen-container";

/// The doodle elements of the page.
pub(super) struct Page {
    pub layer: Rc<RefCell<WebLayer>>,
    canvas: HtmlCanvasElement,
    pen_button: HtmlElement,
    /// The surface while the layer is hidden.
    parked: Option<WebSurface>,
}

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

pub(super) fn with_page(f: impl FnOnce(&mut Page)) {
    PAGE.with(|page| match page.try_borrow_mut() {
        Ok(mut page) => match page.as_mut() {
            Some(page) => f(page),
            None => log::warn!("Doodle layer not initialized"),
        },
        Err(_) => log::warn!("Doodle page busy"),
    });
}

impl Page {
    /// Show or hide the canvas and pen. While hidden the layer has no surface.
    pub fn set_visible(&mut self, visible: bool) {
        let display = if visible { "" } else { "none" };
        let elements: [&HtmlElement; 2] = [&self.canvas, &self.pen_button];
        for element in elements {
            set_style(element, "display", display);
        }

        let Ok(mut layer) = self.layer.try_borrow_mut() else {
            log::warn!("Doodle layer busy, visibility unchanged");
            return;
        };
        if visible {
            if let Some(surface) = self.parked.take() {
                layer.attach_surface(surface);
            }
        } else if let Some(surface) = layer.detach_surface() {
            self.parked = Some(surface);
        }
    }
}

pub(super) fn setup() -> Result<(), WebError> {
    let window = web_sys::window().ok_or(WebError::NoWindow)?;
    let document = window.document().ok_or(WebError::NoDocument)?;
    let canvas: HtmlCanvasElement = get_element(&document, CANVAS_ID)?;
    let pen_button: HtmlElement = get_element(&document, PEN_BUTTON_ID)?;
    let palette: HtmlElement = get_element(&document, PALETTE_ID)?;

    let mut surface = WebSurface::new(canvas.clone())?;
    surface.resize(viewport_size(&window));

    let config = DoodleConfig {
        seed: (js_sys::Math::random() * u32::MAX as f64) as u64,
        ..DoodleConfig::default()
    };
    let host_window = window.clone();
    let layer = Rc::new_cyclic(|weak: &Weak<RefCell<WebLayer>>| {
        RefCell::new(DoodleLayer::new(
            &config,
            surface,
            WebHost::new(host_window, weak.clone()),
        ))
    });

    wire_canvas(&canvas, &layer)?;
    wire_palette(&palette, &layer)?;
    wire_pen(&document, &pen_button, &palette, &canvas, &layer)?;
    wire_resize(&window, &layer)?;

    PAGE.with(|page| {
        *page.borrow_mut() = Some(Page {
            layer,
            canvas,
            pen_button,
            parked: None,
        });
    });
    log::info!("Doodle layer ready");
    Ok(())
}

fn viewport_size(window: &Window) -> Size {
    let dimension = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    Size::new(
        dimension(window.inner_width()),
        dimension(window.inner_height()),
    )
}

fn wire_canvas(canvas: &HtmlCanvasElement, layer: &Rc<RefCell<WebLayer>>) -> Result<(), WebError> {
    let mouse = [
        ("mousedown", PointerPhase::Down),
        ("mousemove", PointerPhase::Move),
        ("mouseup", PointerPhase::Up),
        ("mouseout", PointerPhase::Leave),
    ];
    for (kind, phase) in mouse {
        let weak = Rc::downgrade(layer);
        let target = canvas.clone();
        listen(canvas, kind, move |event: Event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let pointer =
                PointerEvent::from_client(phase, mouse_client(mouse), client_rect(&target));
            with_layer(&weak, |layer| layer.handle_pointer(pointer));
        })?;
    }

    let touch = [
        ("touchstart", TouchPhase::Start),
        ("touchmove", TouchPhase::Move),
        ("touchend", TouchPhase::End),
    ];
    for (kind, phase) in touch {
        let weak = Rc::downgrade(layer);
        let target = canvas.clone();
        listen(canvas, kind, move |event: Event| {
            let Some(touch_event) = event.dyn_ref::<TouchEvent>() else {
                return;
            };
            let position = if phase == TouchPhase::End {
                Point::ZERO
            } else {
                let Some(touch) = touch_event.touches().get(0) else {
                    return;
                };
                local_point(touch_client(&touch), &target)
            };
            with_layer(&weak, |layer| {
                // Keep the page from scrolling under the pen.
                if phase != TouchPhase::End && layer.is_doodle_mode() {
                    event.prevent_default();
                }
                layer.handle_pointer(PointerEvent::from_touch(phase, position));
            });
        })?;
    }
    Ok(())
}

fn swatches(palette: &Element) -> Vec<Element> {
    let Ok(nodes) = palette.query_selector_all(SWATCH_SELECTOR) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn wire_palette(palette: &HtmlElement, layer: &Rc<RefCell<WebLayer>>) -> Result<(), WebError> {
    let all = swatches(palette);
    if let Some(first) = all.first() {
        set_class(first, "selected", true);
        if let Some(color) = first.get_attribute("data-color") {
            layer.borrow_mut().set_color(InkColor::new(color));
        }
    }

    for swatch in &all {
        let Some(color) = swatch.get_attribute("data-color") else {
            log::warn!("Color swatch without data-color");
            continue;
        };
        let weak = Rc::downgrade(layer);
        let palette = palette.clone();
        let selected = swatch.clone();
        listen(swatch, "click", move |_| {
            with_layer(&weak, |layer| layer.set_color(InkColor::new(color.as_str())));
            for other in swatches(&palette) {
                set_class(&other, "selected", false);
            }
            set_class(&selected, "selected", true);
        })?;
    }
    Ok(())
}

fn wire_pen(
    document: &web_sys::Document,
    pen_button: &HtmlElement,
    palette: &HtmlElement,
    canvas: &HtmlCanvasElement,
    layer: &Rc<RefCell<WebLayer>>,
) -> Result<(), WebError> {
    {
        let weak = Rc::downgrade(layer);
        let button = pen_button.clone();
        let palette = palette.clone();
        let canvas = canvas.clone();
        let body = document.body();
        listen(pen_button, "click", move |_| {
            let mut active = false;
            with_layer(&weak, |layer| active = layer.toggle_doodle_mode());
            set_class(&button, "active", active);
            set_class(&canvas, "active", active);
            set_class(&palette, "show", active);
            if let Some(body) = body.as_ref() {
                set_class(body, "pen-cursor", active);
            }
        })?;
    }

    // Clicking anywhere outside the pen container hides the palette.
    let palette = palette.clone();
    listen(document, "click", move |event: Event| {
        let inside = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .and_then(|element| element.closest(PEN_CONTAINER_SELECTOR).ok().flatten())
            .is_some();
        if !inside {
            set_class(&palette, "show", false);
        }
    })
}

fn wire_resize(window: &Window, layer: &Rc<RefCell<WebLayer>>) -> Result<(), WebError> {
    let weak = Rc::downgrade(layer);
    let target = window.clone();
    listen(window, "resize", move |_| {
        let size = viewport_size(&target);
        with_layer(&weak, |layer| layer.resize(size));
    })
}
