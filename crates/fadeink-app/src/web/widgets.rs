//! Page widgets around the doodle layer: header greeting, cursor speech
//! bubble, sticky notes and the project image zoom viewer.

use super::{
    WebError, client_rect, every, get_element, listen, local_point, mouse_client, query,
    set_class, set_style, touch_client,
};
use fadeink_core::greeting::{BubbleState, bubble_at, greeting_for_hour};
use fadeink_core::notes::{NoteDrag, NoteLook};
use fadeink_core::viewer::{DEFAULT_ZOOM, ZoomViewer};
use kurbo::{Point, Size};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlImageElement, MouseEvent, TouchEvent, WheelEvent,
};
use web_time::Instant;

const GREETING_REFRESH_MS: i32 = 60_000;
const BUBBLE_TICK_MS: i32 = 100;
const NOTE_SELECTOR: &str = ".sticky-note";
const NOTE_CONTROLS_SELECTOR: &str = ".music-btn, .close-btn";

fn document() -> Result<(web_sys::Window, Document), WebError> {
    let window = web_sys::window().ok_or(WebError::NoWindow)?;
    let document = window.document().ok_or(WebError::NoDocument)?;
    Ok((window, document))
}

/// Time-of-day greeting in the header, refreshed every minute.
pub(super) fn setup_greeting() -> Result<(), WebError> {
    let (window, document) = document()?;
    let target: Element = query(&document, ".top-center")?;
    let update = move || {
        let hour = js_sys::Date::new_0().get_hours();
        target.set_text_content(Some(greeting_for_hour(hour)));
    };
    update();
    every(&window, GREETING_REFRESH_MS, update)
}

/// Custom cursor that follows the mouse, with a cycling adjective bubble.
pub(super) fn setup_cursor_bubble() -> Result<(), WebError> {
    let (window, document) = document()?;
    let wrapper: HtmlElement = query(&document, ".custom-cursor-wrapper")?;
    let bubble: Element = query(&document, ".speech-bubble")?;

    listen(&document, "mousemove", move |event: Event| {
        if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
            let at = mouse_client(mouse);
            set_style(
                &wrapper,
                "transform",
                &format!("translate({}px, {}px)", at.x, at.y),
            );
        }
    })?;

    let origin = Instant::now();
    every(&window, BUBBLE_TICK_MS, move || {
        let state = bubble_at(origin.elapsed().as_secs_f64() * 1000.0);
        if bubble.text_content().as_deref() != Some(state.word) {
            bubble.set_text_content(Some(state.word));
        }
        set_class(&bubble, "fade-in", state.state == BubbleState::Visible);
        set_class(&bubble, "fade-out", state.state == BubbleState::FadingOut);
    })
}

/// Tilt, tint and drag-to-move for every sticky note.
pub(super) fn setup_sticky_notes() -> Result<(), WebError> {
    let (window, document) = document()?;
    let nodes = document.query_selector_all(NOTE_SELECTOR)?;
    let mut rng = SmallRng::seed_from_u64((js_sys::Math::random() * u32::MAX as f64) as u64);

    let mut count = 0;
    for note in (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
    {
        let look = NoteLook::pick(&note.id(), &mut rng);
        set_style(&note, "transform", &look.transform());
        if let Some(paper) = look.paper {
            set_style(&note, "--sticky-note-bg", &paper.background());
            set_style(&note, "--sticky-note-bg-hover", &paper.hover());
        }
        make_draggable(&window, &document, note)?;
        count += 1;
    }
    log::info!("{} sticky notes ready", count);
    Ok(())
}

fn make_draggable(
    window: &web_sys::Window,
    document: &Document,
    note: HtmlElement,
) -> Result<(), WebError> {
    let drag = Rc::new(RefCell::new(NoteDrag::new()));

    {
        let (drag, target) = (drag.clone(), note.clone());
        listen(&note, "pointerdown", move |event: Event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let on_control = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|element| element.closest(NOTE_CONTROLS_SELECTOR).ok().flatten())
                .is_some();
            let origin = client_rect(&target).origin();
            let mut drag = drag.borrow_mut();
            if drag.start(mouse_client(mouse), origin, on_control) {
                set_class(&target, "dragging", true);
                set_style(&target, "z-index", &drag.z_index().to_string());
                event.prevent_default();
            }
        })?;
    }

    {
        let (drag, target, window) = (drag.clone(), note.clone(), window.clone());
        listen(document, "pointermove", move |event: Event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            if !drag.borrow().is_dragging() {
                return;
            }
            event.prevent_default();
            if !drag.borrow_mut().move_to(mouse_client(mouse)) {
                return;
            }
            // Apply only the latest position once per frame.
            let (drag, target) = (drag.clone(), target.clone());
            let callback = Closure::once_into_js(move |_timestamp: f64| {
                if let Some(at) = drag.borrow_mut().take_frame() {
                    set_style(&target, "left", &format!("{}px", at.x));
                    set_style(&target, "top", &format!("{}px", at.y));
                }
            });
            if let Err(err) = window.request_animation_frame(callback.unchecked_ref()) {
                log::warn!("requestAnimationFrame failed for note drag: {:?}", err);
            }
        })?;
    }

    listen(document, "pointerup", move |_| {
        let mut drag = drag.borrow_mut();
        if drag.end() {
            set_class(&note, "dragging", false);
            set_style(&note, "z-index", &drag.z_index().to_string());
        }
    })
}

/// DOM side of a zoom viewer.
#[derive(Clone)]
struct ViewerDom {
    container: HtmlElement,
    image: HtmlImageElement,
    label: Option<Element>,
    zoom_out: Option<HtmlElement>,
    zoom_in: Option<HtmlElement>,
}

impl ViewerDom {
    fn apply(&self, viewer: &ZoomViewer) {
        let scaled = viewer.scaled_size();
        set_style(&self.image, "width", &format!("{}px", scaled.width));
        set_style(&self.image, "height", &format!("{}px", scaled.height));
        self.container
            .scroll_to_with_x_and_y(viewer.scroll.x, viewer.scroll.y);
        set_style(&self.container, "cursor", viewer.cursor());

        if let Some(label) = &self.label {
            label.set_text_content(Some(&viewer.label()));
        }
        let buttons = [
            (&self.zoom_out, viewer.can_zoom_out()),
            (&self.zoom_in, viewer.can_zoom_in()),
        ];
        for (button, enabled) in buttons {
            if let Some(button) = button {
                set_style(button, "opacity", if enabled { "1" } else { "0.5" });
                set_style(button, "cursor", if enabled { "pointer" } else { "not-allowed" });
            }
        }
    }

    fn viewport(&self) -> Size {
        Size::new(
            self.container.client_width() as f64,
            self.container.client_height() as f64,
        )
    }

    fn image_size(&self) -> Size {
        Size::new(
            self.image.natural_width() as f64,
            self.image.natural_height() as f64,
        )
    }
}

fn two_touches(event: &TouchEvent, container: &Element) -> Option<(Point, Point)> {
    let touches = event.touches();
    if touches.length() != 2 {
        return None;
    }
    let a = touches.get(0)?;
    let b = touches.get(1)?;
    Some((
        local_point(touch_client(&a), container),
        local_point(touch_client(&b), container),
    ))
}

/// Pan/zoom for a project image inside a scroll container.
pub(super) fn setup_zoom_viewer(container_id: &str, image_id: &str) -> Result<(), WebError> {
    let (_window, document) = document()?;
    let dom = ViewerDom {
        container: get_element(&document, container_id)?,
        image: get_element(&document, image_id)?,
        label: query(&document, ".zoom-level").ok(),
        zoom_out: query(&document, ".zoom-btn:first-of-type").ok(),
        zoom_in: query(&document, ".zoom-btn:last-of-type").ok(),
    };
    let viewer = Rc::new(RefCell::new(ZoomViewer::new(dom.viewport(), dom.image_size())));
    dom.apply(&viewer.borrow());

    // Natural size is only known once the image has loaded.
    {
        let (dom_cb, viewer) = (dom.clone(), viewer.clone());
        listen(&dom.image, "load", move |_| {
            let mut viewer = viewer.borrow_mut();
            viewer.image = dom_cb.image_size();
            viewer.viewport = dom_cb.viewport();
            viewer.set_zoom(DEFAULT_ZOOM);
            dom_cb.apply(&viewer);
        })?;
    }

    {
        let (dom_cb, viewer) = (dom.clone(), viewer.clone());
        listen(&dom.container, "wheel", move |event: Event| {
            let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
                return;
            };
            let at = local_point(mouse_client(wheel), &dom_cb.container);
            let mut viewer = viewer.borrow_mut();
            if viewer.wheel(wheel.delta_y(), wheel.ctrl_key() || wheel.meta_key(), at) {
                event.prevent_default();
                dom_cb.apply(&viewer);
            }
        })?;
    }

    {
        let (dom_cb, viewer) = (dom.clone(), viewer.clone());
        listen(&dom.container, "touchstart", move |event: Event| {
            let Some(touch) = event.dyn_ref::<TouchEvent>() else {
                return;
            };
            if let Some((a, b)) = two_touches(touch, &dom_cb.container) {
                viewer.borrow_mut().pinch_start(a, b);
            }
        })?;
    }

    {
        let (dom_cb, viewer) = (dom.clone(), viewer.clone());
        listen(&dom.container, "touchmove", move |event: Event| {
            let Some(touch) = event.dyn_ref::<TouchEvent>() else {
                return;
            };
            if let Some((a, b)) = two_touches(touch, &dom_cb.container) {
                event.prevent_default();
                let mut viewer = viewer.borrow_mut();
                viewer.pinch_move(a, b);
                dom_cb.apply(&viewer);
            }
        })?;
    }

    {
        let viewer = viewer.clone();
        listen(&dom.container, "touchend", move |_| viewer.borrow_mut().pinch_end())?;
    }

    {
        let (dom_cb, viewer) = (dom.clone(), viewer.clone());
        listen(&dom.container, "mousedown", move |event: Event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let mut viewer = viewer.borrow_mut();
            if viewer.drag_start(mouse_client(mouse)) {
                event.prevent_default();
                dom_cb.apply(&viewer);
            }
        })?;
    }

    {
        let (dom_cb, viewer) = (dom.clone(), viewer.clone());
        listen(&document, "mousemove", move |event: Event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let mut viewer = viewer.borrow_mut();
            if viewer.is_dragging() {
                viewer.drag_move(mouse_client(mouse));
                dom_cb.apply(&viewer);
            }
        })?;
    }

    {
        let (dom_cb, viewer) = (dom.clone(), viewer.clone());
        listen(&document, "mouseup", move |_| {
            let mut viewer = viewer.borrow_mut();
            if viewer.is_dragging() {
                viewer.drag_end();
                dom_cb.apply(&viewer);
            }
        })?;
    }

    let buttons = [
        (dom.zoom_out.clone(), ZoomViewer::zoom_out as fn(&mut ZoomViewer)),
        (dom.zoom_in.clone(), ZoomViewer::zoom_in),
    ];
    for (button, action) in buttons {
        let Some(button) = button else {
            continue;
        };
        let (dom_cb, viewer) = (dom.clone(), viewer.clone());
        listen(&button, "click", move |_| {
            let mut viewer = viewer.borrow_mut();
            action(&mut viewer);
            dom_cb.apply(&viewer);
        })?;
    }

    log::info!("Zoom viewer attached to #{}", container_id);
    Ok(())
}
