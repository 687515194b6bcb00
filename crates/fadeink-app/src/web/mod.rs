//! WebAssembly entry point and platform-specific code.

mod host;
mod navigation;
mod page;
mod surface;
mod widgets;

use crate::layer::DoodleLayer;
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

pub use host::WebHost;
pub use surface::WebSurface;

/// The doodle layer as it runs in the browser.
pub type WebLayer = DoodleLayer<WebSurface, WebHost>;

/// Page setup errors.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("element '{0}' not found")]
    MissingElement(String),
    #[error("element '{0}' has an unexpected type")]
    WrongElement(String),
    #[error("2D canvas context unavailable")]
    NoContext,
    #[error("JavaScript error: {0}")]
    Js(String),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        WebError::Js(format!("{:?}", value))
    }
}

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"FadeInk logger already initialized".into());
    }

    log::info!("Starting FadeInk (WASM)");

    if let Err(err) = page::setup() {
        log::warn!("Doodle layer unavailable: {}", err);
    }
    if let Err(err) = navigation::setup() {
        log::warn!("Navigation unavailable: {}", err);
    }
    if let Err(err) = widgets::setup_sticky_notes() {
        log::warn!("Sticky notes unavailable: {}", err);
    }
    if let Err(err) = widgets::setup_greeting() {
        log::warn!("Greeting unavailable: {}", err);
    }
    if let Err(err) = widgets::setup_cursor_bubble() {
        log::warn!("Cursor bubble unavailable: {}", err);
    }
}

/// Remove every doodle from the page.
#[wasm_bindgen]
pub fn clear_doodles() {
    page::with_page(|page| page.layer.borrow_mut().clear_all());
}

/// Show a section by name (`home`, `about`, `works`, `resume`, `naytv`).
#[wasm_bindgen]
pub fn navigate_to_page(name: &str) {
    navigation::navigate_to(name);
}

/// Show the detail view of a project.
#[wasm_bindgen]
pub fn open_project(id: &str) {
    navigation::open_project(id);
}

/// Attach the pan/zoom image viewer to a project image.
#[wasm_bindgen]
pub fn init_zoom_viewer(container_id: &str, image_id: &str) {
    if let Err(err) = widgets::setup_zoom_viewer(container_id, image_id) {
        log::warn!("Zoom viewer unavailable: {}", err);
    }
}

/// Look up an element by id and cast it.
fn get_element<T: JsCast>(document: &web_sys::Document, id: &str) -> Result<T, WebError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| WebError::MissingElement(id.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| WebError::WrongElement(id.to_string()))
}

/// First element matching a CSS selector, cast.
fn query<T: JsCast>(document: &web_sys::Document, selector: &str) -> Result<T, WebError> {
    document
        .query_selector(selector)?
        .ok_or_else(|| WebError::MissingElement(selector.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| WebError::WrongElement(selector.to_string()))
}

/// Attach a listener for the lifetime of the page.
fn listen(
    target: &web_sys::EventTarget,
    kind: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), WebError> {
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Call `tick` every `interval_ms` for the lifetime of the page.
fn every(
    window: &web_sys::Window,
    interval_ms: i32,
    tick: impl FnMut() + 'static,
) -> Result<(), WebError> {
    let closure = Closure::<dyn FnMut()>::new(tick);
    window.set_interval_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        interval_ms,
    )?;
    closure.forget();
    Ok(())
}

fn set_class(element: &web_sys::Element, class: &str, on: bool) {
    if let Err(err) = element.class_list().toggle_with_force(class, on) {
        log::warn!("Failed to toggle class '{}': {:?}", class, err);
    }
}

fn set_style(element: &web_sys::HtmlElement, property: &str, value: &str) {
    if let Err(err) = element.style().set_property(property, value) {
        log::warn!("Failed to set style '{}': {:?}", property, err);
    }
}

fn client_rect(element: &web_sys::Element) -> kurbo::Rect {
    let rect = element.get_bounding_client_rect();
    kurbo::Rect::new(rect.left(), rect.top(), rect.right(), rect.bottom())
}

/// A client (viewport) position relative to `element`.
fn local_point(client: kurbo::Point, element: &web_sys::Element) -> kurbo::Point {
    client - client_rect(element).origin().to_vec2()
}

fn mouse_client(event: &web_sys::MouseEvent) -> kurbo::Point {
    kurbo::Point::new(event.client_x() as f64, event.client_y() as f64)
}

fn touch_client(touch: &web_sys::Touch) -> kurbo::Point {
    kurbo::Point::new(touch.client_x() as f64, touch.client_y() as f64)
}
