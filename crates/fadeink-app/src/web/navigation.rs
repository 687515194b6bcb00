//! Section navigation and project detail views.

use super::{WebError, listen, page, set_class, set_style};
use fadeink_core::navigation::{Navigator, Route, Transition};
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement};

const PAGE_SELECTOR: &str = ".page-content";
const NAV_ITEM_SELECTOR: &str = ".nav-item";
const NAV_MENU_SELECTOR: &str = ".nav-menu";
const HOME_LINK_SELECTOR: &str = ".home-link";
const PROJECT_BOX_SELECTOR: &str = ".project-box";
const PROJECT_DETAIL_ID: &str = "projectDetailPage";

thread_local! {
    static NAVIGATOR: RefCell<Navigator> = RefCell::new(Navigator::new());
}

fn elements(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Bring the page in line with a route change.
///
/// The doodle layer is only touched when its visibility changes, or when
/// `force_doodles` is set on first load.
fn render(transition: &Transition, force_doodles: bool) {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        log::warn!("Navigation without a document");
        return;
    };
    let route = &transition.to;

    for page in elements(&document, PAGE_SELECTOR) {
        set_class(&page, "active", false);
    }
    let section_name = route.section().map(|section| section.name());
    for item in elements(&document, NAV_ITEM_SELECTOR) {
        let active = section_name
            .is_some_and(|name| item.get_attribute("data-page").as_deref() == Some(name));
        set_class(&item, "active", active);
    }

    let page_id = match route.section() {
        Some(section) => section.element_id(),
        None => PROJECT_DETAIL_ID.to_string(),
    };
    match document.get_element_by_id(&page_id) {
        Some(page) => set_class(&page, "active", true),
        None => log::warn!("Page '{}' not found", page_id),
    }

    document.set_title(&route.title());

    if let Some(menu) = document
        .query_selector(NAV_MENU_SELECTOR)
        .ok()
        .flatten()
        .and_then(|menu| menu.dyn_into::<HtmlElement>().ok())
    {
        set_style(&menu, "display", if route.shows_nav_menu() { "flex" } else { "none" });
    }

    if force_doodles || transition.doodles_changed() {
        let visible = route.shows_doodles();
        page::with_page(|page| page.set_visible(visible));
    }
    log::info!("Showing {:?}", route);
}

/// Show a section by its `data-page` name.
pub(super) fn navigate_to(name: &str) {
    let transition = NAVIGATOR.with(|nav| nav.borrow_mut().navigate_to_name(name));
    if let Some(transition) = transition {
        render(&transition, false);
    }
}

/// Show the detail view of one project.
pub(super) fn open_project(id: &str) {
    let route = Route::Project(id.to_string());
    let transition = NAVIGATOR.with(|nav| nav.borrow_mut().navigate(route));
    render(&transition, false);
}

/// Wire nav items, the home link and project boxes, then show the route the
/// page was opened with.
pub(super) fn setup() -> Result<(), WebError> {
    let window = web_sys::window().ok_or(WebError::NoWindow)?;
    let document = window.document().ok_or(WebError::NoDocument)?;

    for item in elements(&document, NAV_ITEM_SELECTOR) {
        let Some(name) = item.get_attribute("data-page") else {
            continue;
        };
        listen(&item, "click", move |_| navigate_to(&name))?;
    }

    if let Some(home) = document.query_selector(HOME_LINK_SELECTOR)? {
        listen(&home, "click", move |event: Event| {
            event.prevent_default();
            navigate_to("home");
        })?;
    }

    for project in elements(&document, PROJECT_BOX_SELECTOR) {
        let Some(id) = project.get_attribute("data-project") else {
            log::warn!("Project box without data-project");
            continue;
        };
        listen(&project, "click", move |_| open_project(&id))?;
    }

    let hash = window.location().hash().unwrap_or_default();
    let transition = NAVIGATOR.with(|nav| nav.borrow_mut().navigate(Route::from_hash(&hash)));
    render(&transition, true);
    Ok(())
}
