//! Guarded access to the host page. Every lookup is optional; a missing
//! element turns the caller into a no-op.

use crate::motion::Rect;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, HtmlElement, Storage, Window};

pub fn win() -> Option<Window> {
    window()
}

pub fn document() -> Option<Document> {
    window()?.document()
}

pub fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok().flatten()
}

pub fn by_id(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

pub fn query(selector: &str) -> Option<Element> {
    document()?.query_selector(selector).ok().flatten()
}

pub fn query_all(selector: &str) -> Vec<Element> {
    let Some(list) = document().and_then(|doc| doc.query_selector_all(selector).ok()) else {
        return Vec::new();
    };

    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn query_within(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

/// Builds a detached element with attributes and optional text.
pub fn el(tag: &str, attrs: &[(&str, &str)], text: &str) -> Option<Element> {
    let element = document()?.create_element(tag).ok()?;
    for (name, value) in attrs {
        let _ = element.set_attribute(name, value);
    }
    if !text.is_empty() {
        element.set_text_content(Some(text));
    }
    Some(element)
}

pub fn set_text_by_id(id: &str, text: &str) {
    if let Some(element) = by_id(id) {
        element.set_text_content(Some(text));
    }
}

pub fn clear_children(id: &str) {
    if let Some(element) = by_id(id) {
        element.set_inner_html("");
    }
}

pub fn toggle_class(element: &Element, class: &str, enabled: bool) {
    let _ = element.class_list().toggle_with_force(class, enabled);
}

pub fn has_class(element: &Element, class: &str) -> bool {
    element.class_list().contains(class)
}

pub fn set_style(element: &Element, property: &str, value: &str) {
    if let Some(element) = element.dyn_ref::<HtmlElement>() {
        let _ = element.style().set_property(property, value);
    }
}

pub fn body_overflow(value: &str) {
    if let Some(body) = document().and_then(|doc| doc.body()) {
        let _ = body.style().set_property("overflow", value);
    }
}

pub fn rect(element: &Element) -> Rect {
    let bounds = element.get_bounding_client_rect();
    Rect {
        left: bounds.left(),
        top: bounds.top(),
        width: bounds.width(),
        height: bounds.height(),
    }
}

pub fn viewport_width() -> f64 {
    window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|value| value.as_f64())
        .unwrap_or(1280.0)
}

pub fn scroll_y() -> f64 {
    window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

pub fn media_matches(query: &str) -> bool {
    window()
        .and_then(|w| w.match_media(query).ok().flatten())
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

pub fn browser_locale() -> Option<String> {
    window()?.navigator().language()
}

/// Whether `target` sits inside `container`.
pub fn contains(container: &Element, target: Option<&web_sys::EventTarget>) -> bool {
    target
        .and_then(|target| target.dyn_ref::<web_sys::Node>())
        .is_some_and(|node| container.contains(Some(node)))
}
