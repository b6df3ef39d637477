use super::dom;
use crate::i18n::Language;
use crate::prefs::{self, PreferenceStore, Theme};
use js_sys::{Function, Reflect};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::Element;

const THEME_ATTRIBUTE: &str = "data-theme";

pub fn system_prefers_dark() -> bool {
    dom::media_matches("(prefers-color-scheme: dark)")
}

fn prefers_reduced_motion() -> bool {
    dom::media_matches("(prefers-reduced-motion: reduce)")
}

/// The theme currently on the document root.
pub fn current() -> Theme {
    dom::document()
        .and_then(|document| document.document_element())
        .and_then(|root| root.get_attribute(THEME_ATTRIBUTE))
        .and_then(|value| Theme::from_str(&value))
        .unwrap_or(Theme::Light)
}

pub fn apply(theme: Theme) {
    if let Some(root) = dom::document().and_then(|document| document.document_element()) {
        let _ = root.set_attribute(THEME_ATTRIBUTE, theme.as_str());
    }
}

pub fn apply_with_transition(theme: Theme) {
    if prefers_reduced_motion() {
        apply(theme);
        return;
    }

    let Some(document) = dom::document() else {
        apply(theme);
        return;
    };

    let document_js: JsValue = document.into();
    let Ok(start_view_transition) = Reflect::get(&document_js, &JsValue::from_str("startViewTransition")) else {
        apply(theme);
        return;
    };

    let Some(start_view_transition) = start_view_transition.dyn_ref::<Function>() else {
        apply(theme);
        return;
    };

    let callback = Closure::once_into_js(move || apply(theme));
    if start_view_transition.call1(&document_js, &callback).is_err() {
        apply(theme);
    }
}

pub fn label_toggle(toggle: &Element, theme: Theme, language: Language) {
    let _ = toggle.set_attribute("aria-label", &theme.toggle_label(language));
    let _ = toggle.set_attribute("aria-pressed", if theme.pressed() { "true" } else { "false" });
}

/// Applies the persisted or system theme without animating, and persists it.
pub fn init(store: &impl PreferenceStore, language: Language) {
    let theme = prefs::init_theme(store, system_prefers_dark());
    apply(theme);
    if let Some(toggle) = dom::by_id("theme-toggle") {
        label_toggle(&toggle, theme, language);
    }
}
