use super::context::SiteHandle;
use super::dom;
use crate::config::CV_LINK_ATTRIBUTE;
use crate::i18n::{Language, TranslationStore};

/// Rewrites every translatable node of the static page for `language`.
/// Keys that do not fully resolve leave the existing markup in place, and
/// without a loaded dictionary only the fixed per-language literals change.
pub fn apply(site: &SiteHandle, language: Language) {
    let store = site.translations();
    if !store.is_empty() {
        translate_tagged(&store, language);
    }

    let Some(document) = dom::document() else {
        return;
    };

    if let Some(root) = document.document_element() {
        let _ = root.set_attribute("lang", language.as_str());
    }
    document.set_title(&language.page_title(&site.config.site_owner));
    if let Some(meta) = dom::query("meta[name=\"description\"]") {
        let _ = meta.set_attribute("content", language.meta_description());
    }

    let cv_path = site.config.cv_path(language);
    for link in dom::query_all(&site.config.cv_link_selector()) {
        let _ = link.set_attribute("href", cv_path);
        let _ = link.set_attribute(CV_LINK_ATTRIBUTE, "");
    }

    mark_active_option(language);
}

fn translate_tagged(store: &TranslationStore, language: Language) {
    for element in dom::query_all("[data-i18n]") {
        let Some(key) = element.get_attribute("data-i18n") else {
            continue;
        };
        if let Some(text) = store.lookup(language, &key) {
            element.set_text_content(Some(text));
        }
    }

    for element in dom::query_all("[data-i18n-placeholder]") {
        let Some(key) = element.get_attribute("data-i18n-placeholder") else {
            continue;
        };
        if let Some(text) = store.lookup(language, &key) {
            let _ = element.set_attribute("placeholder", text);
        }
    }
}

pub fn mark_active_option(language: Language) {
    for option in dom::query_all(".lang-option") {
        let active = option.get_attribute("data-lang").as_deref() == Some(language.as_str());
        dom::toggle_class(&option, "active", active);
    }
}
