//! Language selection and the nested translation dictionary.
//!
//! The dictionary is a JSON object keyed by language code whose values are
//! arbitrarily nested string mappings. Lookups walk a dot-separated path and
//! only succeed when every segment resolves to a non-empty string leaf.

use serde_json::Value;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    Es,
    En,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
        }
    }

    pub fn from_code(value: &str) -> Option<Self> {
        match value {
            "es" => Some(Self::Es),
            "en" => Some(Self::En),
            _ => None,
        }
    }

    /// Maps a browser locale such as `es-UY` or `en-GB` onto a supported language.
    pub fn from_locale(locale: &str) -> Self {
        if locale.trim().to_ascii_lowercase().starts_with("es") {
            Self::Es
        } else {
            Self::En
        }
    }

    pub fn page_title(self, owner: &str) -> String {
        match self {
            Self::Es => format!("{owner} | Desarrollador Web"),
            Self::En => format!("{owner} | Web Developer"),
        }
    }

    pub fn meta_description(self) -> &'static str {
        match self {
            Self::Es => "Desarrollador web especializado en automatización e IA local. HTML, CSS, JavaScript, PostgreSQL, n8n, Docker y más.",
            Self::En => "Web developer specialized in automation and local AI. HTML, CSS, JavaScript, PostgreSQL, n8n, Docker and more.",
        }
    }

    pub fn sending_label(self) -> &'static str {
        match self {
            Self::Es => "Enviando...",
            Self::En => "Sending...",
        }
    }
}

/// Persisted choice wins when it names a supported language, otherwise the
/// browser locale decides.
pub fn select_language(persisted: Option<&str>, browser_locale: Option<&str>) -> Language {
    persisted
        .and_then(Language::from_code)
        .unwrap_or_else(|| browser_locale.map(Language::from_locale).unwrap_or(Language::En))
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TranslationStore {
    root: serde_json::Map<String, Value>,
}

impl TranslationStore {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let root = serde_json::from_str::<serde_json::Map<String, Value>>(raw)?;
        Ok(Self { root })
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }

    pub fn lookup(&self, language: Language, path: &str) -> Option<&str> {
        let mut node = self.root.get(language.as_str())?;

        for segment in path.split('.') {
            node = node.as_object()?.get(segment)?;
        }

        node.as_str().filter(|text| !text.is_empty())
    }

    pub fn text_or(&self, language: Language, path: &str, fallback: &str) -> String {
        self.lookup(language, path).unwrap_or(fallback).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TranslationStore {
        TranslationStore::from_json(
            r#"{
                "es": { "nav": { "home": "Inicio", "empty": "" }, "title": "Hola" },
                "en": { "nav": { "about": "About" } }
            }"#,
        )
        .expect("valid dictionary")
    }

    #[test]
    fn lookup_descends_every_segment() {
        assert_eq!(store().lookup(Language::Es, "nav.home"), Some("Inicio"));
    }

    #[test]
    fn lookup_missing_in_language_leaves_caller_with_nothing() {
        assert_eq!(store().lookup(Language::En, "nav.home"), None);
    }

    #[test]
    fn partial_paths_and_branch_nodes_do_not_resolve() {
        let store = store();
        assert_eq!(store.lookup(Language::Es, "nav"), None);
        assert_eq!(store.lookup(Language::Es, "title.extra"), None);
        assert_eq!(store.lookup(Language::Es, "nav.empty"), None);
    }

    #[test]
    fn empty_store_resolves_nothing() {
        let store = TranslationStore::default();
        assert!(store.is_empty());
        assert_eq!(store.lookup(Language::Es, "nav.home"), None);
        assert_eq!(store.text_or(Language::Es, "nav.home", "Home"), "Home");
    }

    #[test]
    fn non_object_document_is_rejected() {
        assert!(TranslationStore::from_json("[1, 2]").is_err());
    }

    #[test]
    fn persisted_language_beats_browser_locale() {
        assert_eq!(select_language(Some("en"), Some("es-AR")), Language::En);
    }

    #[test]
    fn unsupported_persisted_value_falls_back_to_locale() {
        assert_eq!(select_language(Some("fr"), Some("es-UY")), Language::Es);
        assert_eq!(select_language(None, Some("pt-BR")), Language::En);
        assert_eq!(select_language(None, None), Language::En);
    }
}
