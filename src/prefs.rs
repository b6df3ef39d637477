use crate::i18n::{self, Language};
use std::cell::RefCell;
use std::collections::HashMap;

pub const THEME_KEY: &str = "theme";
pub const LANGUAGE_KEY: &str = "language";
pub const VIEW_KEY: &str = "projectsView";

/// String key/value persistence, backed by `localStorage` in the browser.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn toggle_label(self, language: Language) -> String {
        let next = self.toggled().as_str();
        match language {
            Language::Es => format!("Cambiar al tema {next}"),
            Language::En => format!("Switch to {next} theme"),
        }
    }

    pub fn pressed(self) -> bool {
        matches!(self, Self::Dark)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    List,
    Grid,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Grid => "grid",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "list" => Some(Self::List),
            "grid" => Some(Self::Grid),
            _ => None,
        }
    }

    pub fn is_grid(self) -> bool {
        matches!(self, Self::Grid)
    }
}

pub fn load_theme(store: &impl PreferenceStore, system_prefers_dark: bool) -> Theme {
    store
        .get(THEME_KEY)
        .as_deref()
        .and_then(Theme::from_str)
        .unwrap_or(if system_prefers_dark { Theme::Dark } else { Theme::Light })
}

/// Resolves the startup theme and writes it back, so a system-derived theme
/// sticks on later visits.
pub fn init_theme(store: &impl PreferenceStore, system_prefers_dark: bool) -> Theme {
    let theme = load_theme(store, system_prefers_dark);
    persist_theme(store, theme);
    theme
}

pub fn persist_theme(store: &impl PreferenceStore, theme: Theme) {
    store.set(THEME_KEY, theme.as_str());
}

pub fn load_language(store: &impl PreferenceStore, browser_locale: Option<&str>) -> Language {
    i18n::select_language(store.get(LANGUAGE_KEY).as_deref(), browser_locale)
}

pub fn persist_language(store: &impl PreferenceStore, language: Language) {
    store.set(LANGUAGE_KEY, language.as_str());
}

pub fn load_view(store: &impl PreferenceStore) -> ViewMode {
    store
        .get(VIEW_KEY)
        .as_deref()
        .and_then(ViewMode::from_str)
        .unwrap_or_default()
}

pub fn persist_view(store: &impl PreferenceStore, view: ViewMode) {
    store.set(VIEW_KEY, view.as_str());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_theme_overrides_system_preference() {
        let store = MemoryStore::default();
        persist_theme(&store, Theme::Light);
        assert_eq!(load_theme(&store, true), Theme::Light);
    }

    #[test]
    fn system_preference_applies_without_stored_theme() {
        let store = MemoryStore::default();
        assert_eq!(load_theme(&store, true), Theme::Dark);
        assert_eq!(load_theme(&store, false), Theme::Light);

        store.set(THEME_KEY, "sepia");
        assert_eq!(load_theme(&store, false), Theme::Light);
    }

    #[test]
    fn startup_theme_is_persisted_even_when_derived_from_system() {
        let store = MemoryStore::default();
        assert_eq!(init_theme(&store, true), Theme::Dark);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(init_theme(&store, false), Theme::Dark);

        store.set(THEME_KEY, "sepia");
        assert_eq!(init_theme(&store, false), Theme::Light);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn toggle_alternates_between_two_themes() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggle_label(Language::En), "Switch to dark theme");
    }

    #[test]
    fn view_defaults_to_list_and_round_trips_through_store() {
        let store = MemoryStore::default();
        assert_eq!(load_view(&store), ViewMode::List);

        persist_view(&store, ViewMode::Grid);
        assert_eq!(store.get(VIEW_KEY).as_deref(), Some("grid"));
        assert!(load_view(&store).is_grid());
    }

    #[test]
    fn language_uses_store_then_locale() {
        let store = MemoryStore::default();
        assert_eq!(load_language(&store, Some("es-ES")), Language::Es);

        persist_language(&store, Language::En);
        assert_eq!(load_language(&store, Some("es-ES")), Language::En);
    }
}
