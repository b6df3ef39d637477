use super::dom;
use super::locale;
use crate::broadcast::{self, Broadcast, Versioned};
use crate::config::SiteConfig;
use crate::i18n::{Language, TranslationStore};
use crate::logging::{log_event, LogLevel};
use crate::prefs::{self, PreferenceStore};
use crate::visibility::{Reveal, VisibilityHub};
use std::cell::RefCell;
use std::ops::Deref;
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};
use yew::UseStateHandle;

const VISIBILITY_KEY_ATTR: &str = "data-visibility-key";
const SKILL_REVEAL_DELAY_MS: u32 = 100;

/// `localStorage`, silently ignoring unavailable storage.
pub struct LocalStore;

impl PreferenceStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        dom::local_storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = dom::local_storage() {
            let _ = storage.set_item(key, value);
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct SiteSnapshot {
    pub language: Language,
    pub translations: Rc<TranslationStore>,
}

/// Page-session state shared by the shell wiring and the Yew views.
pub struct Site {
    pub config: SiteConfig,
    pub store: LocalStore,
    state: RefCell<Broadcast<SiteSnapshot>>,
    visibility: RefCell<VisibilityHub>,
    fade_observer: RefCell<Option<IntersectionObserver>>,
    skill_observer: RefCell<Option<IntersectionObserver>>,
}

#[derive(Clone)]
pub struct SiteHandle(Rc<Site>);

impl PartialEq for SiteHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for SiteHandle {
    type Target = Site;

    fn deref(&self) -> &Site {
        &self.0
    }
}

impl SiteHandle {
    pub fn new(config: SiteConfig) -> Self {
        let store = LocalStore;
        let language = prefs::load_language(&store, dom::browser_locale().as_deref());

        let handle = Self(Rc::new(Site {
            config,
            store,
            state: RefCell::new(Broadcast::new(SiteSnapshot {
                language,
                translations: Rc::new(TranslationStore::default()),
            })),
            visibility: RefCell::new(VisibilityHub::default()),
            fade_observer: RefCell::new(None),
            skill_observer: RefCell::new(None),
        }));
        handle.install_observers();
        handle
    }

    pub fn language(&self) -> Language {
        self.state.borrow().latest().value.language
    }

    pub fn snapshot(&self) -> Versioned<SiteSnapshot> {
        self.state.borrow().latest().clone()
    }

    pub fn translations(&self) -> Rc<TranslationStore> {
        self.state.borrow().latest().value.translations.clone()
    }

    /// Keeps `view` on the latest snapshot, including any change published
    /// after it was first read.
    pub fn follow(&self, view: UseStateHandle<Versioned<SiteSnapshot>>) {
        let seen = view.revision;
        broadcast::follow(&self.state, seen, Rc::new(move |next: Versioned<SiteSnapshot>| view.set(next)));
    }

    pub fn set_translations(&self, store: TranslationStore) {
        let language = self.language();
        broadcast::notify(
            &self.state,
            SiteSnapshot {
                language,
                translations: Rc::new(store),
            },
        );
        locale::apply(self, language);
    }

    pub fn change_language(&self, language: Language) {
        if language == self.language() {
            return;
        }

        prefs::persist_language(&self.store, language);
        let translations = self.translations();
        broadcast::notify(&self.state, SiteSnapshot { language, translations });
        locale::apply(self, language);
        log_event(
            LogLevel::Debug,
            "language_changed",
            serde_json::json!({ "language": language.as_str() }),
        );
    }

    /// Adds `fade-in` and watches the element until the page unloads.
    pub fn observe_fade_in(&self, element: &Element) {
        dom::toggle_class(element, "fade-in", true);
        if self.subscribe_reveal(element, Reveal::FadeIn) {
            if let Some(observer) = self.fade_observer.borrow().as_ref() {
                observer.observe(element);
            }
        }
    }

    pub fn observe_skill_bar(&self, element: &Element) {
        if self.subscribe_reveal(element, Reveal::SkillBar) {
            if let Some(observer) = self.skill_observer.borrow().as_ref() {
                observer.observe(element);
            }
        }
    }

    fn subscribe_reveal(&self, element: &Element, reveal: Reveal) -> bool {
        let existing = element
            .get_attribute(VISIBILITY_KEY_ATTR)
            .and_then(|value| value.parse::<u32>().ok());
        let attachment = self.visibility.borrow_mut().attach(existing, reveal);
        if existing.is_none() {
            let _ = element.set_attribute(VISIBILITY_KEY_ATTR, &attachment.key.to_string());
        }
        attachment.fresh
    }

    fn install_observers(&self) {
        let fade = self.build_observer(Reveal::FadeIn, 0.1, Some("0px 0px -50px 0px"));
        let skill = self.build_observer(Reveal::SkillBar, 0.3, None);
        *self.fade_observer.borrow_mut() = fade;
        *self.skill_observer.borrow_mut() = skill;
    }

    fn build_observer(&self, reveal: Reveal, threshold: f64, root_margin: Option<&str>) -> Option<IntersectionObserver> {
        let site = Rc::downgrade(&self.0);
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                let Some(site) = site.upgrade() else {
                    return;
                };

                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }

                    let target = entry.target();
                    let Some(key) = target
                        .get_attribute(VISIBILITY_KEY_ATTR)
                        .and_then(|value| value.parse::<u32>().ok())
                    else {
                        continue;
                    };

                    let fired = site.visibility.borrow_mut().became_visible(key, reveal);
                    match fired {
                        Some(Reveal::FadeIn) => dom::toggle_class(&target, "visible", true),
                        Some(Reveal::SkillBar) => {
                            reveal_skill_bar(&target);
                            observer.unobserve(&target);
                        }
                        None => {}
                    }
                }
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold));
        if let Some(margin) = root_margin {
            options.set_root_margin(margin);
        }

        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options).ok();
        callback.forget();
        observer
    }
}

fn reveal_skill_bar(item: &Element) {
    let Some(bar) = dom::query_within(item, ".skill-progress") else {
        return;
    };
    let Some(width) = bar
        .get_attribute("data-progress")
        .and_then(|progress| crate::motion::skill_width(&progress))
    else {
        return;
    };

    gloo_timers::callback::Timeout::new(SKILL_REVEAL_DELAY_MS, move || {
        dom::set_style(&bar, "width", &width);
    })
    .forget();
}
