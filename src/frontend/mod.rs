mod activity;
mod context;
mod dom;
mod locale;
mod projects;
mod shell;
mod theme;

use crate::config::SiteConfig;
use crate::gallery::Direction;
use crate::i18n::TranslationStore;
use crate::logging::{self, log_event, LogLevel};
use crate::modal::{ModalAction, ModalState};
use crate::model::{project_list_view, CardLabels, ProjectListView, ProjectRecord};
use activity::ActivityWidget;
use context::SiteHandle;
use gloo_events::EventListener;
use gloo_net::http::Request;
use projects::{ModalBody, ProjectList};
use wasm_bindgen::JsCast;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, KeyboardEvent, RequestCache};
use yew::prelude::*;

const APP_ROOT: &str = "app";
const PROJECTS_HOST: &str = "projects-list";
const MODAL: &str = "project-modal";
const MODAL_BODY: &str = "modal-body";
const REPOS_HOST: &str = "repos-list";

#[derive(Properties, PartialEq)]
struct AppProps {
    site: SiteHandle,
}

impl Reducible for ModalState {
    type Action = ModalAction;

    fn reduce(self: Rc<Self>, action: ModalAction) -> Rc<Self> {
        Rc::new((*self).apply(action))
    }
}

fn portal(host: &Option<Element>, content: Html) -> Html {
    match host {
        Some(host) => create_portal(content, host.clone()),
        None => Html::default(),
    }
}

fn set_modal_visible(visible: bool) {
    if let Some(modal) = dom::by_id(MODAL) {
        dom::toggle_class(&modal, "active", visible);
    }
    dom::body_overflow(if visible { "hidden" } else { "" });
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let site = props.site.clone();
    let snapshot = {
        let site = site.clone();
        use_state(move || site.snapshot())
    };
    let records = use_state(|| None::<Vec<ProjectRecord>>);
    let modal = use_reducer(ModalState::default);
    let hosts = use_memo((), |_| {
        (
            dom::by_id(PROJECTS_HOST),
            dom::by_id(MODAL_BODY),
            dom::by_id(REPOS_HOST),
        )
    });

    {
        let site = site.clone();
        let snapshot = snapshot.clone();
        use_effect_with((), move |_| {
            site.follow(snapshot);
            || ()
        });
    }

    {
        let records = records.clone();
        let path = site.config.projects_path.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                records.set(Some(projects::fetch_projects(&path).await));
            });
            || ()
        });
    }

    let close = {
        let modal = modal.dispatcher();
        Callback::from(move |_: ()| modal.dispatch(ModalAction::Close))
    };

    {
        let close = close.clone();
        use_effect_with(modal.is_open(), move |open| {
            set_modal_visible(*open);

            let mut listeners = Vec::new();
            if *open {
                if let Some(document) = dom::document() {
                    let close = close.clone();
                    listeners.push(EventListener::new(&document, "keydown", move |event| {
                        let escape = event
                            .dyn_ref::<KeyboardEvent>()
                            .is_some_and(|event| event.key() == "Escape");
                        if escape {
                            close.emit(());
                        }
                    }));
                }
                for selector in [".modal-close", ".modal-overlay"] {
                    if let Some(target) = dom::query(&format!("#{MODAL} {selector}")) {
                        let close = close.clone();
                        listeners.push(EventListener::new(&target, "click", move |_| close.emit(())));
                    }
                }
            }

            move || drop(listeners)
        });
    }

    let labels = CardLabels::resolve(&snapshot.value.translations, snapshot.value.language);
    let view = records
        .as_ref()
        .map(|records| project_list_view(records, snapshot.value.language, &labels));

    let on_open = {
        let modal = modal.dispatcher();
        let cards = match &view {
            Some(ProjectListView::Cards(cards)) => cards.clone(),
            _ => Vec::new(),
        };
        Callback::from(move |index: usize| {
            if let Some(card) = cards.get(index) {
                modal.dispatch(ModalAction::open(index, card));
            }
        })
    };
    let on_modal_step = {
        let modal = modal.dispatcher();
        Callback::from(move |direction: Direction| modal.dispatch(ModalAction::Step(direction)))
    };

    let list = match view.clone() {
        Some(view) => html! { <ProjectList {view} {on_open} /> },
        None => Html::default(),
    };

    let modal_card = match (modal.current(), view) {
        (Some(open), Some(ProjectListView::Cards(cards))) => cards.get(open.index).cloned().map(|card| {
            html! {
                <ModalBody key={open.opened} {card} gallery={open.gallery} on_step={on_modal_step} />
            }
        }),
        _ => None,
    };

    let (projects_host, modal_host, repos_host) = &*hosts;
    let activity = html! { <ActivityWidget site={site.clone()} /> };

    html! {
        <ContextProvider<SiteHandle> context={site}>
            {portal(projects_host, list)}
            {portal(modal_host, modal_card.unwrap_or_default())}
            {portal(repos_host, activity)}
        </ContextProvider<SiteHandle>>
    }
}

fn config_from_root() -> SiteConfig {
    let root = dom::document().and_then(|document| document.document_element());
    SiteConfig::from_lookup(|name| root.as_ref().and_then(|root| root.get_attribute(name)))
}

fn mount_point() -> Option<Element> {
    if let Some(root) = dom::by_id(APP_ROOT) {
        return Some(root);
    }
    let body = dom::document()?.body()?;
    let root = dom::el("div", &[("id", APP_ROOT), ("hidden", "")], "")?;
    body.append_child(&root).ok()?;
    Some(root)
}

async fn request_translations(path: &str) -> Result<TranslationStore, String> {
    let response = Request::get(path)
        .cache(RequestCache::NoStore)
        .send()
        .await
        .map_err(|err| err.to_string())?;

    if !response.ok() {
        return Err(format!("status {}", response.status()));
    }

    let raw = response.text().await.map_err(|err| err.to_string())?;
    TranslationStore::from_json(&raw).map_err(|err| err.to_string())
}

async fn load_translations(site: SiteHandle) {
    let path = site.config.translations_path.clone();
    match request_translations(&path).await {
        Ok(store) => site.set_translations(store),
        Err(error) => log_event(
            LogLevel::Error,
            "translations_load_failed",
            serde_json::json!({ "path": path, "error": error }),
        ),
    }
}

pub fn run() {
    let config = config_from_root();
    logging::set_level(config.log_level);

    let site = SiteHandle::new(config);
    theme::init(&site.store, site.language());
    locale::mark_active_option(site.language());
    shell::install(&site);

    for host in [PROJECTS_HOST, MODAL_BODY, REPOS_HOST] {
        dom::clear_children(host);
    }

    let Some(root) = mount_point() else {
        log_event(LogLevel::Error, "mount_failed", serde_json::json!({ "root": APP_ROOT }));
        return;
    };

    spawn_local(load_translations(site.clone()));
    yew::Renderer::<App>::with_root_and_props(root, AppProps { site }).render();
}
