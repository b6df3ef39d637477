use super::context::SiteHandle;
use super::dom;
use super::theme;
use crate::i18n::Language;
use crate::motion::{self, CursorFollower, SliderGeometry};
use crate::prefs::{self, ViewMode};
use gloo_events::{EventListener, EventListenerOptions};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Element, Event, HtmlButtonElement, HtmlElement, MouseEvent, ScrollBehavior, ScrollToOptions};

const CURSOR_STYLE: &str = ".cursor-follower{position:fixed;top:0;left:0;width:20px;height:20px;\
border-radius:50%;background:var(--accent, #6366f1);opacity:.5;pointer-events:none;z-index:9999;\
mix-blend-mode:difference;transition:transform .2s ease,opacity .2s ease;}";
const CURSOR_HOVER_TARGETS: &str = "a, button, .badge";
const FADE_TARGETS: &str = ".section, .card, .project-card, .skill-item";
const PROJECTS_HOST: &str = "projects-list";

/// Wires the static page around the Yew views. Called once per page.
pub fn install(site: &SiteHandle) {
    install_scroll_effects();
    install_menu();
    install_anchors();
    install_reveals(site);
    install_cursor();
    install_theme_toggle(site);
    install_language_options(site);
    install_view_toggle(site);
    install_contact_form(site);
    show_year();
}

fn listen(target: &impl AsRef<web_sys::EventTarget>, event: &'static str, handler: impl FnMut(&Event) + 'static) {
    EventListener::new(target.as_ref(), event, handler).forget();
}

fn install_scroll_effects() {
    let Some(window) = dom::win() else {
        return;
    };

    let navbar = dom::query(".navbar");
    let hint = dom::query(".scroll-indicator");
    let blobs = dom::query_all(".blob");

    listen(&window, "scroll", move |_| {
        let y = dom::scroll_y();
        if let Some(navbar) = navbar.as_ref() {
            dom::toggle_class(navbar, "scrolled", motion::navbar_scrolled(y));
        }
        if let Some(hint) = hint.as_ref() {
            let hidden = motion::scroll_hint_hidden(y);
            dom::set_style(hint, "opacity", if hidden { "0" } else { "1" });
            dom::set_style(hint, "pointer-events", if hidden { "none" } else { "auto" });
        }
        for (index, blob) in blobs.iter().enumerate() {
            let offset = motion::parallax_offset(y, index);
            dom::set_style(blob, "transform", &motion::translate_y(offset));
        }
    });
}

fn set_menu_open(toggle: &Element, panel: &Element, open: bool) {
    dom::toggle_class(toggle, "open", open);
    dom::toggle_class(panel, "open", open);
    let _ = toggle.set_attribute("aria-expanded", if open { "true" } else { "false" });
}

fn install_menu() {
    let (Some(toggle), Some(panel), Some(document), Some(window)) = (
        dom::query(".menu-toggle"),
        dom::by_id("site-nav"),
        dom::document(),
        dom::win(),
    ) else {
        return;
    };

    {
        let (toggle_el, panel) = (toggle.clone(), panel.clone());
        listen(&toggle, "click", move |event| {
            event.stop_propagation();
            let open = !dom::has_class(&panel, "open");
            set_menu_open(&toggle_el, &panel, open);
        });
    }

    {
        let (toggle, panel) = (toggle.clone(), panel.clone());
        listen(&document, "click", move |event| {
            if !dom::has_class(&panel, "open") {
                return;
            }
            let target = event.target();
            if !dom::contains(&panel, target.as_ref()) && !dom::contains(&toggle, target.as_ref()) {
                set_menu_open(&toggle, &panel, false);
            }
        });
    }

    {
        let (toggle, panel) = (toggle.clone(), panel.clone());
        listen(&window, "resize", move |_| {
            if !motion::is_narrow_viewport(dom::viewport_width()) {
                set_menu_open(&toggle, &panel, false);
            }
        });
    }

    for link in dom::query_all("#site-nav a") {
        let (toggle, panel) = (toggle.clone(), panel.clone());
        listen(&link, "click", move |_| {
            if motion::is_narrow_viewport(dom::viewport_width()) {
                set_menu_open(&toggle, &panel, false);
            }
        });
    }
}

fn install_anchors() {
    for anchor in dom::query_all("a[href^=\"#\"]") {
        let href = anchor.get_attribute("href").unwrap_or_default();
        let Some(selector) = motion::anchor_selector(&href).map(str::to_string) else {
            continue;
        };

        EventListener::new_with_options(
            &anchor,
            "click",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let Some(target) = dom::query(&selector) else {
                    return;
                };
                event.prevent_default();

                let offset_top = target
                    .dyn_ref::<HtmlElement>()
                    .map(|el| f64::from(el.offset_top()))
                    .unwrap_or_default();
                let options = ScrollToOptions::new();
                options.set_top(motion::anchor_scroll_top(offset_top));
                options.set_behavior(ScrollBehavior::Smooth);
                if let Some(window) = dom::win() {
                    window.scroll_to_with_scroll_to_options(&options);
                }
            },
        )
        .forget();
    }
}

fn install_reveals(site: &SiteHandle) {
    for element in dom::query_all(FADE_TARGETS) {
        site.observe_fade_in(&element);
    }
    for item in dom::query_all(".skill-item") {
        site.observe_skill_bar(&item);
    }
}

fn install_cursor() {
    if !motion::cursor_enabled(dom::viewport_width()) {
        return;
    }
    let (Some(document), Some(window)) = (dom::document(), dom::win()) else {
        return;
    };
    let (Some(body), Some(head)) = (document.body(), document.head()) else {
        return;
    };
    let (Some(cursor), Some(style)) = (
        dom::el("div", &[("class", "cursor-follower"), ("aria-hidden", "true")], ""),
        dom::el("style", &[], CURSOR_STYLE),
    ) else {
        return;
    };
    let _ = head.append_child(&style);
    let _ = body.append_child(&cursor);

    let follower = Rc::new(RefCell::new(CursorFollower::default()));
    let hover_scale = Rc::new(RefCell::new(1.0_f64));

    {
        let follower = follower.clone();
        listen(&document, "mousemove", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                follower
                    .borrow_mut()
                    .aim(f64::from(event.client_x()), f64::from(event.client_y()));
            }
        });
    }

    for (event_name, scale) in [("mouseover", 1.5), ("mouseout", 1.0)] {
        let hover_scale = hover_scale.clone();
        listen(&document, event_name, move |event| {
            let over_target = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|element| element.closest(CURSOR_HOVER_TARGETS).ok().flatten())
                .is_some();
            if over_target {
                *hover_scale.borrow_mut() = scale;
            }
        });
    }

    let frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next_frame = frame.clone();
    let frame_window = window.clone();
    *frame.borrow_mut() = Some(Closure::new(move || {
        let position = {
            let mut follower = follower.borrow_mut();
            follower.step();
            *follower
        };
        let scale = *hover_scale.borrow();
        dom::set_style(
            &cursor,
            "transform",
            &format!(
                "translate({}px, {}px) translate(-50%, -50%) scale({scale})",
                position.x, position.y
            ),
        );
        if let Some(callback) = next_frame.borrow().as_ref() {
            let _ = frame_window.request_animation_frame(callback.as_ref().unchecked_ref());
        }
    }));

    if let Some(callback) = frame.borrow().as_ref() {
        let _ = window.request_animation_frame(callback.as_ref().unchecked_ref());
    }
}

fn install_theme_toggle(site: &SiteHandle) {
    let Some(toggle) = dom::by_id("theme-toggle") else {
        return;
    };

    let site = site.clone();
    let target = toggle.clone();
    listen(&target, "click", move |_| {
        let next = theme::current().toggled();
        theme::apply_with_transition(next);
        prefs::persist_theme(&site.store, next);
        theme::label_toggle(&toggle, next, site.language());
    });
}

fn install_language_options(site: &SiteHandle) {
    for option in dom::query_all(".lang-option[data-lang]") {
        let Some(language) = option
            .get_attribute("data-lang")
            .and_then(|code| Language::from_code(&code))
        else {
            continue;
        };

        let site = site.clone();
        listen(&option, "click", move |event| {
            event.stop_propagation();
            site.change_language(language);
            if let Some(toggle) = dom::by_id("theme-toggle") {
                theme::label_toggle(&toggle, theme::current(), language);
            }
        });
    }
}

fn position_slider(container: &Element, view: ViewMode) {
    let Some(button) = dom::query_within(container, &format!(".view-btn[data-view=\"{}\"]", view.as_str())) else {
        return;
    };
    let geometry = SliderGeometry::measure(dom::rect(container), dom::rect(&button));
    for (name, value) in geometry.css_variables() {
        dom::set_style(container, name, &value);
    }
}

fn apply_view(view: ViewMode) {
    if let Some(list) = dom::by_id(PROJECTS_HOST) {
        dom::toggle_class(&list, "grid-view", view.is_grid());
    }
    for button in dom::query_all(".view-btn[data-view]") {
        let active = button.get_attribute("data-view").as_deref() == Some(view.as_str());
        dom::toggle_class(&button, "active", active);
    }
    if let Some(container) = dom::query(".view-toggle") {
        position_slider(&container, view);
    }
}

fn install_view_toggle(site: &SiteHandle) {
    let current = Rc::new(RefCell::new(prefs::load_view(&site.store)));
    apply_view(*current.borrow());

    for button in dom::query_all(".view-btn[data-view]") {
        let Some(view) = button.get_attribute("data-view").and_then(|value| ViewMode::from_str(&value)) else {
            continue;
        };

        let (site, current) = (site.clone(), current.clone());
        listen(&button, "click", move |_| {
            *current.borrow_mut() = view;
            prefs::persist_view(&site.store, view);
            apply_view(view);
        });
    }

    if let Some(window) = dom::win() {
        listen(&window, "resize", move |_| {
            if let Some(container) = dom::query(".view-toggle") {
                position_slider(&container, *current.borrow());
            }
        });
    }
}

fn install_contact_form(site: &SiteHandle) {
    let Some(form) = dom::by_id("contact-form") else {
        return;
    };

    let site = site.clone();
    let form_el = form.clone();
    listen(&form, "submit", move |_| {
        let Some(button) = dom::query_within(&form_el, ".btn-submit") else {
            return;
        };
        if let Some(button) = button.dyn_ref::<HtmlButtonElement>() {
            button.set_disabled(true);
        }
        if let Some(label) = dom::query_within(&button, "span") {
            label.set_text_content(Some(site.language().sending_label()));
        }
    });
}

fn show_year() {
    use chrono::Datelike;
    dom::set_text_by_id("year", &chrono::Local::now().year().to_string());
}
