use super::context::SiteHandle;
use crate::gallery::{Direction, GalleryState, SwipeTracker};
use crate::logging::{log_event, LogLevel};
use crate::model::{CardMedia, ProjectCard, ProjectListView, ProjectRecord};
use gloo_net::http::Request;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{HtmlVideoElement, KeyboardEvent, MouseEvent, RequestCache, TouchEvent};
use yew::prelude::*;

pub async fn fetch_projects(path: &str) -> Vec<ProjectRecord> {
    match request_projects(path).await {
        Ok(projects) => projects,
        Err(error) => {
            log_event(
                LogLevel::Error,
                "projects_load_failed",
                serde_json::json!({ "path": path, "error": error }),
            );
            Vec::new()
        }
    }
}

async fn request_projects(path: &str) -> Result<Vec<ProjectRecord>, String> {
    let response = Request::get(path)
        .cache(RequestCache::NoStore)
        .send()
        .await
        .map_err(|err| err.to_string())?;

    if !response.ok() {
        return Err(format!("status {}", response.status()));
    }

    let raw = response.text().await.map_err(|err| err.to_string())?;
    crate::model::parse_projects(&raw).map_err(|err| err.to_string())
}

fn play_video(video: &HtmlVideoElement, event: &'static str) {
    let Ok(promise) = video.play() else {
        return;
    };

    spawn_local(async move {
        if let Err(err) = JsFuture::from(promise).await {
            log_event(
                LogLevel::Debug,
                "video_play_failed",
                serde_json::json!({ "context": event, "error": format!("{err:?}") }),
            );
        }
    });
}

fn touch_x(event: &TouchEvent) -> Option<f64> {
    event.touches().get(0).map(|touch| f64::from(touch.client_x()))
}

#[derive(Properties, PartialEq)]
pub struct ProjectListProps {
    pub view: ProjectListView,
    pub on_open: Callback<usize>,
}

#[function_component(ProjectList)]
pub fn project_list(props: &ProjectListProps) -> Html {
    match &props.view {
        ProjectListView::Placeholder(message) => html! {
            <p class="projects-empty">{message.clone()}</p>
        },
        ProjectListView::Cards(cards) => cards
            .iter()
            .enumerate()
            .map(|(index, card)| {
                let on_open = props.on_open.clone();
                html! {
                    <CardView
                        key={index}
                        card={card.clone()}
                        on_open={Some(Callback::from(move |_| on_open.emit(index)))}
                    />
                }
            })
            .collect::<Html>(),
    }
}

#[derive(Properties, PartialEq)]
pub struct CardViewProps {
    pub card: ProjectCard,
    /// Inline cards open the modal; the modal copy has no handler.
    #[prop_or_default]
    pub on_open: Option<Callback<()>>,
    #[prop_or_default]
    pub autoplay: bool,
    /// Carousel owned by the caller; the card keeps its own when absent.
    #[prop_or_default]
    pub gallery: Option<GalleryState>,
    #[prop_or_default]
    pub on_step: Option<Callback<Direction>>,
}

/// One rendered instance of a project card with its own gallery state.
#[function_component(CardView)]
pub fn card_view(props: &CardViewProps) -> Html {
    let site = use_context::<SiteHandle>();
    let local_gallery = {
        let card = props.card.clone();
        use_state(move || card.new_gallery())
    };
    let swipe = use_mut_ref(SwipeTracker::default);
    let card_ref = use_node_ref();
    let video_ref = use_node_ref();

    {
        let slides = props.card.media.slide_count();
        let gallery = local_gallery.clone();
        use_effect_with(slides, move |slides| {
            if gallery.slide_count() != *slides {
                gallery.set(GalleryState::new(*slides));
            }
            || ()
        });
    }
    let gallery = props.gallery.unwrap_or(*local_gallery);

    {
        let card_ref = card_ref.clone();
        let in_modal = props.on_open.is_none();
        use_effect_with((), move |_| {
            if let (Some(site), Some(element)) = (site, card_ref.cast::<web_sys::Element>()) {
                if in_modal {
                    crate::frontend::dom::toggle_class(&element, "visible", true);
                } else {
                    site.observe_fade_in(&element);
                }
            }
            || ()
        });
    }

    {
        let video_ref = video_ref.clone();
        use_effect_with(props.autoplay, move |autoplay| {
            let video = video_ref.cast::<HtmlVideoElement>();
            if let Some(video) = video.as_ref() {
                video.set_muted(true);
                if *autoplay {
                    play_video(video, "modal_autoplay");
                }
            }
            move || {
                if let Some(video) = video {
                    let _ = video.pause();
                }
            }
        });
    }

    let navigable = props.card.media.has_navigation();
    let step = match props.on_step.clone() {
        Some(on_step) => on_step,
        None => {
            let gallery = local_gallery.clone();
            Callback::from(move |direction: Direction| gallery.set((*gallery).stepped(direction)))
        }
    };

    let onclick = props.on_open.clone().map(|on_open| Callback::from(move |_: MouseEvent| on_open.emit(())));

    let onkeydown = {
        let step = step.clone();
        Callback::from(move |event: KeyboardEvent| {
            if !navigable {
                return;
            }
            if let Some(direction) = Direction::from_key(&event.key()) {
                event.prevent_default();
                step.emit(direction);
            }
        })
    };

    // Only inline cards react to hover; the modal copy plays on open.
    let (onmouseenter, onmouseleave) = if props.on_open.is_some() {
        let enter_ref = video_ref.clone();
        let leave_ref = video_ref.clone();
        (
            Some(Callback::from(move |_: MouseEvent| {
                if let Some(video) = enter_ref.cast::<HtmlVideoElement>() {
                    play_video(&video, "card_hover");
                }
            })),
            Some(Callback::from(move |_: MouseEvent| {
                if let Some(video) = leave_ref.cast::<HtmlVideoElement>() {
                    let _ = video.pause();
                }
            })),
        )
    } else {
        (None, None)
    };

    let card = &props.card;
    let media = match &card.media {
        CardMedia::Video { src, poster } => html! {
            <video
                ref={video_ref.clone()}
                src={src.clone()}
                poster={poster.clone()}
                controls=true
                loop=true
                muted=true
                playsinline=true
                loading="lazy"
                style="width: 100%; height: 100%; object-fit: cover; aspect-ratio: 16/9;"
            />
        },
        media if media.has_gallery_controls() => gallery_view(card, gallery, step.clone(), swipe.clone()),
        _ => Html::default(),
    };

    html! {
        <article
            ref={card_ref}
            class={classes!("project-card", props.on_open.is_some().then_some("is-clickable"))}
            tabindex="0"
            {onclick}
            {onkeydown}
            {onmouseenter}
            {onmouseleave}
        >
            <div class="project-media">{media}</div>
            <div class="project-info">
                <h3>{card.title.clone()}</h3>
                <p>{card.description.clone()}</p>
                if !card.stack.is_empty() {
                    <div class="project-stack">
                        {for card.stack.iter().map(|tech| html! { <span class="stack-badge">{tech.clone()}</span> })}
                    </div>
                }
                if !card.features.is_empty() {
                    <ul class="tech-list">
                        {for card.features.iter().map(|feature| html! {
                            <li><span class="tech-bullet"></span>{feature.clone()}</li>
                        })}
                    </ul>
                }
                <div class="links">
                    {for card.links.iter().map(|link| html! {
                        <a
                            class={link.class_name()}
                            href={link.href.clone()}
                            target="_blank"
                            rel="noopener noreferrer"
                            onclick={Callback::from(|event: MouseEvent| event.stop_propagation())}
                        >
                            {link.label.clone()}
                        </a>
                    })}
                </div>
            </div>
        </article>
    }
}

fn gallery_view(
    card: &ProjectCard,
    gallery: GalleryState,
    step: Callback<Direction>,
    swipe: std::rc::Rc<std::cell::RefCell<SwipeTracker>>,
) -> Html {
    let navigable = card.media.has_navigation();
    let hidden = (!navigable).then_some("display: none;");

    let button = |direction: Direction, class: &'static str, label: &str, glyph: &'static str| {
        let step = step.clone();
        let onclick = Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            step.emit(direction);
        });
        html! {
            <button type="button" class={classes!("gallery-btn", class)} aria-label={label.to_string()} style={hidden} {onclick}>
                {glyph}
            </button>
        }
    };

    let ontouchstart = {
        let swipe = swipe.clone();
        Callback::from(move |event: TouchEvent| {
            if let Some(x) = touch_x(&event) {
                swipe.borrow_mut().start(x);
            }
        })
    };
    let ontouchmove = {
        let swipe = swipe.clone();
        Callback::from(move |event: TouchEvent| {
            if let Some(x) = touch_x(&event) {
                swipe.borrow_mut().track(x);
            }
        })
    };
    let ontouchend = {
        let step = step.clone();
        Callback::from(move |_: TouchEvent| {
            let direction = swipe.borrow_mut().finish();
            if let Some(direction) = direction.filter(|_| navigable) {
                step.emit(direction);
            }
        })
    };

    let slides = match &card.media {
        CardMedia::Gallery { slides } => slides
            .iter()
            .map(|slide| html! { <img src={slide.src.clone()} alt={slide.alt.clone()} loading="lazy" /> })
            .collect::<Html>(),
        CardMedia::Placeholder { message } => html! {
            <div class="gallery-placeholder">{message.clone()}</div>
        },
        CardMedia::Video { .. } => Html::default(),
    };

    html! {
        <>
            {button(Direction::Previous, "prev", &card.labels.previous_image, "‹")}
            <div
                class="gallery"
                style={navigable.then(|| gallery.track_style())}
                {ontouchstart}
                {ontouchmove}
                {ontouchend}
            >
                {slides}
            </div>
            {button(Direction::Next, "next", &card.labels.next_image, "›")}
        </>
    }
}

#[derive(Properties, PartialEq)]
pub struct ModalBodyProps {
    pub card: ProjectCard,
    pub gallery: GalleryState,
    pub on_step: Callback<Direction>,
}

/// The modal's independent rendering of a card, driven by the modal state.
#[function_component(ModalBody)]
pub fn modal_body(props: &ModalBodyProps) -> Html {
    html! {
        <CardView
            card={props.card.clone()}
            autoplay=true
            gallery={Some(props.gallery)}
            on_step={Some(props.on_step.clone())}
        />
    }
}
