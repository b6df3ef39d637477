use super::context::SiteHandle;
use super::dom;
use crate::github::{self, ActivitySummary, ApiReply, GitHubApi, GitHubError, RepoCard, RATE_LIMIT_HEADER};
use crate::i18n::Language;
use crate::logging::{log_event, LogLevel};
use gloo_net::http::Request;
use url::Url;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

const STAT_UNAVAILABLE: &str = "—";

/// Browser `fetch` behind the GitHub transport seam.
pub struct FetchTransport;

impl GitHubApi for FetchTransport {
    async fn get(&self, url: &Url) -> Result<ApiReply, GitHubError> {
        let response = Request::get(url.as_str())
            .send()
            .await
            .map_err(|err| GitHubError::Network(err.to_string()))?;

        let status = response.status();
        let rate_limit_remaining = response.headers().get(RATE_LIMIT_HEADER);
        let body = response
            .text()
            .await
            .map_err(|err| GitHubError::Network(err.to_string()))?;

        Ok(ApiReply {
            status,
            rate_limit_remaining,
            body,
        })
    }
}

fn show_stats(summary: Option<&ActivitySummary>) {
    let stats = [
        ("total-repos", summary.map(|s| s.public_repos)),
        ("recent-commits", summary.map(|s| s.commits.value())),
        ("followers-count", summary.map(|s| s.followers)),
    ];

    for (id, value) in stats {
        let text = value.map_or_else(|| STAT_UNAVAILABLE.to_string(), |value| value.to_string());
        dom::set_text_by_id(id, &text);
    }
}

#[derive(Clone, PartialEq)]
enum ActivityState {
    Loading,
    Loaded(Vec<RepoCard>),
    Failed(GitHubError),
}

#[derive(Properties, PartialEq)]
pub struct ActivityWidgetProps {
    pub site: SiteHandle,
}

#[function_component(ActivityWidget)]
pub fn activity_widget(props: &ActivityWidgetProps) -> Html {
    let site = props.site.clone();
    let state = use_state(|| ActivityState::Loading);
    let snapshot = {
        let site = site.clone();
        use_state(move || site.snapshot())
    };

    {
        let site = site.clone();
        let snapshot = snapshot.clone();
        use_effect_with((), move |_| {
            site.follow(snapshot);
            || ()
        });
    }

    {
        let state = state.clone();
        let site = site.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let now = chrono::Utc::now();
                let result = github::load_activity(
                    &FetchTransport,
                    &site.config.github_api,
                    &site.config.github_user,
                    now,
                )
                .await;

                match result {
                    Ok(summary) => {
                        show_stats(Some(&summary));
                        state.set(ActivityState::Loaded(summary.repos));
                    }
                    Err(err) => {
                        log_event(
                            LogLevel::Error,
                            "github_load_failed",
                            serde_json::json!({
                                "user": site.config.github_user.as_str(),
                                "rate_limited": err.is_rate_limited(),
                                "error": err.to_string(),
                            }),
                        );
                        show_stats(None);
                        state.set(ActivityState::Failed(err));
                    }
                }
            });
            || ()
        });
    }

    let language = snapshot.value.language;
    let store = &snapshot.value.translations;

    match &*state {
        ActivityState::Loading => Html::default(),
        ActivityState::Failed(err) => html! {
            <p class="repos-error">{err.user_message(store, language)}</p>
        },
        ActivityState::Loaded(repos) if repos.is_empty() => html! {
            <p class="repos-empty">{store.text_or(language, "github.no_repos", empty_label(language))}</p>
        },
        ActivityState::Loaded(repos) => {
            let visit = store.text_or(language, "github.view_on_github", view_label(language));
            repos
                .iter()
                .map(|repo| repo_card(repo, &visit))
                .collect::<Html>()
        }
    }
}

fn view_label(language: Language) -> &'static str {
    match language {
        Language::Es => "Ver en GitHub",
        Language::En => "View on GitHub",
    }
}

fn empty_label(language: Language) -> &'static str {
    match language {
        Language::Es => "No se encontraron repositorios públicos.",
        Language::En => "No public repositories found.",
    }
}

fn repo_card(repo: &RepoCard, visit: &str) -> Html {
    html! {
        <div class="repo-card">
            <div class="repo-header">
                <h4 class="repo-name">{repo.name.clone()}</h4>
                <div class="repo-stats">
                    if let Some(stars) = repo.stars {
                        <span class="repo-stat">{format!("★ {stars}")}</span>
                    }
                    if let Some(forks) = repo.forks {
                        <span class="repo-stat">{format!("⑂ {forks}")}</span>
                    }
                </div>
            </div>
            if let Some(description) = repo.description.clone() {
                <p class="repo-description">{description}</p>
            }
            if let Some(language) = repo.language.clone() {
                <div class="repo-language">
                    <span class="language-dot"></span>
                    {language}
                </div>
            }
            <a class="btn btn-secondary btn-sm" href={repo.url.clone()} target="_blank" rel="noopener noreferrer">
                {visit.to_string()}
            </a>
        </div>
    }
}
