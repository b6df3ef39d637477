//! Public GitHub activity: profile, recent repositories and a 30-day commit
//! count, fetched anonymously under the API's rate limit.

use crate::i18n::{Language, TranslationStore};
use crate::logging::{log_event, LogLevel};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use url::Url;

pub const RATE_LIMIT_HEADER: &str = "X-RateLimit-Remaining";
pub const ACTIVE_WINDOW_DAYS: i64 = 30;
pub const MAX_ACTIVE_REPOS: usize = 5;
pub const MAX_REPO_CARDS: usize = 6;
pub const RATE_LIMIT_FLOOR: u32 = 10;
pub const ESTIMATED_COMMITS_PER_REPO: u32 = 3;
const PAGE_SIZE: &str = "100";
const STATUS_FORBIDDEN: u16 = 403;

/// One HTTP exchange as seen by the aggregation logic.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    pub rate_limit_remaining: Option<String>,
    pub body: String,
}

impl ApiReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[allow(async_fn_in_trait)]
pub trait GitHubApi {
    async fn get(&self, url: &Url) -> Result<ApiReply, GitHubError>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum GitHubError {
    RateLimited,
    Status { endpoint: &'static str, status: u16 },
    Network(String),
    Decode(String),
}

impl GitHubError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }

    pub fn user_message(&self, store: &TranslationStore, language: Language) -> String {
        let (path, es, en) = if self.is_rate_limited() {
            (
                "github.error_rate_limit",
                "Límite de peticiones de GitHub alcanzado. Por favor recarga en unos minutos.",
                "GitHub request limit reached. Please reload in a few minutes.",
            )
        } else {
            (
                "github.error_generic",
                "No se pudieron cargar los datos de GitHub. Verifica tu conexión.",
                "Could not load GitHub data. Check your connection.",
            )
        };

        let fallback = match language {
            Language::Es => es,
            Language::En => en,
        };
        store.text_or(language, path, fallback)
    }
}

impl fmt::Display for GitHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "GitHub rate limit exceeded"),
            Self::Status { endpoint, status } => write!(f, "GitHub {endpoint} request failed with status {status}"),
            Self::Network(message) => write!(f, "GitHub request failed: {message}"),
            Self::Decode(message) => write!(f, "GitHub response could not be decoded: {message}"),
        }
    }
}

impl std::error::Error for GitHubError {}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Profile {
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub followers: u32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Repository {
    pub name: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitCount {
    Counted(u32),
    Estimated(u32),
}

impl CommitCount {
    pub fn value(self) -> u32 {
        match self {
            Self::Counted(value) | Self::Estimated(value) => value,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RepoCard {
    pub name: String,
    pub url: String,
    pub stars: Option<u32>,
    pub forks: Option<u32>,
    pub description: Option<String>,
    pub language: Option<String>,
}

impl From<&Repository> for RepoCard {
    fn from(repo: &Repository) -> Self {
        let non_empty = |value: &Option<String>| value.clone().filter(|text| !text.trim().is_empty());

        Self {
            name: repo.name.clone(),
            url: repo.html_url.clone(),
            stars: Some(repo.stargazers_count).filter(|count| *count > 0),
            forks: Some(repo.forks_count).filter(|count| *count > 0),
            description: non_empty(&repo.description),
            language: non_empty(&repo.language),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActivitySummary {
    pub public_repos: u32,
    pub commits: CommitCount,
    pub followers: u32,
    pub repos: Vec<RepoCard>,
}

pub fn parse_rate_limit(value: Option<&str>) -> Option<u32> {
    value?.trim().parse::<u32>().ok()
}

pub fn active_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(ACTIVE_WINDOW_DAYS)
}

/// Repositories pushed since `since`, in listing order, at most five.
pub fn select_active(repos: &[Repository], since: DateTime<Utc>) -> Vec<&Repository> {
    repos
        .iter()
        .filter(|repo| repo.pushed_at.is_some_and(|pushed| pushed >= since))
        .take(MAX_ACTIVE_REPOS)
        .collect()
}

pub fn estimate_commits(active_repos: usize) -> u32 {
    u32::try_from(active_repos)
        .unwrap_or(u32::MAX)
        .saturating_mul(ESTIMATED_COMMITS_PER_REPO)
}

pub fn profile_url(base: &Url, user: &str) -> Result<Url, GitHubError> {
    endpoint(base, &["users", user])
}

pub fn repos_url(base: &Url, user: &str) -> Result<Url, GitHubError> {
    let mut url = endpoint(base, &["users", user, "repos"])?;
    url.query_pairs_mut()
        .append_pair("sort", "updated")
        .append_pair("per_page", PAGE_SIZE);
    Ok(url)
}

pub fn commits_url(base: &Url, user: &str, repo: &str, since: DateTime<Utc>) -> Result<Url, GitHubError> {
    let mut url = endpoint(base, &["repos", user, repo, "commits"])?;
    url.query_pairs_mut()
        .append_pair("author", user)
        .append_pair("since", &since.to_rfc3339_opts(SecondsFormat::Millis, true))
        .append_pair("per_page", PAGE_SIZE);
    Ok(url)
}

fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, GitHubError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| GitHubError::Network(format!("invalid API base {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn decode<T: DeserializeOwned>(reply: &ApiReply) -> Result<T, GitHubError> {
    serde_json::from_str(&reply.body).map_err(|err| GitHubError::Decode(err.to_string()))
}

fn require_success(reply: &ApiReply, endpoint: &'static str) -> Result<(), GitHubError> {
    if reply.is_success() {
        return Ok(());
    }

    if reply.status == STATUS_FORBIDDEN {
        return Err(GitHubError::RateLimited);
    }

    Err(GitHubError::Status {
        endpoint,
        status: reply.status,
    })
}

pub async fn load_activity<A: GitHubApi>(
    api: &A,
    base: &Url,
    user: &str,
    now: DateTime<Utc>,
) -> Result<ActivitySummary, GitHubError> {
    let profile_reply = api.get(&profile_url(base, user)?).await?;
    let rate_limit_remaining = parse_rate_limit(profile_reply.rate_limit_remaining.as_deref());

    log_event(
        LogLevel::Info,
        "github_rate_limit",
        serde_json::json!({ "remaining": rate_limit_remaining }),
    );

    require_success(&profile_reply, "profile")?;
    let profile: Profile = decode(&profile_reply)?;

    let repos_reply = api.get(&repos_url(base, user)?).await?;
    require_success(&repos_reply, "repos")?;
    let repos: Vec<Repository> = decode(&repos_reply)?;

    let since = active_window_start(now);
    let active = select_active(&repos, since);

    let commits = if rate_limit_remaining.is_some_and(|remaining| remaining > RATE_LIMIT_FLOOR) {
        let mut total = 0u32;
        for repo in &active {
            match count_commits(api, base, user, &repo.name, since).await {
                Ok(count) => total = total.saturating_add(count),
                Err(err) => log_event(
                    LogLevel::Warn,
                    "github_commit_query_failed",
                    serde_json::json!({ "repo": repo.name.as_str(), "error": err.to_string() }),
                ),
            }
        }
        CommitCount::Counted(total)
    } else {
        log_event(
            LogLevel::Warn,
            "github_rate_limit_low",
            serde_json::json!({ "remaining": rate_limit_remaining, "active_repos": active.len() }),
        );
        CommitCount::Estimated(estimate_commits(active.len()))
    };

    Ok(ActivitySummary {
        public_repos: profile.public_repos,
        commits,
        followers: profile.followers,
        repos: repos.iter().take(MAX_REPO_CARDS).map(RepoCard::from).collect(),
    })
}

async fn count_commits<A: GitHubApi>(
    api: &A,
    base: &Url,
    user: &str,
    repo: &str,
    since: DateTime<Utc>,
) -> Result<u32, GitHubError> {
    let reply = api.get(&commits_url(base, user, repo, since)?).await?;
    if !reply.is_success() {
        return Ok(0);
    }

    let commits: Vec<serde_json::Value> = decode(&reply)?;
    Ok(u32::try_from(commits.len()).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::cell::RefCell;
    use std::collections::HashMap;

    struct FakeApi {
        replies: HashMap<String, Result<ApiReply, GitHubError>>,
        requested: RefCell<Vec<String>>,
    }

    impl FakeApi {
        fn new() -> Self {
            Self {
                replies: HashMap::new(),
                requested: RefCell::new(Vec::new()),
            }
        }

        fn reply(mut self, path: &str, status: u16, remaining: Option<&str>, body: &str) -> Self {
            self.replies.insert(
                path.to_string(),
                Ok(ApiReply {
                    status,
                    rate_limit_remaining: remaining.map(str::to_string),
                    body: body.to_string(),
                }),
            );
            self
        }

        fn fail(mut self, path: &str) -> Self {
            self.replies
                .insert(path.to_string(), Err(GitHubError::Network("connection reset".to_string())));
            self
        }

        fn commit_queries(&self) -> usize {
            self.requested
                .borrow()
                .iter()
                .filter(|path| path.ends_with("/commits"))
                .count()
        }
    }

    impl GitHubApi for FakeApi {
        async fn get(&self, url: &Url) -> Result<ApiReply, GitHubError> {
            let path = url.path().to_string();
            self.requested.borrow_mut().push(path.clone());
            self.replies
                .get(&path)
                .cloned()
                .unwrap_or_else(|| Err(GitHubError::Network(format!("unexpected request {path}"))))
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    fn base() -> Url {
        Url::parse("https://api.github.com").unwrap()
    }

    fn repos_body() -> String {
        serde_json::json!([
            { "name": "alpha", "html_url": "https://github.com/u/alpha", "stargazers_count": 3, "pushed_at": "2026-10-16T08:00:00Z", "language": "Rust" },
            { "name": "beta", "html_url": "https://github.com/u/beta", "forks_count": 1, "pushed_at": "2026-10-01T08:00:00Z", "description": "Beta" },
            { "name": "gamma", "html_url": "https://github.com/u/gamma", "pushed_at": "2026-08-01T08:00:00Z" },
            { "name": "delta", "html_url": "https://github.com/u/delta", "pushed_at": null }
        ])
        .to_string()
    }

    const PROFILE: &str = r#"{ "public_repos": 12, "followers": 7 }"#;

    #[tokio::test]
    async fn low_rate_limit_skips_commit_queries_and_estimates() {
        let api = FakeApi::new()
            .reply("/users/u", 200, Some("5"), PROFILE)
            .reply("/users/u/repos", 200, None, &repos_body());

        let summary = load_activity(&api, &base(), "u", now()).await.expect("activity loads");

        assert_eq!(api.commit_queries(), 0);
        assert_eq!(summary.commits, CommitCount::Estimated(2 * ESTIMATED_COMMITS_PER_REPO));
        assert_eq!(summary.public_repos, 12);
        assert_eq!(summary.followers, 7);
    }

    #[tokio::test]
    async fn missing_rate_limit_header_is_treated_as_exhausted() {
        let api = FakeApi::new()
            .reply("/users/u", 200, None, PROFILE)
            .reply("/users/u/repos", 200, None, "[]");

        let summary = load_activity(&api, &base(), "u", now()).await.expect("activity loads");
        assert_eq!(summary.commits, CommitCount::Estimated(0));
        assert!(summary.repos.is_empty());
    }

    #[tokio::test]
    async fn commit_totals_skip_failed_repositories() {
        let api = FakeApi::new()
            .reply("/users/u", 200, Some("58"), PROFILE)
            .reply("/users/u/repos", 200, None, &repos_body())
            .reply("/repos/u/alpha/commits", 200, None, "[{}, {}, {}, {}]")
            .fail("/repos/u/beta/commits");

        let summary = load_activity(&api, &base(), "u", now()).await.expect("activity loads");

        assert_eq!(api.commit_queries(), 2);
        assert_eq!(summary.commits, CommitCount::Counted(4));
    }

    #[tokio::test]
    async fn forbidden_profile_is_rate_limited() {
        let api = FakeApi::new().reply("/users/u", 403, Some("0"), r#"{"message":"API rate limit exceeded"}"#);

        let err = load_activity(&api, &base(), "u", now()).await.unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[tokio::test]
    async fn other_failures_are_generic() {
        let api = FakeApi::new()
            .reply("/users/u", 200, Some("50"), PROFILE)
            .reply("/users/u/repos", 500, None, "");

        let err = load_activity(&api, &base(), "u", now()).await.unwrap_err();
        assert_eq!(err, GitHubError::Status { endpoint: "repos", status: 500 });
        assert!(!err.is_rate_limited());
    }

    #[tokio::test]
    async fn repo_cards_are_capped_and_hide_zero_counts() {
        let many: Vec<_> = (0..9)
            .map(|i| serde_json::json!({ "name": format!("r{i}"), "html_url": format!("https://github.com/u/r{i}") }))
            .collect();
        let api = FakeApi::new()
            .reply("/users/u", 200, Some("1"), PROFILE)
            .reply("/users/u/repos", 200, None, &serde_json::Value::from(many).to_string());

        let summary = load_activity(&api, &base(), "u", now()).await.expect("activity loads");
        assert_eq!(summary.repos.len(), MAX_REPO_CARDS);
        assert_eq!(summary.repos[0].stars, None);
        assert_eq!(summary.repos[0].forks, None);
    }

    #[test]
    fn active_selection_respects_window_and_cap() {
        let repos: Vec<Repository> = serde_json::from_str(&repos_body()).unwrap();
        let active = select_active(&repos, active_window_start(now()));
        let names: Vec<_> = active.iter().map(|repo| repo.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);

        let recent: Vec<Repository> = (0..8)
            .map(|i| Repository {
                name: format!("r{i}"),
                html_url: String::new(),
                description: None,
                language: None,
                stargazers_count: 0,
                forks_count: 0,
                pushed_at: Some(now()),
            })
            .collect();
        assert_eq!(select_active(&recent, active_window_start(now())).len(), MAX_ACTIVE_REPOS);
    }

    #[test]
    fn repo_card_keeps_only_meaningful_fields() {
        let repos: Vec<Repository> = serde_json::from_str(&repos_body()).unwrap();
        let alpha = RepoCard::from(&repos[0]);
        let beta = RepoCard::from(&repos[1]);

        assert_eq!(alpha.stars, Some(3));
        assert_eq!(alpha.language.as_deref(), Some("Rust"));
        assert_eq!(alpha.description, None);
        assert_eq!(beta.forks, Some(1));
        assert_eq!(beta.description.as_deref(), Some("Beta"));
    }

    #[test]
    fn urls_carry_expected_queries() {
        let since = active_window_start(now());
        let commits = commits_url(&base(), "u", "alpha", since).unwrap();

        assert_eq!(commits.path(), "/repos/u/alpha/commits");
        assert_eq!(
            commits.query(),
            Some("author=u&since=2026-09-17T12%3A00%3A00.000Z&per_page=100")
        );
        assert_eq!(
            repos_url(&base(), "u").unwrap().as_str(),
            "https://api.github.com/users/u/repos?sort=updated&per_page=100"
        );
    }

    #[test]
    fn rate_limit_header_parsing_is_lenient() {
        assert_eq!(parse_rate_limit(Some(" 42 ")), Some(42));
        assert_eq!(parse_rate_limit(Some("n/a")), None);
        assert_eq!(parse_rate_limit(None), None);
    }

    #[test]
    fn failure_messages_are_localized() {
        let store = TranslationStore::default();
        assert!(GitHubError::RateLimited
            .user_message(&store, Language::En)
            .starts_with("GitHub request limit"));
        assert!(GitHubError::Network("x".into())
            .user_message(&store, Language::Es)
            .starts_with("No se pudieron"));
    }
}
