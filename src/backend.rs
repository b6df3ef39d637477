use crate::i18n::TranslationStore;
use crate::logging::{self, log_event, LogLevel, DEFAULT_LOG_LEVEL};
use crate::model;
use axum::{
    extract::{Path as UrlPath, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering as AtomicOrdering},
    sync::Arc,
    time::{Instant, SystemTime, UNIX_EPOCH},
};
use tower_http::services::{ServeDir, ServeFile};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DIST_DIR: &str = "dist";
const DEFAULT_DATA_DIR: &str = "data";
const PORT_BOUNDS: (u16, u16) = (1, 65_535);
const REQUEST_ID_HEADER: &str = "x-request-id";

static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Debug, PartialEq)]
struct ServerConfig {
    port: u16,
    dist_dir: PathBuf,
    data_dir: PathBuf,
    log_level: LogLevel,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .filter(|value| (PORT_BOUNDS.0..=PORT_BOUNDS.1).contains(value))
            .unwrap_or(DEFAULT_PORT);
        let dist_dir = parse_non_empty(lookup("SITE_DIST_DIR"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR));
        let data_dir = parse_non_empty(lookup("SITE_DATA_DIR"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let log_level = parse_non_empty(lookup("LOG_LEVEL"))
            .and_then(|value| LogLevel::parse(&value))
            .unwrap_or(DEFAULT_LOG_LEVEL);

        Self {
            port,
            dist_dir,
            data_dir,
            log_level,
        }
    }
}

fn parse_non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
}

/// The two JSON documents the front end fetches at page load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DataFile {
    Projects,
    Translations,
}

impl DataFile {
    const ALL: [DataFile; 2] = [DataFile::Projects, DataFile::Translations];

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "projects.json" => Some(Self::Projects),
            "translations.json" => Some(Self::Translations),
            _ => None,
        }
    }

    fn file_name(self) -> &'static str {
        match self {
            Self::Projects => "projects.json",
            Self::Translations => "translations.json",
        }
    }

    /// Describes the parsed document, or the parse error.
    fn inspect(self, raw: &str) -> Result<serde_json::Value, String> {
        match self {
            Self::Projects => model::parse_projects(raw)
                .map(|projects| serde_json::json!({ "projects": projects.len() }))
                .map_err(|err| err.to_string()),
            Self::Translations => TranslationStore::from_json(raw)
                .map(|store| serde_json::json!({ "languages": store.languages().collect::<Vec<_>>() }))
                .map_err(|err| err.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorPayload {
    ok: bool,
    error: String,
}

impl ErrorPayload {
    fn new(message: &str) -> Self {
        Self {
            ok: false,
            error: message.to_string(),
        }
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env();
    logging::set_level(config.log_level);

    for file in DataFile::ALL {
        inspect_data_file(&config.data_dir, file).await;
    }

    let bind_address = format!("0.0.0.0:{}", config.port);
    let app = router(AppState {
        config: Arc::new(config.clone()),
    });

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    log_event(
        LogLevel::Info,
        "server_listening",
        serde_json::json!({
            "url": format!("http://127.0.0.1:{}", config.port),
            "dist_dir": config.dist_dir.display().to_string(),
            "data_dir": config.data_dir.display().to_string(),
        }),
    );
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: AppState) -> Router {
    let dist_dir = state.config.dist_dir.clone();
    let static_service = ServeDir::new(&dist_dir).not_found_service(ServeFile::new(dist_dir.join("index.html")));

    Router::new()
        .route("/data/{file}", get(get_site_data))
        .fallback_service(static_service)
        .with_state(state)
}

async fn inspect_data_file(data_dir: &Path, file: DataFile) {
    let path = data_dir.join(file.file_name());
    match tokio::fs::read_to_string(&path).await {
        Ok(raw) => match file.inspect(&raw) {
            Ok(summary) => log_event(
                LogLevel::Info,
                "site_data_loaded",
                serde_json::json!({ "file": file.file_name(), "summary": summary }),
            ),
            Err(error) => log_event(
                LogLevel::Warn,
                "site_data_invalid",
                serde_json::json!({ "file": file.file_name(), "error": error }),
            ),
        },
        Err(err) => log_event(
            LogLevel::Warn,
            "site_data_missing",
            serde_json::json!({ "file": path.display().to_string(), "error": err.to_string() }),
        ),
    }
}

async fn get_site_data(
    State(state): State<AppState>,
    UrlPath(name): UrlPath<String>,
    headers: HeaderMap,
) -> axum::response::Response {
    let request_id = resolve_request_id(&headers);
    let started_at = Instant::now();

    let Some(file) = DataFile::from_name(&name) else {
        log_event(
            LogLevel::Debug,
            "site_data_unknown",
            serde_json::json!({ "request_id": request_id.as_str(), "file": name }),
        );
        return error_response(StatusCode::NOT_FOUND, "unknown data file", &request_id);
    };

    let path = state.config.data_dir.join(file.file_name());
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(err) => {
            log_event(
                LogLevel::Warn,
                "site_data_read_failed",
                serde_json::json!({
                    "request_id": request_id.as_str(),
                    "file": file.file_name(),
                    "error": err.to_string(),
                }),
            );
            return error_response(StatusCode::NOT_FOUND, "data file unavailable", &request_id);
        }
    };

    if let Err(error) = file.inspect(&String::from_utf8_lossy(&bytes)) {
        log_event(
            LogLevel::Warn,
            "site_data_invalid",
            serde_json::json!({ "request_id": request_id.as_str(), "file": file.file_name(), "error": error }),
        );
    }

    log_event(
        LogLevel::Debug,
        "site_data_served",
        serde_json::json!({
            "request_id": request_id.as_str(),
            "file": file.file_name(),
            "bytes": bytes.len(),
            "duration_ms": started_at.elapsed().as_millis(),
        }),
    );

    let mut response_headers = HeaderMap::new();
    response_headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response_headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response_with_request_id(StatusCode::OK, response_headers, bytes, &request_id)
}

fn error_response(status: StatusCode, message: &str, request_id: &str) -> axum::response::Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response_with_request_id(status, headers, Json(ErrorPayload::new(message)), request_id)
}

fn now_unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_millis())
        .unwrap_or(0)
}

fn generate_request_id() -> String {
    let counter = REQUEST_ID_COUNTER.fetch_add(1, AtomicOrdering::Relaxed);
    format!("req-{}-{counter}", now_unix_millis())
}

fn resolve_request_id(headers: &HeaderMap) -> String {
    let value = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|raw| raw.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string);

    value.unwrap_or_else(generate_request_id)
}

fn response_with_request_id(
    status: StatusCode,
    mut headers: HeaderMap,
    payload: impl IntoResponse,
    request_id: &str,
) -> axum::response::Response {
    if let Ok(request_id_header) = HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, request_id_header);
    }
    (status, headers, payload).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn test_state(data_dir: &Path) -> AppState {
        AppState {
            config: Arc::new(ServerConfig {
                port: DEFAULT_PORT,
                dist_dir: PathBuf::from(DEFAULT_DIST_DIR),
                data_dir: data_dir.to_path_buf(),
                log_level: DEFAULT_LOG_LEVEL,
            }),
        }
    }

    #[test]
    fn config_defaults_when_environment_is_empty() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.dist_dir, PathBuf::from("dist"));
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn config_rejects_out_of_bounds_and_blank_values() {
        let env: HashMap<&str, &str> = [("PORT", "0"), ("SITE_DIST_DIR", "  "), ("LOG_LEVEL", "debug")]
            .into_iter()
            .collect();
        let config = ServerConfig::from_lookup(|name| env.get(name).map(|value| value.to_string()));

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.dist_dir, PathBuf::from(DEFAULT_DIST_DIR));
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn request_id_header_is_reused_when_present() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static(" abc "));
        assert_eq!(resolve_request_id(&headers), "abc");
        assert!(resolve_request_id(&HeaderMap::new()).starts_with("req-"));
    }

    #[test]
    fn inspection_reports_counts_and_errors() {
        let summary = DataFile::Projects.inspect(r#"[{ "title": "A" }, {}]"#).expect("valid projects");
        assert_eq!(summary["projects"], 2);

        assert!(DataFile::Translations.inspect("[]").is_err());
        assert_eq!(DataFile::from_name("secrets.json"), None);
    }

    #[tokio::test]
    async fn data_files_are_served_uncached() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("projects.json"), "[]").expect("write projects");

        let response = get_site_data(
            State(test_state(dir.path())),
            UrlPath("projects.json".to_string()),
            HeaderMap::new(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL),
            Some(&HeaderValue::from_static("no-store"))
        );
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn invalid_data_is_still_served() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("translations.json"), "not json").expect("write translations");

        let response = get_site_data(
            State(test_state(dir.path())),
            UrlPath("translations.json".to_string()),
            HeaderMap::new(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_or_missing_files_are_not_found() {
        let dir = tempfile::tempdir().expect("temp dir");

        let unknown = get_site_data(
            State(test_state(dir.path())),
            UrlPath("../Cargo.toml".to_string()),
            HeaderMap::new(),
        )
        .await;
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

        let missing = get_site_data(
            State(test_state(dir.path())),
            UrlPath("projects.json".to_string()),
            HeaderMap::new(),
        )
        .await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
