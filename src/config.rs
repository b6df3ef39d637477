use crate::i18n::Language;
use crate::logging::{LogLevel, DEFAULT_LOG_LEVEL};
use url::Url;

const DEFAULT_GITHUB_USER: &str = "SebaViglione";
const DEFAULT_GITHUB_API: &str = "https://api.github.com";
const DEFAULT_PROJECTS_PATH: &str = "data/projects.json";
const DEFAULT_TRANSLATIONS_PATH: &str = "data/translations.json";
const DEFAULT_SITE_OWNER: &str = "Sebastián Viglione";
const DEFAULT_CV_STEM: &str = "CV Sebastián Viglione Chiarlone";
const DEFAULT_CV_PATH_ES: &str = "assets/cv/CV Sebastián Viglione Chiarlone ESPAÑOL.pdf";
const DEFAULT_CV_PATH_EN: &str = "assets/cv/CV Sebastián Viglione Chiarlone ENGLISH.pdf";

/// Set on CV links once rewritten, so they keep matching after an override
/// path drops the stem.
pub const CV_LINK_ATTRIBUTE: &str = "data-cv-link";

#[derive(Clone, Debug, PartialEq)]
pub struct SiteConfig {
    pub github_user: String,
    pub github_api: Url,
    pub projects_path: String,
    pub translations_path: String,
    pub site_owner: String,
    pub cv_stem: String,
    pub cv_path_es: String,
    pub cv_path_en: String,
    pub log_level: LogLevel,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            github_user: DEFAULT_GITHUB_USER.to_string(),
            github_api: default_github_api(),
            projects_path: DEFAULT_PROJECTS_PATH.to_string(),
            translations_path: DEFAULT_TRANSLATIONS_PATH.to_string(),
            site_owner: DEFAULT_SITE_OWNER.to_string(),
            cv_stem: DEFAULT_CV_STEM.to_string(),
            cv_path_es: DEFAULT_CV_PATH_ES.to_string(),
            cv_path_en: DEFAULT_CV_PATH_EN.to_string(),
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

fn default_github_api() -> Url {
    Url::parse(DEFAULT_GITHUB_API).expect("default GitHub API URL is valid")
}

impl SiteConfig {
    /// Builds the configuration from named overrides, typically the
    /// `data-*` attributes of the document root.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let github_api = text("data-github-api")
            .and_then(|value| Url::parse(&value).ok())
            .filter(|url| url.scheme() == "http" || url.scheme() == "https")
            .unwrap_or(defaults.github_api);
        let github_user = text("data-github-user")
            .filter(|value| is_valid_github_login(value))
            .unwrap_or(defaults.github_user);
        let log_level = text("data-log-level")
            .and_then(|value| LogLevel::parse(&value))
            .unwrap_or(defaults.log_level);

        Self {
            github_user,
            github_api,
            projects_path: text("data-projects-src").unwrap_or(defaults.projects_path),
            translations_path: text("data-translations-src").unwrap_or(defaults.translations_path),
            site_owner: text("data-site-owner").unwrap_or(defaults.site_owner),
            cv_stem: text("data-cv-stem").unwrap_or(defaults.cv_stem),
            cv_path_es: text("data-cv-es").unwrap_or(defaults.cv_path_es),
            cv_path_en: text("data-cv-en").unwrap_or(defaults.cv_path_en),
            log_level,
        }
    }

    pub fn cv_path(&self, language: Language) -> &str {
        match language {
            Language::Es => &self.cv_path_es,
            Language::En => &self.cv_path_en,
        }
    }

    /// Links whose `href` contains the CV file stem, plus links already
    /// rewritten.
    pub fn cv_link_selector(&self) -> String {
        let stem = self.cv_stem.replace('\\', "\\\\").replace('"', "\\\"");
        format!("a[href*=\"{stem}\"], a[{CV_LINK_ATTRIBUTE}]")
    }
}

fn is_valid_github_login(value: &str) -> bool {
    value.len() <= 39
        && !value.starts_with('-')
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let config = SiteConfig::from_lookup(|_| None);
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.github_api.as_str(), "https://api.github.com/");
    }

    #[test]
    fn overrides_are_trimmed_and_applied() {
        let config = SiteConfig::from_lookup(lookup_from(&[
            ("data-github-user", " octocat "),
            ("data-log-level", "debug"),
            ("data-projects-src", "/static/projects.json"),
        ]));

        assert_eq!(config.github_user, "octocat");
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.projects_path, "/static/projects.json");
    }

    #[test]
    fn malformed_overrides_are_ignored() {
        let config = SiteConfig::from_lookup(lookup_from(&[
            ("data-github-user", "not a login"),
            ("data-github-api", "ftp://example.com"),
            ("data-log-level", "loud"),
            ("data-site-owner", "   "),
        ]));

        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn cv_links_are_matched_by_file_stem() {
        let config = SiteConfig::default();
        assert_eq!(
            config.cv_link_selector(),
            "a[href*=\"CV Sebastián Viglione Chiarlone\"], a[data-cv-link]"
        );
        assert!(config.cv_path(Language::Es).contains(&config.cv_stem));
        assert!(config.cv_path(Language::En).contains(&config.cv_stem));

        let custom = SiteConfig::from_lookup(lookup_from(&[("data-cv-stem", "My \"CV\"")]));
        assert_eq!(custom.cv_link_selector(), "a[href*=\"My \\\"CV\\\"\"], a[data-cv-link]");
    }

    #[test]
    fn cv_path_follows_language() {
        let config = SiteConfig::default();
        assert_eq!(config.cv_path(Language::En), DEFAULT_CV_PATH_EN);
        assert_eq!(config.cv_path(Language::Es), DEFAULT_CV_PATH_ES);
    }
}
