use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

const DEFAULT_CONFIG_FILE: &str = "config.json";
const DEFAULT_SUMMARY_LENGTH: usize = 800;
const DEFAULT_DIGEST_MAX_LENGTH: usize = 4000;
const DEFAULT_SEND_DELAY_MS: u64 = 1000;
const DEFAULT_FEED_BASE_URL: &str = "http://export.arxiv.org/rss/";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Settings read once from the JSON config file.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub detailed_categories: Vec<String>,
    #[serde(default)]
    pub digest_categories: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_summary_length")]
    pub summary_length: usize,
    #[serde(default = "default_digest_max_length")]
    pub digest_max_length: usize,
    #[serde(default = "default_send_delay_ms")]
    pub send_delay_ms: u64,
    #[serde(default = "default_feed_base_url")]
    pub feed_base_url: String,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    // Older flat shape; only kept so it can be rejected with a useful message.
    #[serde(default, skip_serializing)]
    categories: Option<Vec<String>>,
    #[serde(default, skip_serializing)]
    max_items: Option<usize>,
}

fn default_summary_length() -> usize { DEFAULT_SUMMARY_LENGTH }
fn default_digest_max_length() -> usize { DEFAULT_DIGEST_MAX_LENGTH }
fn default_send_delay_ms() -> u64 { DEFAULT_SEND_DELAY_MS }
fn default_feed_base_url() -> String { DEFAULT_FEED_BASE_URL.to_string() }
fn default_http_timeout_secs() -> u64 { DEFAULT_HTTP_TIMEOUT_SECS }

impl Default for Settings {
    fn default() -> Self {
        Self {
            detailed_categories: Vec::new(),
            digest_categories: Vec::new(),
            keywords: Vec::new(),
            summary_length: DEFAULT_SUMMARY_LENGTH,
            digest_max_length: DEFAULT_DIGEST_MAX_LENGTH,
            send_delay_ms: DEFAULT_SEND_DELAY_MS,
            feed_base_url: DEFAULT_FEED_BASE_URL.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            categories: None,
            max_items: None,
        }
    }
}

impl Settings {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(raw).context("parse settings JSON")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("config file not found: {}", path.display());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("load config {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if self.categories.is_some() || self.max_items.is_some() {
            bail!(
                "flat `categories`/`max_items` settings are no longer supported; \
                 use `detailed_categories` and `digest_categories`"
            );
        }
        if Url::parse(&self.feed_base_url).is_err() {
            bail!("invalid feed_base_url: {}", self.feed_base_url);
        }
        Ok(())
    }

    pub fn has_categories(&self) -> bool {
        !self.detailed_categories.is_empty() || !self.digest_categories.is_empty()
    }

    /// Detailed then digest categories, first occurrence wins.
    pub fn merged_categories(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for cat in self.detailed_categories.iter().chain(self.digest_categories.iter()) {
            if !out.contains(cat) { out.push(cat.clone()); }
        }
        out
    }

    pub fn feed_url(&self) -> String {
        let base = self.feed_base_url.trim_end_matches('/');
        format!("{}/{}", base, self.merged_categories().join("+"))
    }

    pub fn send_delay(&self) -> Duration { Duration::from_millis(self.send_delay_ms) }

    pub fn http_timeout(&self) -> Duration { Duration::from_secs(self.http_timeout_secs) }
}

/// Resolve the config path: explicit flag, then ARXIV_PUSH_CONFIG, then ./config.json.
pub fn resolve_path(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var("ARXIV_PUSH_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Chat delivery credentials; delivery is disabled unless both are set.
#[derive(Clone, Default)]
pub struct Credentials {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            bot_token: non_empty_env("TG_BOT_TOKEN"),
            chat_id: non_empty_env("TG_CHAT_ID"),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let s = Settings::from_json_str(r#"{"detailed_categories": ["cs.AI"]}"#).unwrap();
        assert_eq!(s.detailed_categories, vec!["cs.AI"]);
        assert!(s.digest_categories.is_empty());
        assert!(s.keywords.is_empty());
        assert_eq!(s.summary_length, 800);
        assert_eq!(s.digest_max_length, 4000);
        assert_eq!(s.send_delay_ms, 1000);
        assert_eq!(s.feed_base_url, "http://export.arxiv.org/rss/");
    }

    #[test]
    fn merged_categories_dedupes_in_order() {
        let s = Settings::from_json_str(
            r#"{"detailed_categories": ["cs.AI", "cs.LG"], "digest_categories": ["cs.LG", "cs.CE", "cs.AI"]}"#,
        ).unwrap();
        assert_eq!(s.merged_categories(), vec!["cs.AI", "cs.LG", "cs.CE"]);
        assert_eq!(s.feed_url(), "http://export.arxiv.org/rss/cs.AI+cs.LG+cs.CE");
    }

    #[test]
    fn empty_lists_have_no_categories() {
        let s = Settings::from_json_str("{}").unwrap();
        assert!(!s.has_categories());
    }

    #[test]
    fn legacy_flat_shape_is_rejected() {
        let err = Settings::from_json_str(r#"{"categories": ["cs.AI"], "max_items": 5}"#).unwrap_err();
        assert!(format!("{err:#}").contains("no longer supported"));
    }

    #[test]
    fn invalid_feed_base_url_is_rejected() {
        assert!(Settings::from_json_str(r#"{"feed_base_url": "not a url"}"#).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Settings::load(Path::new("/definitely/not/here/config.json")).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_wins() {
        let p = resolve_path(Some(PathBuf::from("/tmp/custom.json")));
        assert_eq!(p, PathBuf::from("/tmp/custom.json"));
    }

    #[test]
    fn credentials_debug_redacts_token() {
        let c = Credentials { bot_token: Some("secret".into()), chat_id: Some("42".into()) };
        let s = format!("{c:?}");
        assert!(!s.contains("secret"));
        assert!(c.is_complete());
        assert!(!Credentials::default().is_complete());
    }
}
