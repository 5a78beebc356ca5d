//! Application configuration structures.

use std::fs;
use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable that overrides `webhook.url` from the config file.
///
/// Webhook URLs are credentials; CI setups keep them out of committed config.
pub const ENV_WEBHOOK_URL: &str = "VITRINE_WEBHOOK_URL";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client and fetch behavior settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Listing extraction settings
    #[serde(default)]
    pub scrape: ScrapeConfig,

    /// Repost suppression and ledger retention settings
    #[serde(default)]
    pub dedup: DedupConfig,

    /// Webhook delivery and embed appearance settings
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Seller profiles to monitor
    #[serde(default)]
    pub profiles: Vec<ProfileConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.http.fetch_attempts == 0 {
            return Err(AppError::validation("http.fetch_attempts must be > 0"));
        }
        if self.http.max_concurrent == 0 {
            return Err(AppError::validation("http.max_concurrent must be > 0"));
        }
        if self.scrape.max_items_per_profile == 0 {
            return Err(AppError::validation(
                "scrape.max_items_per_profile must be > 0",
            ));
        }
        if self.dedup.freshness_window_hours == 0 {
            return Err(AppError::validation(
                "dedup.freshness_window_hours must be > 0",
            ));
        }
        if self.dedup.retention_days == 0 {
            return Err(AppError::validation("dedup.retention_days must be > 0"));
        }
        // Retention horizon must cover the repost window, otherwise a pruned
        // record could let the same item repost inside the window.
        if self.dedup.retention_days * 24 < self.dedup.freshness_window_hours {
            return Err(AppError::validation(
                "dedup.retention_days must cover dedup.freshness_window_hours",
            ));
        }
        if self.webhook.max_attempts == 0 {
            return Err(AppError::validation("webhook.max_attempts must be > 0"));
        }
        if self.profiles.is_empty() {
            return Err(AppError::validation("No profiles defined"));
        }
        for profile in &self.profiles {
            if !profile.url.starts_with("http://") && !profile.url.starts_with("https://") {
                return Err(AppError::validation(format!(
                    "Profile '{}' has a non-absolute URL: {}",
                    profile.name, profile.url
                )));
            }
        }
        Ok(())
    }

    /// Resolve the webhook URL: environment variable wins over the file.
    pub fn webhook_url(&self) -> Result<String> {
        if let Ok(url) = std::env::var(ENV_WEBHOOK_URL) {
            if !url.trim().is_empty() {
                return Ok(url);
            }
        }
        self.webhook
            .url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                AppError::config(format!(
                    "No webhook URL: set {ENV_WEBHOOK_URL} or webhook.url in the config file"
                ))
            })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            scrape: ScrapeConfig::default(),
            dedup: DedupConfig::default(),
            webhook: WebhookConfig::default(),
            profiles: Vec::new(),
        }
    }
}

/// HTTP client and fetch behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Attempts per page fetch (first try included)
    #[serde(default = "defaults::fetch_attempts")]
    pub fetch_attempts: u32,

    /// Base backoff between fetch attempts in milliseconds (grows linearly)
    #[serde(default = "defaults::retry_backoff")]
    pub retry_backoff_ms: u64,

    /// Delay between listing scrapes in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum concurrent profile page fetches
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            fetch_attempts: defaults::fetch_attempts(),
            retry_backoff_ms: defaults::retry_backoff(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Listing extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Maximum listing links collected per profile page
    #[serde(default = "defaults::max_items_per_profile")]
    pub max_items_per_profile: usize,

    /// Maximum images kept per listing
    #[serde(default = "defaults::max_images")]
    pub max_images: usize,

    /// `<dt>` labels that identify the brand row
    #[serde(default = "defaults::brand_labels")]
    pub brand_labels: Vec<String>,

    /// `<dt>` labels that identify the size row
    #[serde(default = "defaults::size_labels")]
    pub size_labels: Vec<String>,

    /// `<dt>` labels that identify the condition row
    #[serde(default = "defaults::condition_labels")]
    pub condition_labels: Vec<String>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_items_per_profile: defaults::max_items_per_profile(),
            max_images: defaults::max_images(),
            brand_labels: defaults::brand_labels(),
            size_labels: defaults::size_labels(),
            condition_labels: defaults::condition_labels(),
        }
    }
}

/// Repost suppression and ledger retention settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Minimum hours before the same item may be posted again
    #[serde(default = "defaults::freshness_window_hours")]
    pub freshness_window_hours: i64,

    /// Listings older than this many hours are never posted
    #[serde(default = "defaults::max_listing_age_hours")]
    pub max_listing_age_hours: i64,

    /// Ledger records older than this many days are pruned
    #[serde(default = "defaults::retention_days")]
    pub retention_days: i64,

    /// Minimum hours between prune passes
    #[serde(default = "defaults::prune_interval_hours")]
    pub prune_interval_hours: i64,
}

impl DedupConfig {
    /// Repost suppression window W.
    pub fn freshness_window(&self) -> Duration {
        Duration::hours(self.freshness_window_hours)
    }

    /// Maximum accepted listing age.
    pub fn max_listing_age(&self) -> Duration {
        Duration::hours(self.max_listing_age_hours)
    }

    /// Retention horizon R.
    pub fn retention(&self) -> Duration {
        Duration::days(self.retention_days)
    }

    /// Minimum interval between prune passes.
    pub fn prune_interval(&self) -> Duration {
        Duration::hours(self.prune_interval_hours)
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            freshness_window_hours: defaults::freshness_window_hours(),
            max_listing_age_hours: defaults::max_listing_age_hours(),
            retention_days: defaults::retention_days(),
            prune_interval_hours: defaults::prune_interval_hours(),
        }
    }
}

/// Webhook delivery and embed appearance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Webhook endpoint URL (overridden by the environment variable)
    #[serde(default)]
    pub url: Option<String>,

    /// Bot display name on posted messages
    #[serde(default = "defaults::webhook_username")]
    pub username: String,

    /// Bot avatar image URL
    #[serde(default)]
    pub avatar_url: Option<String>,

    /// Footer line on every embed
    #[serde(default = "defaults::footer_text")]
    pub footer_text: String,

    /// Accent color for the main embed
    #[serde(default = "defaults::embed_color")]
    pub color: u32,

    /// Accent color for trailing gallery embeds
    #[serde(default = "defaults::gallery_color")]
    pub gallery_color: u32,

    /// Additional image-only embeds appended after the main embed
    #[serde(default = "defaults::max_gallery_images")]
    pub max_gallery_images: usize,

    /// Maximum new posts per profile per run
    #[serde(default = "defaults::max_new_per_profile")]
    pub max_new_per_profile: usize,

    /// Webhook request timeout in seconds
    #[serde(default = "defaults::webhook_timeout")]
    pub timeout_secs: u64,

    /// Delivery attempts per payload (first try included)
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: u32,

    /// Base backoff between delivery attempts in milliseconds (grows linearly)
    #[serde(default = "defaults::webhook_backoff")]
    pub retry_backoff_ms: u64,

    /// Cap on honored Retry-After waits in seconds
    #[serde(default = "defaults::retry_after_cap")]
    pub retry_after_cap_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            username: defaults::webhook_username(),
            avatar_url: None,
            footer_text: defaults::footer_text(),
            color: defaults::embed_color(),
            gallery_color: defaults::gallery_color(),
            max_gallery_images: defaults::max_gallery_images(),
            max_new_per_profile: defaults::max_new_per_profile(),
            timeout_secs: defaults::webhook_timeout(),
            max_attempts: defaults::max_attempts(),
            retry_backoff_ms: defaults::webhook_backoff(),
            retry_after_cap_secs: defaults::retry_after_cap(),
        }
    }
}

/// A seller profile to monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Display name used in logs
    pub name: String,

    /// URL of the seller's profile page
    pub url: String,
}

mod defaults {
    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn fetch_attempts() -> u32 {
        2
    }
    pub fn retry_backoff() -> u64 {
        2000
    }
    pub fn request_delay() -> u64 {
        800
    }
    pub fn max_concurrent() -> usize {
        4
    }

    // Scrape defaults
    pub fn max_items_per_profile() -> usize {
        10
    }
    pub fn max_images() -> usize {
        6
    }
    pub fn brand_labels() -> Vec<String> {
        vec!["brand".into(), "marca".into()]
    }
    pub fn size_labels() -> Vec<String> {
        vec!["size".into(), "tamanho".into()]
    }
    pub fn condition_labels() -> Vec<String> {
        vec!["condition".into(), "estado".into()]
    }

    // Dedup defaults
    pub fn freshness_window_hours() -> i64 {
        72
    }
    pub fn max_listing_age_hours() -> i64 {
        24
    }
    pub fn retention_days() -> i64 {
        30
    }
    pub fn prune_interval_hours() -> i64 {
        6
    }

    // Webhook defaults
    pub fn webhook_username() -> String {
        "vitrine".into()
    }
    pub fn footer_text() -> String {
        "vitrine • seller monitor".into()
    }
    pub fn embed_color() -> u32 {
        0x2b6cb0
    }
    pub fn gallery_color() -> u32 {
        0x263238
    }
    pub fn max_gallery_images() -> usize {
        2
    }
    pub fn max_new_per_profile() -> usize {
        5
    }
    pub fn webhook_timeout() -> u64 {
        20
    }
    pub fn max_attempts() -> u32 {
        3
    }
    pub fn webhook_backoff() -> u64 {
        1000
    }
    pub fn retry_after_cap() -> u64 {
        5
    }
}
