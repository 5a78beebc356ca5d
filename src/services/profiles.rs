// src/services/profiles.rs

//! Profile sweep service.
//!
//! Collects listing links from seller profile pages.

use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use reqwest::Client;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{Config, ProfileConfig};
use crate::utils::http::fetch_text;
use crate::utils::url::{extract_listing_id, resolve};

/// Listing URLs collected from one profile.
#[derive(Debug, Clone)]
pub struct ProfileListings {
    pub profile: ProfileConfig,
    pub urls: Vec<String>,
}

/// Summary of a full profile sweep.
#[derive(Debug, Default)]
pub struct ProfileSweep {
    pub profiles: Vec<ProfileListings>,
    pub profile_total: usize,
    pub profile_failures: usize,
}

/// Service for collecting listing links from seller profiles.
pub struct ProfileScraper {
    config: Arc<Config>,
    client: Client,
}

impl ProfileScraper {
    /// Create a new profile scraper sharing the given HTTP client.
    pub fn new(config: Arc<Config>, client: Client) -> Self {
        Self { config, client }
    }

    /// Sweep all profiles concurrently, bounded by `http.max_concurrent`.
    ///
    /// A profile that fails to fetch is counted and skipped; the sweep
    /// itself never fails.
    pub async fn collect_all(&self, profiles: &[ProfileConfig]) -> ProfileSweep {
        let concurrency = self.config.http.max_concurrent.max(1);

        let mut sweep = ProfileSweep {
            profile_total: profiles.len(),
            ..ProfileSweep::default()
        };

        let mut profile_stream = stream::iter(profiles.iter().cloned())
            .map(|profile| async move {
                let result = self.collect_listing_urls(&profile).await;
                (profile, result)
            })
            .buffer_unordered(concurrency);

        while let Some((profile, result)) = profile_stream.next().await {
            match result {
                Ok(urls) => {
                    log::info!("Profile {}: {} listing links", profile.name, urls.len());
                    sweep.profiles.push(ProfileListings { profile, urls });
                }
                Err(error) => {
                    sweep.profile_failures += 1;
                    log::warn!(
                        "Failed to sweep profile {} ({}): {}",
                        profile.name,
                        profile.url,
                        error
                    );
                }
            }
        }

        sweep
    }

    /// Collect listing URLs from a single profile page.
    pub async fn collect_listing_urls(&self, profile: &ProfileConfig) -> Result<Vec<String>> {
        let html = fetch_text(&self.client, &profile.url, &self.config.http).await?;
        extract_listing_urls(
            &html,
            &profile.url,
            self.config.scrape.max_items_per_profile,
        )
    }
}

/// Pull listing links out of a profile page.
///
/// Keeps only anchors whose resolved URL carries a listing identity, dedupes
/// preserving document order, and caps the result.
fn extract_listing_urls(html: &str, base_url: &str, cap: usize) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let anchor_sel = parse_selector(r#"a[href*="/items/"]"#)?;

    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for anchor in document.select(&anchor_sel) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let absolute = resolve(base_url, href);
        if extract_listing_id(&absolute).is_none() {
            continue;
        }
        if seen.insert(absolute.clone()) {
            urls.push(absolute);
        }
        if urls.len() >= cap {
            break;
        }
    }

    Ok(urls)
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
