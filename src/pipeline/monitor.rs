// src/pipeline/monitor.rs

//! Monitor pipeline: sweep profiles, gate, scrape, post, persist.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::error::Result;
use crate::models::{Config, ledger_key_for_url};
use crate::notify::{build_payload, WebhookClient};
use crate::pipeline::freshness::{self, Decision, GatePolicy};
use crate::services::{ListingScraper, ProfileScraper};
use crate::state::LedgerStore;
use crate::utils::http;

/// Counters for one monitor run.
#[derive(Debug, Default)]
pub struct MonitorOutcome {
    pub profile_total: usize,
    pub profile_failures: usize,
    pub listings_seen: usize,
    /// Delivered posts (would-be posts in dry-run)
    pub posted: usize,
    pub skipped_recent: usize,
    pub skipped_old: usize,
    pub scrape_failures: usize,
    pub post_failures: usize,
    pub pruned: usize,
}

/// Run one monitor pass.
///
/// `webhook` of `None` selects dry-run: candidates are logged instead of
/// delivered, and the ledger is neither marked nor saved (no confirmed
/// delivery happened, so there is nothing to record).
pub async fn run_monitor(
    config: &Arc<Config>,
    store: &dyn LedgerStore,
    webhook: Option<&WebhookClient>,
) -> Result<MonitorOutcome> {
    let client = http::create_client(&config.http)?;
    let profile_scraper = ProfileScraper::new(Arc::clone(config), client.clone());
    let listing_scraper = ListingScraper::new(Arc::clone(config), client);

    let policy = GatePolicy::from_config(&config.dedup);
    let delay = Duration::from_millis(config.http.request_delay_ms);
    let max_new = config.webhook.max_new_per_profile;

    let mut ledger = store.load().await?;
    log::info!(
        "Monitoring {} profiles ({} ledger records)",
        config.profiles.len(),
        ledger.len()
    );

    let sweep = profile_scraper.collect_all(&config.profiles).await;

    let mut outcome = MonitorOutcome {
        profile_total: sweep.profile_total,
        profile_failures: sweep.profile_failures,
        ..MonitorOutcome::default()
    };

    for listings in &sweep.profiles {
        let mut new_count = 0;

        for url in &listings.urls {
            outcome.listings_seen += 1;

            if new_count >= max_new {
                log::debug!(
                    "Profile {}: per-run cap of {max_new} reached",
                    listings.profile.name
                );
                break;
            }

            let key = ledger_key_for_url(url);

            // Ledger check first: a suppressed item skips the detail fetch
            if let Decision::SkipRecentlyPosted { since } =
                freshness::evaluate(&key, None, &ledger, Utc::now(), &policy)
            {
                log::debug!("{key} posted at {since}, suppressed");
                outcome.skipped_recent += 1;
                continue;
            }

            let listing = match listing_scraper.scrape(url).await {
                Ok(listing) => listing,
                Err(error) => {
                    outcome.scrape_failures += 1;
                    log::warn!("Failed to scrape {url}: {error}");
                    continue;
                }
            };

            match freshness::evaluate(&key, listing.listed_at, &ledger, Utc::now(), &policy) {
                Decision::Post => {}
                Decision::SkipTooOld { listed_at } => {
                    log::debug!("{key} listed at {listed_at}, too old");
                    outcome.skipped_old += 1;
                    continue;
                }
                Decision::SkipRecentlyPosted { .. } => {
                    outcome.skipped_recent += 1;
                    continue;
                }
            }

            let payload = build_payload(&listing, Utc::now(), &config.webhook);

            match webhook {
                Some(webhook) => match webhook.post(&payload).await {
                    Ok(()) => {
                        ledger.mark_posted(&key, &listing.url, Utc::now());
                        outcome.posted += 1;
                        new_count += 1;
                        log::info!("Posted {}: {}", key, listing.title);
                    }
                    Err(error) => {
                        outcome.post_failures += 1;
                        log::warn!("Failed to post {key}: {error}");
                    }
                },
                None => {
                    outcome.posted += 1;
                    new_count += 1;
                    log::info!("[dry-run] Would post {}: {} -> {}", key, listing.title, listing.url);
                }
            }

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    if webhook.is_some() {
        outcome.pruned = ledger.prune(
            Utc::now(),
            config.dedup.retention(),
            config.dedup.prune_interval(),
        );
        if outcome.pruned > 0 {
            log::info!("Pruned {} expired ledger records", outcome.pruned);
        }
        store.save(&ledger).await?;
    }

    log::info!(
        "Run complete: {} seen, {} posted, {} suppressed, {} too old, {} scrape failures, {} post failures",
        outcome.listings_seen,
        outcome.posted,
        outcome.skipped_recent,
        outcome.skipped_old,
        outcome.scrape_failures,
        outcome.post_failures
    );

    Ok(outcome)
}
