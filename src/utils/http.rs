// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch a page body with retry.
///
/// Network errors and non-success statuses are retried up to
/// `config.fetch_attempts` times with a linearly growing backoff.
pub async fn fetch_text(client: &reqwest::Client, url: &str, config: &HttpConfig) -> Result<String> {
    let attempts = config.fetch_attempts.max(1);
    let mut last_err: Option<AppError> = None;

    for attempt in 1..=attempts {
        match try_fetch(client, url).await {
            Ok(body) => return Ok(body),
            Err(e) => {
                log::debug!("Fetch attempt {attempt}/{attempts} failed for {url}: {e}");
                last_err = Some(e);
            }
        }

        if attempt < attempts {
            let backoff = Duration::from_millis(config.retry_backoff_ms * u64::from(attempt));
            tokio::time::sleep(backoff).await;
        }
    }

    Err(last_err.unwrap_or_else(|| AppError::scrape(url, "fetch failed without attempts")))
}

async fn try_fetch(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::scrape(url, format!("status {status}")));
    }
    Ok(response.text().await?)
}
