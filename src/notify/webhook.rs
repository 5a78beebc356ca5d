// src/notify/webhook.rs

//! Webhook delivery with retry/backoff.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::error::{AppError, Result};
use crate::models::WebhookConfig;
use crate::notify::WebhookPayload;

/// Client for delivering payloads to a single webhook endpoint.
///
/// Retry policy:
/// - 2xx: success
/// - 429: wait for `Retry-After` (capped), then retry
/// - network/timeout errors: linearly growing backoff, then retry
/// - any other status: fail immediately; the ledger stays unmarked and the
///   next scheduled run retries the item naturally
pub struct WebhookClient {
    client: Client,
    url: String,
    max_attempts: u32,
    backoff: Duration,
    retry_after_cap: Duration,
}

impl WebhookClient {
    /// Create a client for the given endpoint.
    pub fn new(config: &WebhookConfig, url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            max_attempts: config.max_attempts.max(1),
            backoff: Duration::from_millis(config.retry_backoff_ms),
            retry_after_cap: Duration::from_secs(config.retry_after_cap_secs),
        })
    }

    /// Endpoint this client posts to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Deliver one payload, consuming retry attempts as needed.
    pub async fn post(&self, payload: &WebhookPayload) -> Result<()> {
        let mut last_message = String::new();

        for attempt in 1..=self.max_attempts {
            match self.client.post(&self.url).json(payload).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(());
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS && attempt < self.max_attempts {
                        let wait = self.retry_after(&response);
                        log::warn!(
                            "Webhook rate limited (attempt {attempt}/{}), retrying in {:?}",
                            self.max_attempts,
                            wait
                        );
                        tokio::time::sleep(wait).await;
                        continue;
                    }

                    let body = response.text().await.unwrap_or_default();
                    return Err(AppError::webhook(status.as_u16(), body));
                }
                Err(error) => {
                    last_message = error.to_string();
                    log::warn!(
                        "Webhook delivery attempt {attempt}/{} failed: {error}",
                        self.max_attempts
                    );
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.backoff * attempt).await;
                    }
                }
            }
        }

        Err(AppError::WebhookExhausted {
            attempts: self.max_attempts,
            message: last_message,
        })
    }

    /// Wait suggested by the endpoint, capped so a hostile header can't
    /// stall a scheduled run.
    fn retry_after(&self, response: &Response) -> Duration {
        let suggested = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|secs| (0.0..=86_400.0).contains(secs))
            .map(Duration::from_secs_f64)
            .unwrap_or(Duration::from_secs(1));

        suggested.min(self.retry_after_cap)
    }
}
