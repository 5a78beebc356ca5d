// src/pipeline/freshness.rs

//! Freshness gate: repost suppression combined with listing-age filtering.

use chrono::{DateTime, Duration, Utc};

use crate::models::DedupConfig;
use crate::state::{GateDecision, PostLedger};

/// Gate thresholds derived from config.
#[derive(Debug, Clone, Copy)]
pub struct GatePolicy {
    /// Repost suppression window W
    pub repost_window: Duration,

    /// Oldest accepted listing age
    pub max_listing_age: Duration,
}

impl GatePolicy {
    pub fn from_config(config: &DedupConfig) -> Self {
        Self {
            repost_window: config.freshness_window(),
            max_listing_age: config.max_listing_age(),
        }
    }
}

/// Outcome of gating one candidate listing.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Deliver it
    Post,

    /// Posted within the suppression window
    SkipRecentlyPosted { since: DateTime<Utc> },

    /// Listing is older than the accepted age
    SkipTooOld { listed_at: DateTime<Utc> },
}

/// Gate a candidate against the ledger and its own age.
///
/// A listing with no recoverable publication time is gated by the ledger
/// alone: posted once, then suppressed for the window.
pub fn evaluate(
    key: &str,
    listed_at: Option<DateTime<Utc>>,
    ledger: &PostLedger,
    now: DateTime<Utc>,
    policy: &GatePolicy,
) -> Decision {
    if let Some(listed_at) = listed_at {
        if now - listed_at > policy.max_listing_age {
            return Decision::SkipTooOld { listed_at };
        }
    }

    match ledger.decide(key, now, policy.repost_window) {
        GateDecision::RecentlyPosted { since } => Decision::SkipRecentlyPosted { since },
        GateDecision::Fresh => Decision::Post,
    }
}
