// src/state/ledger.rs

//! The post ledger: repost suppression with time-windowed pruning.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A single successful-post record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostRecord {
    /// When the item was last posted
    pub posted_at: DateTime<Utc>,

    /// Listing URL at post time
    pub url: String,
}

/// Decision for a candidate key against the ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// Never posted, or last post is outside the suppression window
    Fresh,

    /// Posted within the suppression window
    RecentlyPosted { since: DateTime<Utc> },
}

/// Persisted map of posted items plus prune bookkeeping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostLedger {
    /// Posted items keyed by stable listing identity
    #[serde(default)]
    posted: HashMap<String, PostRecord>,

    /// When the last prune pass ran
    #[serde(default)]
    last_prune: Option<DateTime<Utc>>,
}

impl PostLedger {
    /// Number of records in the ledger.
    pub fn len(&self) -> usize {
        self.posted.len()
    }

    /// Whether the ledger holds no records.
    pub fn is_empty(&self) -> bool {
        self.posted.is_empty()
    }

    /// When the last prune pass ran.
    pub fn last_prune(&self) -> Option<DateTime<Utc>> {
        self.last_prune
    }

    /// Look up the record for a key.
    pub fn record(&self, key: &str) -> Option<&PostRecord> {
        self.posted.get(key)
    }

    /// Check a key against the repost-suppression window.
    pub fn decide(&self, key: &str, now: DateTime<Utc>, window: Duration) -> GateDecision {
        match self.posted.get(key) {
            Some(record) if now - record.posted_at < window => GateDecision::RecentlyPosted {
                since: record.posted_at,
            },
            _ => GateDecision::Fresh,
        }
    }

    /// Record a confirmed-successful post.
    ///
    /// Callers must only invoke this after the webhook accepted the payload;
    /// a failed delivery leaves the key unmarked so the next run retries.
    pub fn mark_posted(&mut self, key: impl Into<String>, url: impl Into<String>, now: DateTime<Utc>) {
        self.posted.insert(
            key.into(),
            PostRecord {
                posted_at: now,
                url: url.into(),
            },
        );
    }

    /// Drop records older than `retention`, at most once per `min_interval`.
    ///
    /// Returns the number of records removed (0 when the pass was skipped).
    pub fn prune(&mut self, now: DateTime<Utc>, retention: Duration, min_interval: Duration) -> usize {
        if let Some(last) = self.last_prune {
            if now - last < min_interval {
                return 0;
            }
        }
        self.prune_now(now, retention)
    }

    /// Drop records older than `retention` unconditionally.
    pub fn prune_now(&mut self, now: DateTime<Utc>, retention: Duration) -> usize {
        let cutoff = now - retention;
        let before = self.posted.len();
        self.posted.retain(|_, record| record.posted_at >= cutoff);
        self.last_prune = Some(now);
        before - self.posted.len()
    }
}
