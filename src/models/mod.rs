// src/models/mod.rs

//! Domain models for the monitor application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod listing;

// Re-export all public types
pub use config::{
    Config, DedupConfig, HttpConfig, ProfileConfig, ScrapeConfig, WebhookConfig, ENV_WEBHOOK_URL,
};
pub use listing::{ledger_key_for_url, Listing, ListingStats, SellerInfo};
