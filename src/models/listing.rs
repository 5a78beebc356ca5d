//! Listing data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::utils::url::extract_listing_id;

/// A marketplace listing scraped from its detail page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    /// Full URL of the listing page
    pub url: String,

    /// Listing title
    pub title: String,

    /// Listing description (may be empty)
    #[serde(default)]
    pub description: String,

    /// Price amount as scraped (e.g. "25.00")
    #[serde(default)]
    pub price_amount: Option<String>,

    /// ISO currency code as scraped (e.g. "EUR")
    #[serde(default)]
    pub price_currency: Option<String>,

    /// Absolute image URLs, primary first
    #[serde(default)]
    pub images: Vec<String>,

    /// Brand label
    #[serde(default)]
    pub brand: Option<String>,

    /// Size label
    #[serde(default)]
    pub size: Option<String>,

    /// Condition label
    #[serde(default)]
    pub condition: Option<String>,

    /// Seller shown on the listing page
    #[serde(default)]
    pub seller: Option<SellerInfo>,

    /// Engagement counters
    #[serde(default)]
    pub stats: ListingStats,

    /// When the listing was published, recovered from relative-time text
    #[serde(default)]
    pub listed_at: Option<DateTime<Utc>>,

    /// When this record was scraped
    pub scraped_at: DateTime<Utc>,
}

impl Listing {
    /// Stable ledger identity for this listing.
    ///
    /// Uses the numeric ID from the URL when present; otherwise a hex digest
    /// of the full URL so listings without numeric IDs still dedupe.
    pub fn ledger_key(&self) -> String {
        ledger_key_for_url(&self.url)
    }

    /// Combined price text, e.g. "25.00 EUR".
    pub fn price_text(&self) -> Option<String> {
        match (&self.price_amount, &self.price_currency) {
            (Some(amount), Some(currency)) => Some(format!("{amount} {currency}")),
            (Some(amount), None) => Some(amount.clone()),
            _ => None,
        }
    }
}

/// Compute the ledger key for a listing URL.
pub fn ledger_key_for_url(url: &str) -> String {
    match extract_listing_id(url) {
        Some(id) => format!("item:{id}"),
        None => {
            let digest = Sha256::digest(url.as_bytes());
            format!("item:{}", &hex::encode(digest)[..16])
        }
    }
}

/// Seller information shown on a listing page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SellerInfo {
    /// Seller display name
    pub username: String,

    /// Average rating out of 5
    #[serde(default)]
    pub rating: Option<f64>,

    /// Number of reviews behind the rating
    #[serde(default)]
    pub review_count: Option<u32>,
}

/// Engagement counters scraped from a listing page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListingStats {
    /// Favourite count
    #[serde(default)]
    pub favourites: Option<u32>,

    /// View count
    #[serde(default)]
    pub views: Option<u32>,
}
