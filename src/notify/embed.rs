// src/notify/embed.rs

//! Embed payload construction.
//!
//! One layout: a main embed carrying the listing fields and primary image,
//! followed by image-only embeds for the remaining gallery photos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Listing, WebhookConfig};
use crate::utils::text::truncate_graphemes;
use crate::utils::time::format_relative;

/// Platform limit applied to embed descriptions.
const DESCRIPTION_LIMIT: usize = 350;

/// Top-level webhook payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    pub embeds: Vec<Embed>,
}

/// A single embed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

/// A name/value field on an embed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Embed author block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedAuthor {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Embed footer block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
}

/// Embed image block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedImage {
    pub url: String,
}

/// Build the webhook payload for a listing.
///
/// Fields are emitted only for values the scrape actually recovered, so a
/// sparse listing produces a sparse embed rather than a wall of dashes.
pub fn build_payload(
    listing: &Listing,
    detected_at: DateTime<Utc>,
    config: &WebhookConfig,
) -> WebhookPayload {
    let timestamp = detected_at.to_rfc3339();

    let mut fields = Vec::new();
    let mut push = |name: &str, value: Option<String>| {
        if let Some(value) = value {
            fields.push(EmbedField {
                name: name.to_string(),
                value,
                inline: true,
            });
        }
    };

    push("Price", listing.price_text());
    push("Brand", listing.brand.clone());
    push("Size", listing.size.clone());
    push("Condition", listing.condition.clone());
    push(
        "Listed",
        listing
            .listed_at
            .map(|at| format_relative(at, detected_at)),
    );
    push(
        "Favourites",
        listing.stats.favourites.map(|n| n.to_string()),
    );
    push("Views", listing.stats.views.map(|n| n.to_string()));

    if let Some(seller) = &listing.seller {
        if let Some(rating) = seller.rating {
            push(
                "Seller rating",
                Some(format!("{} {rating:.1}", render_stars(rating))),
            );
        }
        push("Reviews", seller.review_count.map(|n| n.to_string()));
    }

    let author = listing.seller.as_ref().map(|seller| EmbedAuthor {
        name: format!("Seller: {}", seller.username),
        url: Some(listing.url.clone()),
        icon_url: None,
    });

    let description = if listing.description.is_empty() {
        None
    } else {
        Some(truncate_graphemes(&listing.description, DESCRIPTION_LIMIT))
    };

    let main = Embed {
        title: Some(listing.title.clone()),
        url: Some(listing.url.clone()),
        description,
        color: Some(config.color),
        timestamp: Some(timestamp.clone()),
        footer: Some(EmbedFooter {
            text: config.footer_text.clone(),
        }),
        author,
        image: listing.images.first().map(|url| EmbedImage { url: url.clone() }),
        fields,
    };

    let gallery = listing
        .images
        .iter()
        .skip(1)
        .take(config.max_gallery_images)
        .map(|url| Embed {
            color: Some(config.gallery_color),
            timestamp: Some(timestamp.clone()),
            footer: Some(EmbedFooter {
                text: config.footer_text.clone(),
            }),
            image: Some(EmbedImage { url: url.clone() }),
            ..Embed::default()
        });

    WebhookPayload {
        username: Some(config.username.clone()),
        avatar_url: config.avatar_url.clone(),
        content: None,
        embeds: std::iter::once(main).chain(gallery).collect(),
    }
}

/// Render an average rating as stars, e.g. 4.3 -> "★★★★☆", 4.8 -> "★★★★½".
fn render_stars(avg: f64) -> String {
    let clamped = avg.clamp(0.0, 5.0);
    let full = clamped.floor() as usize;
    let half = clamped - clamped.floor() >= 0.5;
    let empty = 5 - full - usize::from(half);

    let mut out = "★".repeat(full);
    if half {
        out.push('½');
    }
    out.push_str(&"☆".repeat(empty));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ListingStats, SellerInfo};

    fn detected_at() -> DateTime<Utc> {
        "2026-08-06T12:00:00Z".parse().unwrap()
    }

    fn full_listing() -> Listing {
        Listing {
            url: "https://market.example/items/111".to_string(),
            title: "Wool sweater".to_string(),
            description: "Barely worn.".to_string(),
            price_amount: Some("25.00".to_string()),
            price_currency: Some("EUR".to_string()),
            images: vec![
                "https://img.example/1.jpg".to_string(),
                "https://img.example/2.jpg".to_string(),
                "https://img.example/3.jpg".to_string(),
                "https://img.example/4.jpg".to_string(),
            ],
            brand: Some("Ralph Lauren".to_string()),
            size: Some("L".to_string()),
            condition: Some("Very good".to_string()),
            seller: Some(SellerInfo {
                username: "wool_hoarder".to_string(),
                rating: Some(4.8),
                review_count: Some(152),
            }),
            stats: ListingStats {
                favourites: Some(7),
                views: Some(123),
            },
            listed_at: Some("2026-08-06T09:00:00Z".parse().unwrap()),
            scraped_at: detected_at(),
        }
    }

    fn sparse_listing() -> Listing {
        Listing {
            url: "https://market.example/items/222".to_string(),
            title: "Bare item".to_string(),
            description: String::new(),
            price_amount: None,
            price_currency: None,
            images: vec![],
            brand: None,
            size: None,
            condition: None,
            seller: None,
            stats: ListingStats::default(),
            listed_at: None,
            scraped_at: detected_at(),
        }
    }

    #[test]
    fn main_embed_carries_listing_fields() {
        let payload = build_payload(&full_listing(), detected_at(), &WebhookConfig::default());
        let main = &payload.embeds[0];

        assert_eq!(main.title.as_deref(), Some("Wool sweater"));
        assert_eq!(main.url.as_deref(), Some("https://market.example/items/111"));
        assert_eq!(main.image.as_ref().unwrap().url, "https://img.example/1.jpg");
        assert_eq!(
            main.author.as_ref().unwrap().name,
            "Seller: wool_hoarder"
        );

        let names: Vec<&str> = main.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Price",
                "Brand",
                "Size",
                "Condition",
                "Listed",
                "Favourites",
                "Views",
                "Seller rating",
                "Reviews",
            ]
        );

        let listed = main.fields.iter().find(|f| f.name == "Listed").unwrap();
        assert_eq!(listed.value, "3 hours ago");

        let rating = main.fields.iter().find(|f| f.name == "Seller rating").unwrap();
        assert_eq!(rating.value, "★★★★½ 4.8");
    }

    #[test]
    fn gallery_embeds_are_capped_and_image_only() {
        let payload = build_payload(&full_listing(), detected_at(), &WebhookConfig::default());

        // 1 main + max_gallery_images (default 2), fourth image dropped
        assert_eq!(payload.embeds.len(), 3);
        for gallery in &payload.embeds[1..] {
            assert!(gallery.title.is_none());
            assert!(gallery.fields.is_empty());
            assert!(gallery.image.is_some());
        }
        assert_eq!(
            payload.embeds[1].image.as_ref().unwrap().url,
            "https://img.example/2.jpg"
        );
    }

    #[test]
    fn sparse_listing_emits_no_empty_fields() {
        let payload = build_payload(&sparse_listing(), detected_at(), &WebhookConfig::default());

        assert_eq!(payload.embeds.len(), 1);
        let main = &payload.embeds[0];
        assert!(main.fields.is_empty());
        assert!(main.description.is_none());
        assert!(main.image.is_none());
        assert!(main.author.is_none());
    }

    #[test]
    fn absent_options_are_not_serialized() {
        let payload = build_payload(&sparse_listing(), detected_at(), &WebhookConfig::default());
        let value = serde_json::to_value(&payload).unwrap();

        let main = &value["embeds"][0];
        assert!(main.get("image").is_none());
        assert!(main.get("author").is_none());
        assert!(main.get("fields").is_none());
        assert!(value.get("avatar_url").is_none());
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let mut listing = full_listing();
        listing.description = "x".repeat(500);

        let payload = build_payload(&listing, detected_at(), &WebhookConfig::default());
        let description = payload.embeds[0].description.as_ref().unwrap();
        assert!(description.chars().count() <= 350);
        assert!(description.ends_with('…'));
    }

    #[test]
    fn renders_star_strings() {
        assert_eq!(render_stars(5.0), "★★★★★");
        assert_eq!(render_stars(4.8), "★★★★½");
        assert_eq!(render_stars(4.3), "★★★★☆");
        assert_eq!(render_stars(0.0), "☆☆☆☆☆");
    }
}
