// src/services/listings.rs

//! Listing detail scraper.
//!
//! Extracts a structured [`Listing`] from a listing detail page. Field
//! recovery is heuristic by nature: OpenGraph metadata where the site
//! provides it, label-matched definition lists and text patterns elsewhere.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{Config, Listing, ListingStats, ScrapeConfig, SellerInfo};
use crate::utils::http::fetch_text;
use crate::utils::text::{normalize_whitespace, parse_count, parse_decimal};
use crate::utils::time::parse_relative;

/// Service for scraping listing detail pages.
pub struct ListingScraper {
    config: Arc<Config>,
    client: Client,
}

impl ListingScraper {
    /// Create a new listing scraper sharing the given HTTP client.
    pub fn new(config: Arc<Config>, client: Client) -> Self {
        Self { config, client }
    }

    /// Fetch and parse a single listing page.
    pub async fn scrape(&self, url: &str) -> Result<Listing> {
        let html = fetch_text(&self.client, url, &self.config.http).await?;
        parse_listing(&html, url, &self.config.scrape, Utc::now())
    }
}

/// Parse a listing detail page into a [`Listing`].
pub(crate) fn parse_listing(
    html: &str,
    url: &str,
    config: &ScrapeConfig,
    now: DateTime<Utc>,
) -> Result<Listing> {
    let document = Html::parse_document(html);

    let title = first_text(&document, "h1")?
        .ok_or_else(|| AppError::scrape(url, "no title element"))?;

    let description = meta_content(&document, "og:description")?.unwrap_or_default();

    let price_amount = meta_content(&document, "product:price:amount")?;
    let price_currency = meta_content(&document, "product:price:currency")?;

    let images = collect_images(&document, config.max_images)?;

    let brand = definition_value(&document, &config.brand_labels)?;
    let size = definition_value(&document, &config.size_labels)?;
    let condition = definition_value(&document, &config.condition_labels)?;

    let page_text = document.root_element().text().collect::<String>();

    let seller = extract_seller(&document, &page_text)?;
    let stats = extract_stats(&page_text);
    let listed_at = extract_listed_at(&document, &page_text, now)?;

    Ok(Listing {
        url: url.to_string(),
        title,
        description,
        price_amount,
        price_currency,
        images,
        brand,
        size,
        condition,
        seller,
        stats,
        listed_at,
        scraped_at: now,
    })
}

/// Text of the first element matching `selector`, whitespace-normalized.
fn first_text(document: &Html, selector: &str) -> Result<Option<String>> {
    let sel = parse_selector(selector)?;
    Ok(document
        .select(&sel)
        .next()
        .map(|el| normalize_whitespace(&el.text().collect::<String>()))
        .filter(|s| !s.is_empty()))
}

/// Content of a `<meta property="...">` tag.
fn meta_content(document: &Html, property: &str) -> Result<Option<String>> {
    let sel = parse_selector(&format!(r#"meta[property="{property}"]"#))?;
    Ok(document
        .select(&sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Gallery images: og:image first, then page `<img>` sources.
///
/// Relative sources are site chrome (sprites, icons), not photos; only
/// absolute URLs are kept.
fn collect_images(document: &Html, cap: usize) -> Result<Vec<String>> {
    let mut images = Vec::new();

    if let Some(og) = meta_content(document, "og:image")? {
        images.push(og);
    }

    let img_sel = parse_selector("img")?;
    for img in document.select(&img_sel) {
        let Some(src) = img.value().attr("src").or_else(|| img.value().attr("data-src")) else {
            continue;
        };
        if !src.starts_with("http://") && !src.starts_with("https://") {
            continue;
        }
        let src = src.to_string();
        if !images.contains(&src) {
            images.push(src);
        }
        if images.len() >= cap {
            break;
        }
    }

    images.truncate(cap);
    Ok(images)
}

/// Value of the `<dd>` following a `<dt>` whose label matches any of `labels`.
fn definition_value(document: &Html, labels: &[String]) -> Result<Option<String>> {
    let dt_sel = parse_selector("dt")?;

    for dt in document.select(&dt_sel) {
        let label = normalize_whitespace(&dt.text().collect::<String>()).to_lowercase();
        if !labels.iter().any(|l| label.contains(&l.to_lowercase())) {
            continue;
        }
        let Some(dd) = dt.next_siblings().find_map(ElementRef::wrap) else {
            continue;
        };
        let value = normalize_whitespace(&dd.text().collect::<String>());
        if !value.is_empty() {
            return Ok(Some(value));
        }
    }

    Ok(None)
}

/// Seller block: username from the member link, rating/reviews from text.
fn extract_seller(document: &Html, page_text: &str) -> Result<Option<SellerInfo>> {
    let anchor_sel = parse_selector(r#"a[href*="/member/"]"#)?;
    let span_sel = parse_selector("span")?;

    let Some(anchor) = document.select(&anchor_sel).next() else {
        return Ok(None);
    };

    let username = anchor
        .select(&span_sel)
        .next()
        .map(|el| normalize_whitespace(&el.text().collect::<String>()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| normalize_whitespace(&anchor.text().collect::<String>()));

    if username.is_empty() {
        return Ok(None);
    }

    let rating = Regex::new(r"([\d.,]+)\s*(?:out of 5|de 5|★)")
        .ok()
        .and_then(|re| re.captures(page_text).and_then(|c| parse_decimal(&c[1])))
        .filter(|r| (0.0..=5.0).contains(r));

    let review_count = Regex::new(r"(?i)(\d+)\s+(?:reviews?|avalia\w+)")
        .ok()
        .and_then(|re| re.captures(page_text).and_then(|c| parse_count(&c[1])));

    Ok(Some(SellerInfo {
        username,
        rating,
        review_count,
    }))
}

/// Favourite and view counters from page text.
fn extract_stats(page_text: &str) -> ListingStats {
    let favourites = Regex::new(r"(?i)fav(?:ou?)?rit\w*\s*\(?(\d+)\)?")
        .ok()
        .and_then(|re| re.captures(page_text).and_then(|c| parse_count(&c[1])));

    let views = Regex::new(r"(?i)\b(?:views?|visualiza\w+)\s*\(?(\d+)\)?")
        .ok()
        .and_then(|re| re.captures(page_text).and_then(|c| parse_count(&c[1])));

    ListingStats { favourites, views }
}

/// Publication time: a machine-readable `<time datetime>` when present,
/// otherwise relative-age text anywhere on the page.
fn extract_listed_at(
    document: &Html,
    page_text: &str,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>> {
    let time_sel = parse_selector("time[datetime]")?;
    for time_el in document.select(&time_sel) {
        if let Some(datetime) = time_el.value().attr("datetime") {
            if let Ok(parsed) = DateTime::parse_from_rfc3339(datetime) {
                return Ok(Some(parsed.with_timezone(&Utc)));
            }
        }
    }

    Ok(parse_relative(page_text, now))
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
