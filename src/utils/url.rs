// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

/// Resolve a potentially relative URL against a base URL.
///
/// # Examples
/// ```
/// use vitrine::utils::url::resolve;
///
/// assert_eq!(
///     resolve("https://example.com/path/", "page.html"),
///     "https://example.com/path/page.html"
/// );
/// ```
pub fn resolve(base: &str, href: &str) -> String {
    match Url::parse(base) {
        Ok(base_url) => base_url
            .join(href)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| href.to_string()),
        Err(_) => href.to_string(),
    }
}

/// Extract domain from a URL.
pub fn get_domain(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_lowercase()))
}

/// Extract the numeric listing identifier from a listing URL.
///
/// Listing pages live under `/items/<digits>` (a trailing slug after the
/// digits is common, e.g. `/items/123456-wool-sweater`). Falls back to an
/// id-like query parameter holding only digits.
pub fn extract_listing_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;

    let mut segments = parsed.path_segments()?;
    while let Some(segment) = segments.next() {
        if segment != "items" {
            continue;
        }
        if let Some(next) = segments.next() {
            let digits: String = next.chars().take_while(|c| c.is_ascii_digit()).collect();
            if !digits.is_empty() {
                return Some(digits);
            }
        }
        break;
    }

    for (key, value) in parsed.query_pairs() {
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if matches!(key.to_lowercase().as_str(), "item" | "item_id" | "id") {
            return Some(value.to_string());
        }
    }

    None
}
