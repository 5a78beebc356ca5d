// src/utils/text.rs

//! Text normalization helpers for scraped content.

use unicode_segmentation::UnicodeSegmentation;

/// Collapse all whitespace runs into single spaces and trim.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max` grapheme clusters, appending an ellipsis when
/// anything was cut. Byte-index truncation would split multi-byte text.
pub fn truncate_graphemes(s: &str, max: usize) -> String {
    let graphemes: Vec<&str> = s.graphemes(true).collect();
    if graphemes.len() <= max {
        return s.to_string();
    }
    let mut out: String = graphemes[..max.saturating_sub(1)].concat();
    out.push('…');
    out
}

/// Parse a counter like "1,234" or "123" from scraped text.
pub fn parse_count(s: &str) -> Option<u32> {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Parse a decimal that may use a comma separator, e.g. "4,8".
pub fn parse_decimal(s: &str) -> Option<f64> {
    s.trim().replace(',', ".").parse().ok()
}
