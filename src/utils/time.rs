// src/utils/time.rs

//! Relative-time parsing and formatting.
//!
//! Listing pages show publication age as text ("3 hours ago", "há 3 horas")
//! rather than machine-readable timestamps, so recovery is heuristic.

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

/// Recover an absolute timestamp from relative-age text.
///
/// Understands English ("N units ago", "just now") and Portuguese
/// ("há N units", "agora") unit words. Returns `None` when the text holds no
/// recognizable age.
pub fn parse_relative(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let lower = text.to_lowercase();

    if lower.contains("just now") || lower.split_whitespace().any(|w| w == "agora") {
        return Some(now);
    }

    let suffixed = Regex::new(r"(\d+)\s+(minute|hour|day|week)s?\s+ago").ok()?;
    let prefixed = Regex::new(r"há\s+(\d+)\s+(minuto|hora|dia|semana)s?").ok()?;

    let (count, unit) = if let Some(caps) = suffixed.captures(&lower) {
        (caps[1].parse::<i64>().ok()?, caps[2].to_string())
    } else if let Some(caps) = prefixed.captures(&lower) {
        (caps[1].parse::<i64>().ok()?, caps[2].to_string())
    } else {
        return None;
    };

    let age = match unit.as_str() {
        "minute" | "minuto" => Duration::minutes(count),
        "hour" | "hora" => Duration::hours(count),
        "day" | "dia" => Duration::days(count),
        "week" | "semana" => Duration::weeks(count),
        _ => return None,
    };

    Some(now - age)
}

/// Render a timestamp as relative-age text, e.g. "3 hours ago".
pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - then).max(Duration::zero());

    let secs = elapsed.num_seconds();
    if secs < 30 {
        return "just now".to_string();
    }

    let minutes = elapsed.num_minutes();
    if minutes < 60 {
        return plural(minutes.max(1), "minute");
    }

    let hours = elapsed.num_hours();
    if hours < 24 {
        return plural(hours, "hour");
    }

    plural(elapsed.num_days(), "day")
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}
