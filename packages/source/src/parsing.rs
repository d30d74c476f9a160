//! Field parsing helpers for CENIPA rows.

use chrono::NaiveDateTime;

/// Joins a date and a time-of-day field with a single space and parses the
/// result with the first matching format.
#[must_use]
pub fn parse_date_time(date: &str, time: &str, formats: &[String]) -> Option<NaiveDateTime> {
    let combined = format!("{} {}", date.trim(), time.trim());
    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&combined, fmt).ok())
}

/// Parses a coordinate. Returns `None` if empty or unparseable.
#[must_use]
pub fn parse_coordinate(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .or_else(|| trimmed.replace(',', ".").parse::<f64>().ok())
}

/// Parses the aircraft count, treating empty or unparseable values as zero.
#[must_use]
pub fn parse_count(s: &str) -> u32 {
    let trimmed = s.trim();
    trimmed.parse::<u32>().unwrap_or_else(|_| {
        if !trimmed.is_empty() {
            log::debug!("Unparseable aircraft count '{trimmed}', using 0");
        }
        0
    })
}

/// Returns `None` for empty strings.
#[must_use]
pub fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
