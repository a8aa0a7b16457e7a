//! Value formatting for report cells.

use crate::utils::config::MAX_CAMPAIGN_NAME_CHARS;
use chrono::NaiveDateTime;

/// `"Rs 1234.50"`
pub fn currency(prefix: &str, amount: f64) -> String {
    format!("{} {:.2}", prefix, amount)
}

/// `"5.00%"`
pub fn percentage(value: f64) -> String {
    format!("{:.2}%", value)
}

/// `"5.00"`
pub fn ratio(value: f64) -> String {
    format!("{:.2}", value)
}

/// Cut long campaign names so they fit the name column
pub fn truncate_name(name: &str) -> String {
    if name.chars().count() > MAX_CAMPAIGN_NAME_CHARS {
        let head: String = name.chars().take(MAX_CAMPAIGN_NAME_CHARS).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

/// Title timestamp, e.g. `"2024-03-09 / 11 AM"`
pub fn timestamp_label(at: NaiveDateTime) -> String {
    format!("{} / {}", at.format("%Y-%m-%d"), at.format("%-I %p"))
}

/// The standard PDF fonts only cover Latin-1; anything outside ASCII is
/// replaced so the content stream stays single-byte.
pub fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}
