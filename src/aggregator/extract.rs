//! Per-record field coercion and nested action extraction.
//!
//! Every helper here is total: unparsable, missing, negative or non-finite
//! inputs become zero.

use crate::insights::schema::{ActionEntry, RawCampaignRecord};
use crate::utils::config::PURCHASE_ACTION_TYPE;
use serde_json::Value;

/// Numeric view of one raw record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedRecord {
    pub campaign_name: String,
    pub spend: f64,
    pub sales: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
}

/// Coerce every field of a raw record
pub fn extract_record(record: &RawCampaignRecord) -> ExtractedRecord {
    ExtractedRecord {
        campaign_name: coerce_name(&record.campaign_name),
        spend: coerce_decimal(&record.spend),
        sales: extract_first_purchase_value(record.action_values.as_deref()),
        impressions: coerce_count(&record.impressions),
        clicks: coerce_count(&record.clicks),
        conversions: truncate_count(extract_first_purchase_value(record.actions.as_deref())),
    }
}

/// Value of the first `purchase` entry, or 0.
///
/// Only the first match counts: an unparsable value on that entry yields 0
/// rather than falling through to a later entry.
pub fn extract_first_purchase_value(actions: Option<&[ActionEntry]>) -> f64 {
    actions
        .unwrap_or_default()
        .iter()
        .find(|entry| entry.action_type.as_deref() == Some(PURCHASE_ACTION_TYPE))
        .map(|entry| coerce_decimal(&entry.value))
        .unwrap_or(0.0)
}

/// Parse a loose JSON value as a non-negative decimal
pub fn coerce_decimal(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Parse a loose JSON value as a non-negative integer, truncating decimals
pub fn coerce_count(value: &Value) -> u64 {
    truncate_count(coerce_decimal(value))
}

fn truncate_count(value: f64) -> u64 {
    // float-to-int casts saturate
    value.trunc() as u64
}

/// Grouping key for a record. Missing names group under the empty string.
pub fn coerce_name(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
