//! Raw insights record schema.
//!
//! The insights edge returns loosely typed rows: numbers arrive as strings,
//! fields go missing, and `actions`/`action_values` are sometimes absent or
//! not arrays at all. Records are decoded without ever failing on a single
//! bad field; the aggregator coerces the loose values later.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One campaign's performance row for one day, as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCampaignRecord {
    #[serde(default)]
    pub campaign_name: Value,

    /// Decimal amount, usually a string such as `"12.34"`
    #[serde(default)]
    pub spend: Value,

    #[serde(default)]
    pub impressions: Value,

    #[serde(default)]
    pub clicks: Value,

    /// Action counts by type; `None` when absent or not an array
    #[serde(default, deserialize_with = "lenient_actions")]
    pub actions: Option<Vec<ActionEntry>>,

    /// Action monetary values by type; same shape as `actions`
    #[serde(default, deserialize_with = "lenient_actions")]
    pub action_values: Option<Vec<ActionEntry>>,
}

/// A single `{action_type, value}` pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionEntry {
    #[serde(default)]
    pub action_type: Option<String>,

    /// Numeric-as-text in practice, kept loose
    #[serde(default)]
    pub value: Value,
}

impl ActionEntry {
    pub fn new(action_type: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            action_type: Some(action_type.into()),
            value: value.into(),
        }
    }

    /// Build an entry from an arbitrary JSON value; non-objects are dropped
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            action_type: obj
                .get("action_type")
                .and_then(Value::as_str)
                .map(str::to_string),
            value: obj.get("value").cloned().unwrap_or(Value::Null),
        })
    }
}

impl RawCampaignRecord {
    /// Decode one row; anything that is not an object becomes an empty record
    pub fn from_value(value: Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_default()
    }
}

/// Decode a list of raw rows, never failing on an individual row
pub fn decode_records(rows: Vec<Value>) -> Vec<RawCampaignRecord> {
    rows.into_iter().map(RawCampaignRecord::from_value).collect()
}

/// Decode a saved insights payload: either a bare array or `{"data": [...]}`
pub fn decode_payload(payload: Value) -> Option<Vec<RawCampaignRecord>> {
    match payload {
        Value::Array(rows) => Some(decode_records(rows)),
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(rows)) => Some(decode_records(rows)),
            Some(Value::Null) | None => Some(Vec::new()),
            Some(_) => None,
        },
        _ => None,
    }
}

fn lenient_actions<'de, D>(deserializer: D) -> Result<Option<Vec<ActionEntry>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => Some(items.iter().filter_map(ActionEntry::from_value).collect()),
        _ => None,
    })
}
