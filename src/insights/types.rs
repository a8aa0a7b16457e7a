//! Response types for the Graph API insights edge.

use super::schema::{decode_records, RawCampaignRecord};
use crate::utils::error::ApiError;
use serde::Deserialize;
use serde_json::Value;

/// Graph API error envelope: `{"error": {"message", "type", "code"}}`
#[derive(Debug, Deserialize)]
pub struct GraphErrorEnvelope {
    pub error: GraphErrorBody,
}

#[derive(Debug, Default, Deserialize)]
pub struct GraphErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub code: i64,
}

impl From<GraphErrorBody> for ApiError {
    fn from(body: GraphErrorBody) -> Self {
        ApiError::Graph {
            code: body.code,
            kind: body.kind,
            message: body.message,
        }
    }
}

/// One decoded page of insights
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightsPage {
    pub records: Vec<RawCampaignRecord>,

    /// Absolute URL of the next page, if any
    pub next: Option<String>,
}

/// Decode a successful response body into a page
///
/// A missing or null `data` is an empty day. A `data` that is not an array
/// means the payload itself is broken.
pub fn parse_page(body: Value) -> Result<InsightsPage, ApiError> {
    let Value::Object(mut obj) = body else {
        return Err(ApiError::InvalidResponse(
            "Response body is not a JSON object".to_string(),
        ));
    };

    if let Some(error) = obj.remove("error") {
        let body: GraphErrorBody = serde_json::from_value(error).unwrap_or_default();
        return Err(body.into());
    }

    let records = match obj.remove("data") {
        Some(Value::Array(rows)) => decode_records(rows),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            return Err(ApiError::InvalidResponse(format!(
                "Expected `data` array, found {}",
                json_type_name(&other)
            )))
        }
    };

    let next = obj
        .get("paging")
        .and_then(|paging| paging.get("next"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(InsightsPage { records, next })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_page_with_next() {
        let page = parse_page(json!({
            "data": [{"campaign_name": "A", "spend": "1"}],
            "paging": {"cursors": {"after": "x"}, "next": "https://example.test/next"}
        }))
        .unwrap();

        assert_eq!(page.records.len(), 1);
        assert_eq!(page.next.as_deref(), Some("https://example.test/next"));
    }

    #[test]
    fn test_parse_page_missing_data_is_empty() {
        let page = parse_page(json!({})).unwrap();
        assert!(page.records.is_empty());
        assert!(page.next.is_none());
    }

    #[test]
    fn test_parse_page_graph_error() {
        let err = parse_page(json!({
            "error": {"message": "Invalid OAuth access token.", "type": "OAuthException", "code": 190}
        }))
        .unwrap_err();

        match err {
            ApiError::Graph { code, kind, .. } => {
                assert_eq!(code, 190);
                assert_eq!(kind, "OAuthException");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_page_rejects_bad_shapes() {
        assert!(matches!(
            parse_page(json!([])),
            Err(ApiError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_page(json!({"data": 5})),
            Err(ApiError::InvalidResponse(_))
        ));
    }
}
