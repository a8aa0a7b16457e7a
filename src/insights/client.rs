//! HTTP client for the Graph API ad account insights edge.

use super::schema::RawCampaignRecord;
use super::types::{parse_page, GraphErrorEnvelope, InsightsPage};
use crate::utils::config::{
    DEFAULT_API_TIMEOUT, GRAPH_API_BASE, GRAPH_API_VERSION, INSIGHTS_FIELDS, INSIGHTS_PAGE_LIMIT,
    MAX_INSIGHTS_PAGES,
};
use crate::utils::error::ApiError;
use chrono::NaiveDate;
use log::{debug, info, warn};
use reqwest::blocking::{Client, Response};

/// Insights client for a single ad account
pub struct InsightsClient {
    client: Client,
    base_url: String,
    access_token: String,
    account_id: String,
}

impl InsightsClient {
    /// Create a new insights client
    pub fn new(
        access_token: impl Into<String>,
        account_id: impl AsRef<str>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(DEFAULT_API_TIMEOUT)
            .build()
            .map_err(ApiError::RequestFailed)?;

        Ok(Self {
            client,
            base_url: GRAPH_API_BASE.to_string(),
            access_token: access_token.into(),
            account_id: normalize_account_id(account_id.as_ref()),
        })
    }

    /// Point the client at a different host (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn insights_url(&self) -> String {
        format!(
            "{}/{}/act_{}/insights",
            self.base_url, GRAPH_API_VERSION, self.account_id
        )
    }

    /// Fetch every campaign-level row for one day, following pagination
    pub fn fetch_day(&self, date: NaiveDate) -> Result<Vec<RawCampaignRecord>, ApiError> {
        info!("Fetching insights for act_{} on {}", self.account_id, date);

        let time_range = time_range_param(date);
        let limit = INSIGHTS_PAGE_LIMIT.to_string();
        let request = self.client.get(self.insights_url()).query(&[
            ("access_token", self.access_token.as_str()),
            ("fields", INSIGHTS_FIELDS),
            ("time_range", time_range.as_str()),
            ("level", "campaign"),
            ("limit", limit.as_str()),
        ]);

        let mut page = read_page(request.send().map_err(ApiError::RequestFailed)?)?;
        let mut records = std::mem::take(&mut page.records);
        let mut pages = 1;

        while let Some(next) = page.next.take() {
            if pages >= MAX_INSIGHTS_PAGES {
                warn!(
                    "Stopped after {} insights pages; remaining rows were not fetched",
                    pages
                );
                break;
            }
            debug!("Following insights page {}", pages + 1);
            page = read_page(self.client.get(&next).send().map_err(ApiError::RequestFailed)?)?;
            records.append(&mut page.records);
            pages += 1;
        }

        if records.is_empty() {
            warn!("No data returned from API for {}", date);
        } else {
            info!("Fetched {} insights rows in {} page(s)", records.len(), pages);
        }

        Ok(records)
    }
}

/// Check status and decode one page
fn read_page(response: Response) -> Result<InsightsPage, ApiError> {
    let status = response.status();
    let body = response.text().map_err(ApiError::RequestFailed)?;

    if !status.is_success() {
        if let Ok(envelope) = serde_json::from_str::<GraphErrorEnvelope>(&body) {
            return Err(envelope.error.into());
        }
        return Err(ApiError::HttpStatus {
            status: status.as_u16(),
            body,
        });
    }

    let value: serde_json::Value = serde_json::from_str(&body)
        .map_err(|e| ApiError::InvalidResponse(format!("Body is not JSON: {}", e)))?;
    parse_page(value)
}

/// `{"since":"YYYY-MM-DD","until":"YYYY-MM-DD"}` for a single day
fn time_range_param(date: NaiveDate) -> String {
    let day = date.format("%Y-%m-%d").to_string();
    serde_json::json!({ "since": day, "until": day }).to_string()
}

/// Strip an `act_` prefix so the URL never carries it twice
fn normalize_account_id(account_id: &str) -> String {
    let trimmed = account_id.trim();
    trimmed.strip_prefix("act_").unwrap_or(trimmed).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_account_id() {
        assert_eq!(normalize_account_id("12345"), "12345");
        assert_eq!(normalize_account_id("act_12345"), "12345");
        assert_eq!(normalize_account_id(" 99 "), "99");
    }

    #[test]
    fn test_time_range_param() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            time_range_param(date),
            r#"{"since":"2024-03-09","until":"2024-03-09"}"#
        );
    }

    #[test]
    fn test_insights_url() {
        let client = InsightsClient::new("token", "act_42")
            .unwrap()
            .with_base_url("http://localhost:9000/");
        assert_eq!(
            client.insights_url(),
            "http://localhost:9000/v20.0/act_42/insights"
        );
    }
}
