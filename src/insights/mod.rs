//! Insights data source: raw record schema and the Graph API client.

pub mod client;
pub mod schema;
pub mod types;

pub use client::InsightsClient;
pub use schema::{decode_payload, decode_records, ActionEntry, RawCampaignRecord};

use crate::utils::error::ApiError;
use chrono::NaiveDate;

/// Anything that can supply one day's raw campaign rows
pub trait DataSource: Send + Sync {
    fn fetch_records(&self, date: NaiveDate) -> Result<Vec<RawCampaignRecord>, ApiError>;
}

/// Graph API backed source; builds a fresh blocking client per fetch
#[derive(Debug, Clone)]
pub struct GraphInsightsSource {
    pub access_token: String,
    pub account_id: String,
    pub base_url: Option<String>,
}

impl GraphInsightsSource {
    pub fn new(access_token: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            account_id: account_id.into(),
            base_url: None,
        }
    }
}

impl DataSource for GraphInsightsSource {
    fn fetch_records(&self, date: NaiveDate) -> Result<Vec<RawCampaignRecord>, ApiError> {
        let mut client = InsightsClient::new(&self.access_token, &self.account_id)?;
        if let Some(base_url) = &self.base_url {
            client = client.with_base_url(base_url.clone());
        }
        client.fetch_day(date)
    }
}
