//! Configuration and constants for the report service.

use std::time::Duration;

/// Default timeout for Graph API requests
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(30);

/// Graph API base URL and version used for insights queries
pub const GRAPH_API_BASE: &str = "https://graph.facebook.com";
pub const GRAPH_API_VERSION: &str = "v20.0";

/// Fields requested from the insights edge, in the order the API documents them
pub const INSIGHTS_FIELDS: &str = "campaign_name,spend,impressions,clicks,actions,action_values";

/// Page size for insights requests
pub const INSIGHTS_PAGE_LIMIT: u32 = 100;

/// Upper bound on `paging.next` links followed for a single day
pub const MAX_INSIGHTS_PAGES: usize = 50;

/// Action type counted as a conversion (and valued as a sale)
pub const PURCHASE_ACTION_TYPE: &str = "purchase";

/// Campaigns above this ROAS are listed in the high-ROAS view
pub const DEFAULT_HIGH_ROAS_THRESHOLD: f64 = 1.0;

pub const DEFAULT_CURRENCY_PREFIX: &str = "Rs";

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

pub const DEFAULT_HTTP_PORT: u16 = 10000;

// US letter in points
pub const PAGE_WIDTH: i64 = 612;
pub const PAGE_HEIGHT: i64 = 792;
pub const PAGE_MARGIN: i64 = 50;
pub const ROW_HEIGHT: i64 = 20;

/// Campaign names longer than this are cut in report tables
pub const MAX_CAMPAIGN_NAME_CHARS: usize = 25;
