//! Daily Ads Report
//!
//! Fetches one day of Meta ads campaign insights, aggregates them into
//! ROAS, CPA, CTR and conversion-rate metrics, renders a paginated PDF
//! report and emails it.
//!
//! The aggregation core is pure and usable on its own:
//!
//! ```
//! use daily_ads_report::aggregator::aggregate;
//! use daily_ads_report::insights::RawCampaignRecord;
//!
//! let record = RawCampaignRecord::from_value(serde_json::json!({
//!     "campaign_name": "X",
//!     "spend": "100",
//!     "impressions": "1000",
//!     "clicks": "50",
//!     "actions": [{"action_type": "purchase", "value": "5"}],
//!     "action_values": [{"action_type": "purchase", "value": "500"}]
//! }));
//!
//! let metrics = aggregate(&[record]);
//! assert_eq!(metrics.campaigns[0].roas, 5.0);
//! ```

pub mod aggregator;
pub mod commands;
pub mod delivery;
pub mod insights;
pub mod output;
pub mod report;
pub mod utils;
