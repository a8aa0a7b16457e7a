//! Aggregation of raw insights records into campaign metrics.
//!
//! This module transforms the day's raw records into:
//! - Per-campaign totals and ratios (ROAS, CPA, CTR, conversion rate)
//! - Account-level totals and ratios
//! - The high-ROAS and active-campaign report views

pub mod extract;
pub mod metrics;

// Re-export main types and functions
pub use extract::{extract_first_purchase_value, extract_record, ExtractedRecord};
pub use metrics::{
    aggregate, aggregate_with, safe_percentage, safe_ratio, view_totals, AggregateOptions,
    CampaignMetrics, MetricsResult, OverallMetrics,
};
