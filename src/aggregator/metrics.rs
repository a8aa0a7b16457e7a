//! Aggregate raw campaign records into per-campaign and overall KPIs.
//!
//! Ratios use a zero-denominator policy throughout: when the denominator is
//! zero the ratio is defined as 0, never infinity or NaN.

use super::extract::{extract_record, ExtractedRecord};
use crate::insights::schema::RawCampaignRecord;
use crate::utils::config::DEFAULT_HIGH_ROAS_THRESHOLD;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tunables for [`aggregate_with`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateOptions {
    /// Campaigns with ROAS strictly above this value form the high-ROAS view
    pub high_roas_threshold: f64,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            high_roas_threshold: DEFAULT_HIGH_ROAS_THRESHOLD,
        }
    }
}

/// Summed metrics and derived ratios for one campaign
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignMetrics {
    pub campaign_name: String,
    pub spend: f64,
    pub sales: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub roas: f64,
    pub cpa: f64,
    /// Percentage
    pub ctr: f64,
    /// Percentage
    pub conversion_rate: f64,
}

impl CampaignMetrics {
    /// A campaign is active if it registered any delivery or outcome
    pub fn is_active(&self) -> bool {
        self.impressions > 0 || self.clicks > 0 || self.conversions > 0
    }
}

/// Grand totals across all records plus the same ratios at account level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallMetrics {
    pub total_sales: f64,
    pub total_ad_spend: f64,
    pub total_impressions: u64,
    pub total_clicks: u64,
    pub total_conversions: u64,
    pub overall_roas: f64,
    pub overall_cpa: f64,
    pub overall_ctr: f64,
    pub overall_conversion_rate: f64,
}

/// Everything the report renderer consumes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsResult {
    pub overall: OverallMetrics,

    /// One row per unique campaign name, ordered by name
    pub campaigns: Vec<CampaignMetrics>,

    /// Campaigns above the ROAS threshold, in table order
    pub high_roas: Vec<CampaignMetrics>,

    /// Active campaigns, ROAS descending; ties keep table order
    pub active: Vec<CampaignMetrics>,
}

impl MetricsResult {
    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "Campaigns: {} | Spend: {:.2} | Sales: {:.2} | ROAS: {:.2} | High ROAS: {} | Active: {}",
            self.campaigns.len(),
            self.overall.total_ad_spend,
            self.overall.total_sales,
            self.overall.overall_roas,
            self.high_roas.len(),
            self.active.len()
        )
    }
}

/// Running sums for a group of records
#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    spend: f64,
    sales: f64,
    impressions: u64,
    clicks: u64,
    conversions: u64,
}

impl Totals {
    fn add(&mut self, record: &ExtractedRecord) {
        self.spend += record.spend;
        self.sales += record.sales;
        self.impressions = self.impressions.saturating_add(record.impressions);
        self.clicks = self.clicks.saturating_add(record.clicks);
        self.conversions = self.conversions.saturating_add(record.conversions);
    }
}

/// ROAS, CPA, CTR and conversion rate derived from a set of totals
#[derive(Debug, Clone, Copy, PartialEq)]
struct Ratios {
    roas: f64,
    cpa: f64,
    ctr: f64,
    conversion_rate: f64,
}

impl From<&Totals> for Ratios {
    fn from(t: &Totals) -> Self {
        Self {
            roas: safe_ratio(t.sales, t.spend),
            cpa: safe_ratio(t.spend, t.conversions as f64),
            ctr: safe_percentage(t.clicks as f64, t.impressions as f64),
            conversion_rate: safe_percentage(t.conversions as f64, t.clicks as f64),
        }
    }
}

/// Aggregate with default options
///
/// **Public** - main entry point for metrics calculation
pub fn aggregate(records: &[RawCampaignRecord]) -> MetricsResult {
    aggregate_with(records, &AggregateOptions::default())
}

/// Aggregate raw records into a [`MetricsResult`]
///
/// Total over its input: bad fields degrade to zero and an empty slice
/// yields an all-zero result with empty tables.
pub fn aggregate_with(records: &[RawCampaignRecord], options: &AggregateOptions) -> MetricsResult {
    if records.is_empty() {
        debug!("No records to aggregate");
        return MetricsResult::default();
    }

    let extracted: Vec<ExtractedRecord> = records.iter().map(extract_record).collect();

    let overall = compute_overall(&extracted);
    let campaigns = group_campaigns(&extracted);
    let high_roas = high_roas_view(&campaigns, options.high_roas_threshold);
    let active = active_view(&campaigns);

    debug!(
        "Aggregated {} records into {} campaigns ({} high ROAS, {} active)",
        records.len(),
        campaigns.len(),
        high_roas.len(),
        active.len()
    );

    MetricsResult {
        overall,
        campaigns,
        high_roas,
        active,
    }
}

/// Sum every record, independently of grouping
fn compute_overall(records: &[ExtractedRecord]) -> OverallMetrics {
    let mut totals = Totals::default();
    for record in records {
        totals.add(record);
    }
    let ratios = Ratios::from(&totals);

    OverallMetrics {
        total_sales: totals.sales,
        total_ad_spend: totals.spend,
        total_impressions: totals.impressions,
        total_clicks: totals.clicks,
        total_conversions: totals.conversions,
        overall_roas: ratios.roas,
        overall_cpa: ratios.cpa,
        overall_ctr: ratios.ctr,
        overall_conversion_rate: ratios.conversion_rate,
    }
}

/// Group by exact campaign name; the map keeps the table ordered by name
fn group_campaigns(records: &[ExtractedRecord]) -> Vec<CampaignMetrics> {
    let mut groups: BTreeMap<&str, Totals> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.campaign_name.as_str())
            .or_default()
            .add(record);
    }

    groups
        .into_iter()
        .map(|(name, totals)| campaign_metrics(name, &totals))
        .collect()
}

fn campaign_metrics(name: &str, totals: &Totals) -> CampaignMetrics {
    let ratios = Ratios::from(totals);
    CampaignMetrics {
        campaign_name: name.to_string(),
        spend: totals.spend,
        sales: totals.sales,
        impressions: totals.impressions,
        clicks: totals.clicks,
        conversions: totals.conversions,
        roas: ratios.roas,
        cpa: ratios.cpa,
        ctr: ratios.ctr,
        conversion_rate: ratios.conversion_rate,
    }
}

fn high_roas_view(campaigns: &[CampaignMetrics], threshold: f64) -> Vec<CampaignMetrics> {
    campaigns
        .iter()
        .filter(|c| c.roas > threshold)
        .cloned()
        .collect()
}

fn active_view(campaigns: &[CampaignMetrics]) -> Vec<CampaignMetrics> {
    let mut active: Vec<CampaignMetrics> = campaigns
        .iter()
        .filter(|c| c.is_active())
        .cloned()
        .collect();
    // stable: equal ROAS keeps name order
    active.sort_by(|a, b| b.roas.total_cmp(&a.roas));
    active
}

/// `numerator / denominator`, or 0 when the denominator is zero
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        let ratio = numerator / denominator;
        if ratio.is_finite() {
            return ratio;
        }
    }
    0.0
}

/// `numerator / denominator * 100`, or 0 when the denominator is zero
pub fn safe_percentage(numerator: f64, denominator: f64) -> f64 {
    safe_ratio(numerator, denominator) * 100.0
}

/// Spend and sales summed over a view, for report total rows
pub fn view_totals(rows: &[CampaignMetrics]) -> (f64, f64) {
    rows.iter()
        .fold((0.0, 0.0), |(spend, sales), row| (spend + row.spend, sales + row.sales))
}
