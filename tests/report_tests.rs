use chrono::NaiveDate;
use daily_ads_report::aggregator::{aggregate, MetricsResult};
use daily_ads_report::insights::RawCampaignRecord;
use daily_ads_report::report::{PdfRenderer, ReportContext, ReportRenderer};
use serde_json::json;

fn context() -> ReportContext {
    let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    ReportContext {
        date,
        generated_at: NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
    }
}

fn campaigns(count: usize) -> MetricsResult {
    let records: Vec<RawCampaignRecord> = (0..count)
        .map(|i| {
            RawCampaignRecord::from_value(json!({
                "campaign_name": format!("Campaign {:03}", i),
                "spend": "10",
                "impressions": "1000",
                "clicks": "20",
                "actions": [{"action_type": "purchase", "value": "2"}],
                "action_values": [{"action_type": "purchase", "value": format!("{}", 20 + i)}]
            }))
        })
        .collect();
    aggregate(&records)
}

#[test]
fn test_layout_sections_and_summary() {
    let metrics = campaigns(3);
    let layout = PdfRenderer::new().layout(&metrics, &context());

    assert_eq!(layout.page_count(), 1);
    assert!(layout.contains("Daily Marketing Performance Report (2024-05-02 / 9 AM)"));
    assert!(layout.contains("Summary Metrics"));
    assert!(layout.contains("Campaigns with ROAS > 1"));
    assert!(layout.contains("Active Campaigns"));
    assert!(layout.contains("2024-05-01"));
    assert!(layout.contains("Rs 30.00"));
    assert!(layout.contains("Total"));
}

#[test]
fn test_layout_empty_views() {
    let layout = PdfRenderer::new().layout(&MetricsResult::default(), &context());

    assert_eq!(layout.page_count(), 1);
    assert!(layout.contains("No campaigns with ROAS > 1"));
    assert!(layout.contains("No active campaigns"));
    assert!(layout.contains("Rs 0.00"));
    assert!(layout.contains("0.00%"));
    assert!(!layout.contains("Total"));
}

#[test]
fn test_layout_paginates_and_repeats_header() {
    let metrics = campaigns(60);
    let layout = PdfRenderer::new().layout(&metrics, &context());

    assert!(layout.page_count() >= 2);
    assert!(layout.page_contains(0, "Campaign Name"));
    assert!(layout.page_contains(1, "Campaign Name"));
    assert!(layout.contains("Campaign 059"));
    assert!(layout.contains("Total"));
}

#[test]
fn test_layout_uses_currency_prefix() {
    let renderer = PdfRenderer::new().with_currency_prefix("$");
    let layout = renderer.layout(&campaigns(1), &context());

    assert!(layout.contains("$ 10.00"));
    assert!(!layout.contains("Rs 10.00"));
}

#[test]
fn test_layout_truncates_long_names() {
    let records = vec![RawCampaignRecord::from_value(json!({
        "campaign_name": "An extremely long campaign name for testing",
        "spend": "5",
        "impressions": "100"
    }))];
    let metrics = aggregate(&records);
    assert_eq!(metrics.active.len(), 1);

    let layout = PdfRenderer::new().layout(&metrics, &context());

    assert!(layout.contains("An extremely long campaig..."));
    assert!(!layout.contains("An extremely long campaign name for testing"));
}

#[test]
fn test_layout_skips_spend_only_campaigns() {
    let records = vec![RawCampaignRecord::from_value(json!({
        "campaign_name": "Paused",
        "spend": "5"
    }))];
    let layout = PdfRenderer::new().layout(&aggregate(&records), &context());

    assert!(!layout.contains("Paused"));
    assert!(layout.contains("No active campaigns"));
}

#[test]
fn test_rendered_pdf_loads() {
    let metrics = campaigns(60);
    let renderer = PdfRenderer::new();
    let expected_pages = renderer.layout(&metrics, &context()).page_count();

    let bytes = renderer.render(&metrics, &context()).unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), expected_pages);
}
