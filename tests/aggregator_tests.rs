use daily_ads_report::aggregator::{aggregate, aggregate_with, AggregateOptions, MetricsResult};
use daily_ads_report::insights::RawCampaignRecord;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn record(value: Value) -> RawCampaignRecord {
    RawCampaignRecord::from_value(value)
}

fn campaign(
    name: &str,
    spend: &str,
    impressions: &str,
    clicks: &str,
    purchases: &str,
    sales: &str,
) -> RawCampaignRecord {
    record(json!({
        "campaign_name": name,
        "spend": spend,
        "impressions": impressions,
        "clicks": clicks,
        "actions": [{"action_type": "purchase", "value": purchases}],
        "action_values": [{"action_type": "purchase", "value": sales}]
    }))
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_empty_input_gives_empty_result() {
    let metrics = aggregate(&[]);
    assert_eq!(metrics, MetricsResult::default());
    assert!(metrics.is_empty());
}

#[test]
fn test_single_profitable_campaign() {
    let metrics = aggregate(&[campaign("X", "100", "1000", "50", "5", "500")]);

    let o = &metrics.overall;
    assert_close(o.total_sales, 500.0);
    assert_close(o.total_ad_spend, 100.0);
    assert_eq!(o.total_impressions, 1000);
    assert_eq!(o.total_clicks, 50);
    assert_eq!(o.total_conversions, 5);
    assert_close(o.overall_roas, 5.0);
    assert_close(o.overall_cpa, 20.0);
    assert_close(o.overall_ctr, 5.0);
    assert_close(o.overall_conversion_rate, 10.0);

    assert_eq!(metrics.campaigns.len(), 1);
    let row = &metrics.campaigns[0];
    assert_eq!(row.campaign_name, "X");
    assert_close(row.spend, 100.0);
    assert_close(row.sales, 500.0);
    assert_eq!(row.impressions, 1000);
    assert_eq!(row.clicks, 50);
    assert_eq!(row.conversions, 5);
    assert_close(row.roas, 5.0);
    assert_close(row.cpa, 20.0);
    assert_close(row.ctr, 5.0);
    assert_close(row.conversion_rate, 10.0);

    let high: Vec<&str> = metrics.high_roas.iter().map(|c| c.campaign_name.as_str()).collect();
    let active: Vec<&str> = metrics.active.iter().map(|c| c.campaign_name.as_str()).collect();
    assert_eq!(high, vec!["X"]);
    assert_eq!(active, vec!["X"]);
}

#[test]
fn test_spend_without_activity() {
    let metrics = aggregate(&[record(json!({
        "campaign_name": "Y",
        "spend": "50",
        "impressions": "0",
        "clicks": "0"
    }))]);

    let row = &metrics.campaigns[0];
    assert_close(row.spend, 50.0);
    assert_eq!(row.impressions, 0);
    assert_eq!(row.clicks, 0);
    assert_eq!(row.conversions, 0);
    assert_eq!(row.roas, 0.0);
    assert_eq!(row.cpa, 0.0);
    assert_eq!(row.ctr, 0.0);
    assert_eq!(row.conversion_rate, 0.0);

    // spend alone is not activity
    assert!(!row.is_active());
    assert!(metrics.high_roas.is_empty());
    assert!(metrics.active.is_empty());
}

#[test]
fn test_rows_sharing_a_name_are_merged() {
    let metrics = aggregate(&[
        campaign("Z", "10", "100", "10", "1", "30"),
        campaign("Z", "20", "200", "20", "2", "60"),
    ]);

    assert_eq!(metrics.campaigns.len(), 1);
    let row = &metrics.campaigns[0];
    assert_close(row.spend, 30.0);
    assert_close(row.sales, 90.0);
    assert_eq!(row.impressions, 300);
    assert_eq!(row.clicks, 30);
    assert_eq!(row.conversions, 3);
    assert_close(row.roas, 3.0);
    assert_close(row.cpa, 10.0);
    assert_close(row.ctr, 10.0);
    assert_close(row.conversion_rate, 10.0);
}

#[test]
fn test_non_purchase_actions_are_ignored() {
    let metrics = aggregate(&[record(json!({
        "campaign_name": "W",
        "spend": "10",
        "actions": [{"action_type": "link_click", "value": "7"}],
        "action_values": [{"action_type": "link_click", "value": "70"}]
    }))]);

    assert_eq!(metrics.overall.total_conversions, 0);
    assert_eq!(metrics.overall.total_sales, 0.0);
}

#[test]
fn test_malformed_values_do_not_abort() {
    let metrics = aggregate(&[
        record(json!({
            "campaign_name": "Broken",
            "spend": "abc",
            "impressions": null,
            "clicks": [1, 2],
            "actions": "not-a-list",
            "action_values": [{"action_type": "purchase", "value": "-5"}]
        })),
        campaign("Fine", "10", "100", "1", "1", "20"),
    ]);

    assert_eq!(metrics.campaigns.len(), 2);
    let broken = metrics
        .campaigns
        .iter()
        .find(|c| c.campaign_name == "Broken")
        .unwrap();
    assert_eq!(broken.spend, 0.0);
    assert_eq!(broken.sales, 0.0);
    assert_eq!(broken.impressions, 0);
    assert_eq!(broken.clicks, 0);
    assert!(!broken.is_active());
    assert_close(metrics.overall.total_ad_spend, 10.0);
}

#[test]
fn test_zero_denominators_never_produce_nan() {
    let metrics = aggregate(&[
        record(json!({"campaign_name": "A"})),
        record(json!({"campaign_name": "B", "clicks": "3"})),
        record(json!({"campaign_name": "C", "actions": [{"action_type": "purchase", "value": "2"}]})),
    ]);

    let o = &metrics.overall;
    for value in [o.overall_roas, o.overall_cpa, o.overall_ctr, o.overall_conversion_rate] {
        assert!(value.is_finite());
    }
    for row in &metrics.campaigns {
        for value in [row.roas, row.cpa, row.ctr, row.conversion_rate] {
            assert!(value.is_finite(), "{} has a non-finite ratio", row.campaign_name);
        }
    }
}

#[test]
fn test_totals_match_campaign_sums() {
    let metrics = aggregate(&[
        campaign("A", "12.5", "400", "20", "2", "40"),
        campaign("B", "7.5", "100", "5", "0", "0"),
        campaign("C", "30", "900", "45", "3", "150"),
        campaign("A", "10", "100", "5", "1", "15"),
    ]);

    let spend: f64 = metrics.campaigns.iter().map(|c| c.spend).sum();
    let sales: f64 = metrics.campaigns.iter().map(|c| c.sales).sum();
    let impressions: u64 = metrics.campaigns.iter().map(|c| c.impressions).sum();
    assert_close(metrics.overall.total_ad_spend, spend);
    assert_close(metrics.overall.total_sales, sales);
    assert_eq!(metrics.overall.total_impressions, impressions);
    assert_eq!(metrics.campaigns.len(), 3);
}

#[test]
fn test_views_follow_their_predicates() {
    let metrics = aggregate(&[
        campaign("Loss", "100", "1000", "10", "1", "50"),
        campaign("Win", "10", "100", "10", "1", "40"),
        campaign("Even", "20", "100", "10", "1", "20"),
        record(json!({"campaign_name": "Idle"})),
        record(json!({"campaign_name": "Seen", "impressions": "10"})),
    ]);

    let high: Vec<&str> = metrics.high_roas.iter().map(|c| c.campaign_name.as_str()).collect();
    assert_eq!(high, vec!["Win"]);
    assert!(metrics.high_roas.iter().all(|c| c.roas > 1.0));

    let active: Vec<&str> = metrics.active.iter().map(|c| c.campaign_name.as_str()).collect();
    assert_eq!(active, vec!["Win", "Even", "Loss", "Seen"]);
    assert!(!active.contains(&"Idle"));
    assert!(metrics
        .active
        .windows(2)
        .all(|pair| pair[0].roas >= pair[1].roas));
    assert!(metrics.active.iter().all(|c| c.is_active()));
}

#[test]
fn test_campaign_table_is_ordered_by_name() {
    let metrics = aggregate(&[
        campaign("charlie", "1", "1", "1", "0", "0"),
        campaign("alpha", "1", "1", "1", "0", "0"),
        campaign("bravo", "1", "1", "1", "0", "0"),
    ]);

    let names: Vec<&str> = metrics.campaigns.iter().map(|c| c.campaign_name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "bravo", "charlie"]);
}

#[test]
fn test_custom_threshold() {
    let records = [
        campaign("A", "10", "100", "10", "1", "25"),
        campaign("B", "10", "100", "10", "1", "35"),
    ];
    let metrics = aggregate_with(&records, &AggregateOptions { high_roas_threshold: 3.0 });

    assert_eq!(metrics.high_roas.len(), 1);
    assert_eq!(metrics.high_roas[0].campaign_name, "B");
}

#[test]
fn test_aggregate_is_idempotent() {
    let records = vec![
        campaign("A", "12.5", "400", "20", "2", "40"),
        campaign("B", "7.5", "100", "5", "0", "0"),
    ];
    assert_eq!(aggregate(&records), aggregate(&records));
}
