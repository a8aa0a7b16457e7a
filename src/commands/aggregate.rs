//! Offline aggregation of a saved insights payload.

use crate::aggregator::{aggregate_with, AggregateOptions, MetricsResult};
use crate::insights::decode_payload;
use crate::output::{metrics_to_string, write_metrics};
use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Aggregate a JSON file holding either a row array or a `{"data": [...]}` page
pub fn aggregate_file(input: &Path, options: &AggregateOptions) -> Result<MetricsResult> {
    let file = File::open(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let payload: serde_json::Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("{} is not valid JSON", input.display()))?;

    let records = decode_payload(payload).with_context(|| {
        format!(
            "{} must hold an array of insights rows or an object with a `data` array",
            input.display()
        )
    })?;

    info!("Aggregating {} records from {}", records.len(), input.display());
    Ok(aggregate_with(&records, options))
}

/// Execute the `aggregate` command: write to `output`, or print to stdout
pub fn execute_aggregate(input: &Path, output: Option<&Path>, options: &AggregateOptions) -> Result<()> {
    let metrics = aggregate_file(input, options)?;
    info!("{}", metrics.summary());

    match output {
        Some(path) => {
            write_metrics(&metrics, path).context("Failed to write metrics JSON")?;
            info!("✓ Metrics written to: {}", path.display());
        }
        None => println!("{}", metrics_to_string(&metrics)?),
    }

    Ok(())
}
