//! JSON metrics output writer.
//!
//! Writes MetricsResult structs to JSON files with proper formatting.

use super::{ensure_parent_dir, validate_output_path};
use crate::aggregator::MetricsResult;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write metrics to a pretty-printed JSON file
///
/// **Public** - used by the `aggregate` command
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_metrics(metrics: &MetricsResult, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing metrics to: {}", output_path.display());

    validate_output_path(output_path)?;
    ensure_parent_dir(output_path)?;

    let file = File::create(output_path)
        .map_err(OutputError::WriteFailed)?;

    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, metrics)
        .map_err(OutputError::SerializationFailed)?;

    writer.flush()
        .map_err(OutputError::WriteFailed)?;

    info!("Metrics written successfully ({} bytes)",
          calculate_file_size(output_path));

    Ok(())
}

/// Metrics as a pretty JSON string (stdout output)
pub fn metrics_to_string(metrics: &MetricsResult) -> Result<String, OutputError> {
    serde_json::to_string_pretty(metrics)
        .map_err(OutputError::SerializationFailed)
}

/// Read metrics back from a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_metrics(input_path: impl AsRef<Path>) -> Result<MetricsResult, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading metrics from: {}", input_path.display());

    let file = File::open(input_path)
        .map_err(OutputError::WriteFailed)?;

    let metrics: MetricsResult = serde_json::from_reader(file)
        .map_err(OutputError::SerializationFailed)?;

    debug!("Metrics loaded: {} campaigns", metrics.campaigns.len());

    Ok(metrics)
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path)
        .map(|m| m.len())
        .unwrap_or(0)
}
