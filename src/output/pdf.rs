//! PDF report file writer.

use super::{ensure_parent_dir, validate_output_path};
use crate::utils::error::OutputError;
use chrono::NaiveDate;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// `report_YYYY-MM-DD.pdf`
pub fn report_file_name(date: NaiveDate) -> String {
    format!("report_{}.pdf", date.format("%Y-%m-%d"))
}

/// Full path of the day's report inside `report_dir`
pub fn report_path(report_dir: impl AsRef<Path>, date: NaiveDate) -> PathBuf {
    report_dir.as_ref().join(report_file_name(date))
}

/// Write rendered report bytes to a file
///
/// **Public** - main entry point for report output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is empty or a directory
pub fn write_report(content: &[u8], output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    validate_output_path(output_path)?;
    if output_path.extension().is_some_and(|ext| ext != "pdf") {
        debug!("Warning: File does not have .pdf extension: {}", output_path.display());
    }
    ensure_parent_dir(output_path)?;

    let file = File::create(output_path)
        .map_err(OutputError::WriteFailed)?;

    let mut writer = BufWriter::new(file);

    writer.write_all(content)
        .map_err(OutputError::WriteFailed)?;

    writer.flush()
        .map_err(OutputError::WriteFailed)?;

    info!("Report written successfully ({} bytes, {:.2} KB)",
          content.len(),
          content.len() as f64 / 1024.0);

    Ok(())
}
