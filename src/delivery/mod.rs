//! Report delivery.

pub mod smtp;

pub use smtp::SmtpMailer;

use crate::output::report_file_name;
use crate::utils::error::DeliveryError;
use chrono::NaiveDate;
use std::path::PathBuf;

/// A rendered report on disk, ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    pub path: PathBuf,
    pub date: NaiveDate,
}

impl ReportArtifact {
    pub fn subject(&self) -> String {
        format!("Daily Marketing Report - {}", self.date.format("%Y-%m-%d"))
    }

    pub fn body_text(&self) -> String {
        format!(
            "Attached is the daily marketing performance report for {}.",
            self.date.format("%Y-%m-%d")
        )
    }

    /// Attachment name; falls back to the canonical name for odd paths
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| report_file_name(self.date))
    }
}

/// Dispatches a report artifact to its recipients
pub trait DeliveryChannel: Send + Sync {
    fn deliver(&self, artifact: &ReportArtifact) -> Result<(), DeliveryError>;
}

/// Split a comma-separated recipient list, dropping blanks
pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}
