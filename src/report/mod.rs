//! Report rendering.
//!
//! Turns a [`MetricsResult`] into a paginated PDF:
//! - Summary metrics table
//! - High-ROAS campaigns table
//! - Active campaigns table with a total row

pub mod format;
pub mod pdf;

pub use pdf::{layout_to_pdf, PdfRenderer, ReportLayout};

use crate::aggregator::MetricsResult;
use crate::utils::error::RenderError;
use chrono::{NaiveDate, NaiveDateTime};

/// Date the report covers and the moment it was generated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportContext {
    pub date: NaiveDate,
    pub generated_at: NaiveDateTime,
}

/// Turns metrics into a report artifact
pub trait ReportRenderer: Send + Sync {
    fn render(
        &self,
        metrics: &MetricsResult,
        context: &ReportContext,
    ) -> Result<Vec<u8>, RenderError>;
}
