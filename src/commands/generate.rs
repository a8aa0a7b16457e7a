//! Report generation pipeline.
//!
//! The pipeline:
//! 1. Fetches the day's insights rows
//! 2. Aggregates them into campaign metrics
//! 3. Renders the PDF report
//! 4. Writes the report file
//! 5. Emails it (unless delivery is disabled)

use super::models::{validate_settings, ReportSettings};
use crate::aggregator::{aggregate_with, AggregateOptions};
use crate::delivery::{DeliveryChannel, ReportArtifact, SmtpMailer};
use crate::insights::{DataSource, GraphInsightsSource};
use crate::output::{report_path, write_report};
use crate::report::{PdfRenderer, ReportContext, ReportRenderer};
use crate::utils::error::ConfigError;
use anyhow::{Context, Result};
use chrono::{Days, Local, NaiveDate};
use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;

/// What a successful run produced
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutcome {
    pub report_file: PathBuf,
    pub date: NaiveDate,
    pub campaign_count: usize,
    pub emailed: bool,
}

/// A runnable report job, as driven by the HTTP surface
pub trait ReportJob: Send + Sync {
    fn run(&self) -> Result<ReportOutcome>;
}

/// Fetch → aggregate → render → write → deliver
pub struct ReportPipeline<S, R, D> {
    source: S,
    renderer: R,
    delivery: Option<D>,
    report_dir: PathBuf,
    options: AggregateOptions,
    date: Option<NaiveDate>,
}

/// The production pipeline type
pub type DefaultPipeline = ReportPipeline<GraphInsightsSource, PdfRenderer, SmtpMailer>;

impl<S, R, D> ReportPipeline<S, R, D>
where
    S: DataSource,
    R: ReportRenderer,
    D: DeliveryChannel,
{
    pub fn new(source: S, renderer: R, delivery: Option<D>, report_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            renderer,
            delivery,
            report_dir: report_dir.into(),
            options: AggregateOptions::default(),
            date: None,
        }
    }

    pub fn with_options(mut self, options: AggregateOptions) -> Self {
        self.options = options;
        self
    }

    /// Pin the report day instead of using yesterday
    pub fn with_date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }

    /// The day this run reports on
    pub fn report_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(yesterday)
    }

    /// Run the pipeline once
    ///
    /// **Public** - used by the `generate` command and the HTTP surface
    ///
    /// # Errors
    /// * Insights fetch failures
    /// * PDF rendering or file write failures
    /// * Email delivery failures
    pub fn execute(&self) -> Result<ReportOutcome> {
        let start_time = Instant::now();
        let date = self.report_date();
        let context = ReportContext {
            date,
            generated_at: Local::now().naive_local(),
        };

        info!("Report generation started for {}", date);

        info!("Step 1/5: Fetching insights...");
        let records = self
            .source
            .fetch_records(date)
            .context("Failed to fetch insights")?;

        info!("Step 2/5: Aggregating {} records...", records.len());
        let metrics = aggregate_with(&records, &self.options);
        info!("Metrics: {}", metrics.summary());

        info!("Step 3/5: Rendering PDF report...");
        let pdf = self
            .renderer
            .render(&metrics, &context)
            .context("Failed to render PDF report")?;

        info!("Step 4/5: Writing report file...");
        let report_file = report_path(&self.report_dir, date);
        write_report(&pdf, &report_file)
            .with_context(|| format!("Failed to write report to {}", report_file.display()))?;
        info!("✓ PDF report saved to: {}", report_file.display());

        let emailed = match &self.delivery {
            Some(channel) => {
                info!("Step 5/5: Sending report by email...");
                let artifact = ReportArtifact {
                    path: report_file.clone(),
                    date,
                };
                channel.deliver(&artifact).context("Failed to send report email")?;
                true
            }
            None => {
                info!("Step 5/5: Skipping email delivery (disabled)");
                false
            }
        };

        let elapsed = start_time.elapsed();
        info!("Report generation completed in {:.2}s", elapsed.as_secs_f64());

        Ok(ReportOutcome {
            report_file,
            date,
            campaign_count: metrics.campaigns.len(),
            emailed,
        })
    }
}

impl<S, R, D> ReportJob for ReportPipeline<S, R, D>
where
    S: DataSource,
    R: ReportRenderer,
    D: DeliveryChannel,
{
    fn run(&self) -> Result<ReportOutcome> {
        self.execute()
    }
}

/// Build the production pipeline from settings
///
/// **Public** - validates settings first
pub fn build_pipeline(settings: &ReportSettings) -> Result<DefaultPipeline, ConfigError> {
    let credentials = validate_settings(settings)?;

    let source = GraphInsightsSource::new(credentials.access_token, credentials.account_id);

    let renderer = PdfRenderer::new()
        .with_currency_prefix(settings.currency_prefix.clone())
        .with_high_roas_threshold(settings.high_roas_threshold);

    let delivery = if settings.send_email {
        let mailer = SmtpMailer::new(
            settings.email_sender.clone().unwrap_or_default(),
            settings.email_recipients.clone(),
        )
        .with_server(settings.smtp_host.clone(), settings.smtp_port)
        .with_password(settings.email_password.clone());
        Some(mailer)
    } else {
        None
    };

    debug!(
        "Pipeline configured: report_dir={}, email={}",
        settings.report_dir.display(),
        settings.send_email
    );

    Ok(ReportPipeline::new(source, renderer, delivery, settings.report_dir.clone())
        .with_options(AggregateOptions {
            high_roas_threshold: settings.high_roas_threshold,
        })
        .with_date(settings.date))
}

/// Execute the `generate` command
pub fn execute_generate(settings: &ReportSettings) -> Result<ReportOutcome> {
    let pipeline = build_pipeline(settings).context("Invalid configuration")?;
    pipeline.execute()
}

/// Yesterday in local time
pub fn yesterday() -> NaiveDate {
    let today = Local::now().date_naive();
    today.checked_sub_days(Days::new(1)).unwrap_or(today)
}
