//! Daily Ads Report CLI
//!
//! Generates the daily marketing performance report, either once from the
//! command line or on demand over HTTP.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::info;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use daily_ads_report::aggregator::AggregateOptions;
use daily_ads_report::commands::{
    build_pipeline, display_version, execute_aggregate, execute_generate, serve, ReportSettings,
};
use daily_ads_report::delivery::parse_recipients;
use daily_ads_report::utils::config::{
    DEFAULT_CURRENCY_PREFIX, DEFAULT_HIGH_ROAS_THRESHOLD, DEFAULT_HTTP_PORT, DEFAULT_SMTP_HOST,
    DEFAULT_SMTP_PORT,
};

/// Daily Ads Report - Meta ads performance reporting
#[derive(Parser, Debug)]
#[command(name = "daily-ads-report")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the report trigger and health endpoints
    Serve {
        #[command(flatten)]
        report: ReportOpts,

        /// Port to listen on
        #[arg(long, env = "PORT", default_value_t = DEFAULT_HTTP_PORT)]
        port: u16,

        /// Deployment environment; `production` listens on all interfaces
        #[arg(long = "env", env = "ENV", default_value = "development")]
        environment: String,
    },

    /// Generate (and email) the report once
    Generate {
        #[command(flatten)]
        report: ReportOpts,

        /// Write the PDF but do not send it
        #[arg(long)]
        no_email: bool,
    },

    /// Aggregate a saved insights JSON payload
    Aggregate {
        /// JSON file: an array of insights rows or a `{"data": [...]}` page
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for metrics JSON (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Campaigns above this ROAS are listed as high ROAS
        #[arg(long, default_value_t = DEFAULT_HIGH_ROAS_THRESHOLD)]
        high_roas_threshold: f64,
    },

    /// Display version information
    Version,
}

/// Settings shared by `serve` and `generate`
#[derive(Args, Debug)]
struct ReportOpts {
    /// Graph API access token
    #[arg(long, env = "META_API_KEY", hide_env_values = true)]
    access_token: Option<String>,

    /// Ad account id (with or without `act_`)
    #[arg(long, env = "META_AD_ACCOUNT_ID")]
    account_id: Option<String>,

    /// Report day (YYYY-MM-DD); defaults to yesterday
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Sender address, also the SMTP login
    #[arg(long, env = "EMAIL_SENDER")]
    email_sender: Option<String>,

    /// Comma-separated recipient addresses
    #[arg(long, env = "EMAIL_RECIPIENTS", default_value = "")]
    email_recipients: String,

    #[arg(long, env = "EMAIL_PASSWORD", hide_env_values = true)]
    email_password: Option<String>,

    #[arg(long, env = "SMTP_HOST", default_value = DEFAULT_SMTP_HOST)]
    smtp_host: String,

    #[arg(long, env = "SMTP_PORT", default_value_t = DEFAULT_SMTP_PORT)]
    smtp_port: u16,

    /// Directory the PDF report is written to
    #[arg(long, env = "REPORT_DIR", default_value = ".")]
    report_dir: PathBuf,

    /// Prefix for currency amounts in the report
    #[arg(long, env = "CURRENCY_PREFIX", default_value = DEFAULT_CURRENCY_PREFIX)]
    currency_prefix: String,

    /// Campaigns above this ROAS are listed as high ROAS
    #[arg(long, default_value_t = DEFAULT_HIGH_ROAS_THRESHOLD)]
    high_roas_threshold: f64,
}

impl ReportOpts {
    fn into_settings(self, send_email: bool) -> ReportSettings {
        ReportSettings {
            access_token: self.access_token,
            account_id: self.account_id,
            email_sender: self.email_sender,
            email_recipients: parse_recipients(&self.email_recipients),
            email_password: self.email_password,
            smtp_host: self.smtp_host,
            smtp_port: self.smtp_port,
            report_dir: self.report_dir,
            currency_prefix: self.currency_prefix,
            high_roas_threshold: self.high_roas_threshold,
            date: self.date,
            send_email,
        }
    }
}

fn main() -> Result<()> {
    // .env is optional; real environment variables win
    dotenv::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Serve {
            report,
            port,
            environment,
        } => {
            let settings = report.into_settings(true);
            let pipeline = build_pipeline(&settings).context("Invalid configuration")?;

            let host = if environment == "production" {
                IpAddr::V4(Ipv4Addr::UNSPECIFIED)
            } else {
                IpAddr::V4(Ipv4Addr::LOCALHOST)
            };
            let addr = SocketAddr::new(host, port);
            info!("Starting report service ({})", environment);

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("Failed to start async runtime")?;
            runtime.block_on(serve(addr, Arc::new(pipeline)))?;
        }

        Commands::Generate { report, no_email } => {
            let settings = report.into_settings(!no_email);
            let outcome = execute_generate(&settings)?;
            println!("Report: {}", outcome.report_file.display());
            println!("Campaigns: {}", outcome.campaign_count);
            println!("Emailed: {}", if outcome.emailed { "yes" } else { "no" });
        }

        Commands::Aggregate {
            input,
            output,
            high_roas_threshold,
        } => {
            let options = AggregateOptions {
                high_roas_threshold,
            };
            execute_aggregate(&input, output.as_deref(), &options)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
