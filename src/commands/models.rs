use crate::utils::config::{
    DEFAULT_CURRENCY_PREFIX, DEFAULT_HIGH_ROAS_THRESHOLD, DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT,
};
use crate::utils::error::ConfigError;
use chrono::NaiveDate;
use std::path::PathBuf;

/// Runtime settings for the report pipeline
///
/// **Public** - used by main.rs to construct from CLI args / environment
#[derive(Debug, Clone)]
pub struct ReportSettings {
    /// Graph API access token
    pub access_token: Option<String>,

    /// Ad account id, with or without the `act_` prefix
    pub account_id: Option<String>,

    pub email_sender: Option<String>,

    pub email_recipients: Vec<String>,

    pub email_password: Option<String>,

    pub smtp_host: String,

    pub smtp_port: u16,

    /// Directory the PDF is written to
    pub report_dir: PathBuf,

    pub currency_prefix: String,

    pub high_roas_threshold: f64,

    /// Fixed report day; `None` means yesterday at run time
    pub date: Option<NaiveDate>,

    /// Send the report by email after writing it
    pub send_email: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            access_token: None,
            account_id: None,
            email_sender: None,
            email_recipients: Vec::new(),
            email_password: None,
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            report_dir: PathBuf::from("."),
            currency_prefix: DEFAULT_CURRENCY_PREFIX.to_string(),
            high_roas_threshold: DEFAULT_HIGH_ROAS_THRESHOLD,
            date: None,
            send_email: true,
        }
    }
}

/// Credentials that must be present before anything starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    pub access_token: String,
    pub account_id: String,
}

/// Validate settings
///
/// **Public** - call before building a pipeline for early failure
///
/// Email settings are checked when a report is delivered.
pub fn validate_settings(settings: &ReportSettings) -> Result<ApiCredentials, ConfigError> {
    let access_token = non_empty(settings.access_token.as_deref())
        .ok_or(ConfigError::Missing("META_API_KEY"))?;
    let account_id = non_empty(settings.account_id.as_deref())
        .ok_or(ConfigError::Missing("META_AD_ACCOUNT_ID"))?;

    let digits = account_id.strip_prefix("act_").unwrap_or(account_id);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::Invalid {
            name: "META_AD_ACCOUNT_ID",
            reason: format!("expected a numeric account id, got '{}'", account_id),
        });
    }

    if !settings.high_roas_threshold.is_finite() || settings.high_roas_threshold < 0.0 {
        return Err(ConfigError::Invalid {
            name: "high_roas_threshold",
            reason: "must be a non-negative number".to_string(),
        });
    }

    if settings.smtp_port == 0 {
        return Err(ConfigError::Invalid {
            name: "SMTP_PORT",
            reason: "must be greater than 0".to_string(),
        });
    }

    Ok(ApiCredentials {
        access_token: access_token.to_string(),
        account_id: account_id.to_string(),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
