//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! The metrics aggregator has no error type: it degrades bad input to zero.

use thiserror::Error;

/// Errors that can occur while fetching insights from the Graph API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Graph API error {code} ({kind}): {message}")]
    Graph {
        code: i64,
        kind: String,
        message: String,
    },

    #[error("Invalid insights response: {0}")]
    InvalidResponse(String),
}

/// Errors that can occur while rendering the report document
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to encode page content: {0}")]
    ContentEncoding(String),

    #[error("Failed to serialize PDF: {0}")]
    Serialization(String),
}

/// Errors that can occur while delivering the report
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("No email recipients configured")]
    NoRecipients,

    #[error("Email password not set")]
    MissingPassword,

    #[error("Invalid email address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to read report file: {0}")]
    Attachment(#[from] std::io::Error),

    #[error("Failed to build email: {0}")]
    Message(String),

    #[error("Failed to send email: {0}")]
    Transport(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors raised while assembling runtime settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Required setting is missing: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
