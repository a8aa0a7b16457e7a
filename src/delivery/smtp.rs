//! SMTP delivery via lettre's blocking transport.

use super::{DeliveryChannel, ReportArtifact};
use crate::utils::config::{DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT};
use crate::utils::error::DeliveryError;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use log::info;

/// Sends the report as a PDF attachment over STARTTLS
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    pub host: String,
    pub port: u16,
    pub sender: String,
    /// Checked at delivery time
    pub password: Option<String>,
    pub recipients: Vec<String>,
}

impl SmtpMailer {
    pub fn new(sender: impl Into<String>, recipients: Vec<String>) -> Self {
        Self {
            host: DEFAULT_SMTP_HOST.to_string(),
            port: DEFAULT_SMTP_PORT,
            sender: sender.into(),
            password: None,
            recipients,
        }
    }

    pub fn with_server(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password.filter(|p| !p.is_empty());
        self
    }

    /// Build the outgoing message without sending it
    pub fn build_message(
        &self,
        artifact: &ReportArtifact,
        pdf: Vec<u8>,
    ) -> Result<Message, DeliveryError> {
        if self.recipients.is_empty() {
            return Err(DeliveryError::NoRecipients);
        }

        let mut builder = Message::builder()
            .from(parse_mailbox(&self.sender)?)
            .subject(artifact.subject());
        for recipient in &self.recipients {
            builder = builder.to(parse_mailbox(recipient)?);
        }

        let pdf_type = ContentType::parse("application/pdf")
            .map_err(|e| DeliveryError::Message(e.to_string()))?;
        let attachment = Attachment::new(artifact.file_name()).body(pdf, pdf_type);

        builder
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(artifact.body_text()))
                    .singlepart(attachment),
            )
            .map_err(|e| DeliveryError::Message(e.to_string()))
    }
}

impl DeliveryChannel for SmtpMailer {
    fn deliver(&self, artifact: &ReportArtifact) -> Result<(), DeliveryError> {
        let password = self
            .password
            .clone()
            .ok_or(DeliveryError::MissingPassword)?;

        let pdf = std::fs::read(&artifact.path)?;
        let message = self.build_message(artifact, pdf)?;

        let transport = SmtpTransport::starttls_relay(&self.host)
            .map_err(|e| DeliveryError::Transport(e.to_string()))?
            .port(self.port)
            .credentials(Credentials::new(self.sender.clone(), password))
            .build();

        transport
            .send(&message)
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        info!(
            "Email sent successfully to {} recipient(s)",
            self.recipients.len()
        );
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address
        .parse()
        .map_err(|e: lettre::address::AddressError| DeliveryError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn artifact() -> ReportArtifact {
        ReportArtifact {
            path: PathBuf::from("/tmp/report_2024-03-09.pdf"),
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        }
    }

    #[test]
    fn test_build_message_headers() {
        let mailer = SmtpMailer::new(
            "reports@example.com",
            vec!["a@example.com".to_string(), "b@example.com".to_string()],
        );
        let message = mailer.build_message(&artifact(), b"%PDF".to_vec()).unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();

        assert!(raw.contains("Subject: Daily Marketing Report - 2024-03-09"));
        assert!(raw.contains("a@example.com"));
        assert!(raw.contains("b@example.com"));
        assert!(raw.contains("report_2024-03-09.pdf"));
        assert!(raw.contains("application/pdf"));
    }

    #[test]
    fn test_build_message_requires_recipients() {
        let mailer = SmtpMailer::new("reports@example.com", Vec::new());
        assert!(matches!(
            mailer.build_message(&artifact(), Vec::new()),
            Err(DeliveryError::NoRecipients)
        ));
    }

    #[test]
    fn test_build_message_rejects_bad_address() {
        let mailer = SmtpMailer::new("not an address", vec!["a@example.com".to_string()]);
        assert!(matches!(
            mailer.build_message(&artifact(), Vec::new()),
            Err(DeliveryError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_deliver_without_password_fails_before_connecting() {
        let mailer = SmtpMailer::new("reports@example.com", vec!["a@example.com".to_string()])
            .with_password(Some(String::new()));
        assert!(matches!(
            mailer.deliver(&artifact()),
            Err(DeliveryError::MissingPassword)
        ));
    }
}
