//! SMTP delivery of the rendered digest (STARTTLS + login).

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::{error, info};

use crate::config::EmailSettings;

const PLAIN_TEXT_NOTICE: &str =
    "Please view this email in an HTML-enabled client for the best experience.";

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Could not build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

pub struct EmailSender {
    settings: EmailSettings,
}

impl EmailSender {
    pub fn new(settings: EmailSettings) -> Self {
        Self { settings }
    }

    /// Sends `html_body` as a multipart/alternative message to the configured recipient.
    pub async fn send(&self, subject: &str, html_body: &str) -> Result<(), EmailError> {
        let s = &self.settings;
        info!("Composing multipart email message...");
        let message = build_message(&s.user, &s.to, subject, html_body)?;

        info!("Connecting to SMTP server {}:{}...", s.server, s.port);
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&s.server)?
            .port(s.port)
            .credentials(Credentials::new(s.user.clone(), s.password.clone()))
            .build();

        match transport.send(message).await {
            Ok(_) => {
                info!("Email sent successfully to {}", s.to);
                Ok(())
            }
            Err(e) => {
                error!("Failed to send email: {e}");
                Err(EmailError::Smtp(e))
            }
        }
    }
}

pub fn build_message(
    from: &str,
    to: &str,
    subject: &str,
    html_body: &str,
) -> Result<Message, EmailError> {
    let from: Mailbox = from.parse()?;
    let to: Mailbox = to.parse()?;

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .multipart(MultiPart::alternative_plain_html(
            PLAIN_TEXT_NOTICE.to_string(),
            html_body.to_string(),
        ))?;
    Ok(message)
}
