//! Outbound email for contact form submissions

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use super::ContactMessage;

const SMTP_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum MailError {
    /// Server, credentials, or recipient missing
    #[error("SMTP not configured on server.")]
    NotConfigured,

    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// SMTP connection settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MailSettings {
    pub server: Option<String>,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_name: String,
    pub to: Option<String>,
}

impl MailSettings {
    pub fn is_configured(&self) -> bool {
        self.server.is_some() && self.username.is_some() && self.password.is_some() && self.to.is_some()
    }
}

/// Delivers contact messages to the site owner
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_contact(&self, message: &ContactMessage) -> Result<(), MailError>;
}

/// Escape text for inclusion in HTML body content
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn subject_line(message: &ContactMessage) -> String {
    format!("[Mentallify Contact] Message from {}", message.name)
}

pub fn plain_body(message: &ContactMessage) -> String {
    format!(
        "You have a new message from the website contact form.\n\n\
         Sender name: {}\nSender email: {}\n\nMessage:\n{}\n",
        message.name, message.email, message.message
    )
}

pub fn html_body(message: &ContactMessage) -> String {
    format!(
        "<html>\n  <body>\n    <h2>New website contact message</h2>\n    \
         <p><strong>From:</strong> {} &lt;{}&gt;</p>\n    \
         <p><strong>Message:</strong></p>\n    \
         <div style=\"white-space:pre-wrap;border-left:3px solid #ddd;padding-left:10px;\">{}</div>\n  \
         </body>\n</html>\n",
        escape_html(&message.name),
        escape_html(&message.email),
        escape_html(&message.message)
    )
}

/// Mailer sending through an authenticated SMTP relay
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    settings: MailSettings,
}

impl SmtpMailer {
    pub fn new(settings: MailSettings) -> Self {
        Self { settings }
    }

    /// Assemble the multipart email without sending it
    pub fn build_message(&self, message: &ContactMessage) -> Result<Message, MailError> {
        let (username, to) = match (&self.settings.username, &self.settings.to) {
            (Some(username), Some(to)) => (username, to),
            _ => return Err(MailError::NotConfigured),
        };

        let from = Mailbox::new(Some(self.settings.from_name.clone()), username.parse()?);
        let mut builder = Message::builder()
            .from(from)
            .to(to.parse::<Mailbox>()?)
            .subject(subject_line(message));
        if let Ok(address) = message.email.parse() {
            builder = builder.reply_to(Mailbox::new(Some(message.name.clone()), address));
        }

        Ok(builder.multipart(MultiPart::alternative_plain_html(
            plain_body(message),
            html_body(message),
        ))?)
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let (server, username, password) = match (
            &self.settings.server,
            &self.settings.username,
            &self.settings.password,
        ) {
            (Some(s), Some(u), Some(p)) => (s, u, p),
            _ => return Err(MailError::NotConfigured),
        };
        let credentials = Credentials::new(username.clone(), password.clone());

        let builder = match self.settings.port {
            587 => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(server)?,
            465 => AsyncSmtpTransport::<Tokio1Executor>::relay(server)?,
            _ => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(server),
        };

        Ok(builder
            .port(self.settings.port)
            .credentials(credentials)
            .timeout(Some(SMTP_TIMEOUT))
            .build())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_contact(&self, message: &ContactMessage) -> Result<(), MailError> {
        if !self.settings.is_configured() {
            return Err(MailError::NotConfigured);
        }
        let email = self.build_message(message)?;
        self.transport()?.send(email).await?;
        info!(sender = %message.email, "contact email sent");
        Ok(())
    }
}
