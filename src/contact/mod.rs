//! Contact form: message validation, CSV backup, and email delivery

pub mod log;
pub mod mailer;

use chrono::{DateTime, Utc};

pub use log::{ContactLog, ContactLogError};
pub use mailer::{MailError, MailSettings, Mailer, SmtpMailer};

/// A validated contact form submission
#[derive(Debug, Clone, PartialEq)]
pub struct ContactMessage {
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactMessage {
    /// Trim all fields; `None` if any of them ends up empty
    pub fn new(name: &str, email: &str, message: &str, timestamp: DateTime<Utc>) -> Option<Self> {
        let (name, email, message) = (name.trim(), email.trim(), message.trim());
        if name.is_empty() || email.is_empty() || message.is_empty() {
            return None;
        }
        Some(Self {
            timestamp,
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_are_trimmed() {
        let msg = ContactMessage::new("  Ada ", "ada@example.com\n", " hi ", Utc::now()).unwrap();
        assert_eq!(msg.name, "Ada");
        assert_eq!(msg.email, "ada@example.com");
        assert_eq!(msg.message, "hi");
    }

    #[test]
    fn test_blank_fields_are_rejected() {
        let now = Utc::now();
        assert!(ContactMessage::new("", "a@b.c", "hi", now).is_none());
        assert!(ContactMessage::new("Ada", "   ", "hi", now).is_none());
        assert!(ContactMessage::new("Ada", "a@b.c", "\t", now).is_none());
    }
}
