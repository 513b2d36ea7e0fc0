pub mod noop;
pub mod smtp;

use async_trait::async_trait;

use crate::contract::error::MailerError;

/// Transport boundary for outgoing mail.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a single HTML email.
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailerError>;
}
