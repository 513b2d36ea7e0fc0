use async_trait::async_trait;
use std::sync::Mutex;

use super::Mailer;
use crate::contract::error::MailerError;

/// An email captured by [`NoopMailer`].
#[derive(Debug, Clone)]
pub struct RecordedEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Transport that records mail instead of delivering it. Used in tests and
/// local development where no SMTP relay is reachable.
#[derive(Debug, Default)]
pub struct NoopMailer {
    sent: Mutex<Vec<RecordedEmail>>,
}

impl NoopMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<RecordedEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailerError> {
        tracing::debug!(to = %to, subject = %subject, "noop mailer recording email");
        self.sent.lock().unwrap().push(RecordedEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}

/// Transport that fails every send; exercises delivery-error paths in tests.
#[derive(Debug, Default)]
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _to: &str, _subject: &str, _html: &str) -> Result<(), MailerError> {
        Err(MailerError::transport("smtp connection refused"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_sent_mail() {
        let mailer = NoopMailer::new();
        mailer
            .send("a@university.edu", "Hi", "<p>hello</p>")
            .await
            .unwrap();
        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@university.edu");
        assert_eq!(sent[0].subject, "Hi");
    }
}
