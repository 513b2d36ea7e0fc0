use std::sync::Arc;
use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use crate::config::{MailerConfig, MailerProviderConfig};
use crate::contract::error::MailerError;
use crate::contract::model::{OtpSendRequest, RateLimitInfo};
use crate::domain::rate_limiter::RateLimiter;
use crate::domain::templates;
use crate::infra::{noop::NoopMailer, smtp::SmtpMailer, Mailer};

/// Simple shape check; the allow-list policy belongs to the signup flow,
/// not the mailer.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern"));

pub fn is_valid_email_shape(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Outbound OTP email service: validation → rate limiting → render → send.
pub struct MailerService {
    config: MailerConfig,
    limiter: RateLimiter,
    transport: Arc<dyn Mailer>,
}

impl MailerService {
    pub fn new(config: MailerConfig, transport: Arc<dyn Mailer>) -> Self {
        Self {
            config,
            limiter: RateLimiter::new(),
            transport,
        }
    }

    /// Build the service with the transport selected by configuration.
    pub fn from_config(config: MailerConfig) -> Result<Self, MailerError> {
        let transport: Arc<dyn Mailer> = match &config.provider {
            MailerProviderConfig::Smtp {
                host,
                port,
                username,
                password,
                use_tls,
            } => Arc::new(SmtpMailer::new(
                host,
                *port,
                username.clone(),
                password.clone(),
                *use_tls,
                &config.from_address,
                config.from_name.as_deref(),
            )?),
            MailerProviderConfig::Noop => Arc::new(NoopMailer::new()),
        };
        Ok(Self::new(config, transport))
    }

    pub fn config(&self) -> &MailerConfig {
        &self.config
    }

    /// Deliver an OTP email, enforcing the per-email rate limit.
    ///
    /// Validation happens before the limiter is touched, so malformed
    /// requests never consume budget.
    pub async fn send_otp(&self, req: &OtpSendRequest) -> Result<RateLimitInfo, MailerError> {
        if req.email.trim().is_empty() || req.otp_code.trim().is_empty() {
            return Err(MailerError::MissingFields);
        }
        if !is_valid_email_shape(&req.email) {
            return Err(MailerError::invalid_email(&req.email));
        }

        self.limiter.check(&req.email)?;

        let content = templates::render(req.template, &req.otp_code, &self.config, &req.metadata);
        self.transport
            .send(&req.email, &content.subject, &content.html)
            .await?;

        info!(to = %req.email, template = ?req.template, "OTP email sent");
        Ok(self.limiter.info(&req.email))
    }
}
