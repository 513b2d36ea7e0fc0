use thiserror::Error;

/// Errors the mailer exposes to its callers. Each variant is a distinct
/// kind so consumers classify by matching, never by message text.
#[derive(Error, Debug, Clone)]
pub enum MailerError {
    #[error("Email and OTP code are required")]
    MissingFields,

    #[error("Invalid email format: '{email}'")]
    InvalidEmail { email: String },

    #[error("Too many OTP requests. Please try again after {} minutes.", minutes_left(*seconds_remaining))]
    RateLimited { seconds_remaining: u64 },

    #[error("Failed to send email: {message}")]
    Transport { message: String },

    #[error("Invalid mailer configuration: {message}")]
    InvalidConfig { message: String },
}

impl MailerError {
    pub fn invalid_email(email: impl Into<String>) -> Self {
        Self::InvalidEmail {
            email: email.into(),
        }
    }

    pub fn rate_limited(seconds_remaining: u64) -> Self {
        Self::RateLimited { seconds_remaining }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Whole minutes left, rounded up, for human-readable wait messages.
pub fn minutes_left(seconds_remaining: u64) -> u64 {
    seconds_remaining.div_ceil(60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_message_reports_minutes_rounded_up() {
        let err = MailerError::rate_limited(61);
        assert_eq!(
            err.to_string(),
            "Too many OTP requests. Please try again after 2 minutes."
        );
        let err = MailerError::rate_limited(60);
        assert!(err.to_string().contains("after 1 minutes"));
    }
}
