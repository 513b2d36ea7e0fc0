use thiserror::Error;

/// Signup-flow errors. One variant per user-facing failure kind; HTTP
/// mapping lives in the REST layer.
#[derive(Error, Debug, Clone)]
pub enum AuthFlowError {
    #[error("Please use a valid email address from an accepted domain")]
    DomainNotAllowed { email: String },

    #[error("Email and password are required")]
    MissingFields,

    #[error("Password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("No pending verification found for this email. Please request a new code.")]
    UnknownPending { email: String },

    #[error("Too many verification requests. Please wait before trying again.")]
    RateLimited { seconds_remaining: u64 },

    #[error("Failed to send verification code. Please try again.")]
    Delivery { message: String },

    #[error("Invalid verification code. Please check and try again.")]
    CodeMismatch,

    #[error("Verification code has expired. Please request a new one.")]
    CodeExpired,

    #[error("An account with this email already exists. Please sign in instead.")]
    AccountExists { email: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Internal error")]
    Internal { message: String },
}

impl AuthFlowError {
    pub fn domain_not_allowed(email: impl Into<String>) -> Self {
        Self::DomainNotAllowed {
            email: email.into(),
        }
    }

    pub fn unknown_pending(email: impl Into<String>) -> Self {
        Self::UnknownPending {
            email: email.into(),
        }
    }

    pub fn delivery(message: impl Into<String>) -> Self {
        Self::Delivery {
            message: message.into(),
        }
    }

    pub fn account_exists(email: impl Into<String>) -> Self {
        Self::AccountExists {
            email: email.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
