use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors for the community resources.
#[derive(Error, Debug)]
pub enum CommunityError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl CommunityError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for CommunityError {
    fn from(e: sqlx::Error) -> Self {
        Self::database(e.to_string())
    }
}
