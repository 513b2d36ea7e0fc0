pub mod alumni;
pub mod announcements;
pub mod career;
pub mod clubs;
pub mod discussions;
pub mod events;
pub mod gamification;
pub mod profiles;
pub mod routes;

use serde::Deserialize;
use utoipa::IntoParams;

use api_core::problem::{self, ProblemResponse};

use crate::domain::error::CommunityError;

/// Shared pagination query parameters.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PageQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Map community errors onto problem responses.
pub fn map_community_error(error: &CommunityError) -> ProblemResponse {
    match error {
        CommunityError::NotFound { .. } => problem::not_found(error.to_string()),
        CommunityError::Validation { .. } => problem::validation(error.to_string()),
        CommunityError::Conflict { .. } => problem::conflict("conflict", error.to_string()),
        CommunityError::Database { .. } => {
            tracing::error!(error = %error, "community storage failure");
            problem::internal_error("Internal error")
        }
    }
}
