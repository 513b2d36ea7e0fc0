use axum::{extract::Path, response::Json, Extension};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use api_core::problem::{Problem, ProblemResponse};

use super::map_community_error;
use crate::domain::gamification::{badge_by_id, EngagementSummary};
use crate::domain::service::CommunityService;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BadgeDto {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Engagement summary for the dashboard display.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EngagementDto {
    pub points: i64,
    pub level: i64,
    pub progress_percent: i64,
    pub badges: Vec<BadgeDto>,
}

impl From<EngagementSummary> for EngagementDto {
    fn from(summary: EngagementSummary) -> Self {
        let badges = summary
            .badges
            .iter()
            .filter_map(|id| badge_by_id(id))
            .map(|b| BadgeDto {
                id: b.id.to_string(),
                name: b.name.to_string(),
                description: b.description.to_string(),
            })
            .collect();
        Self {
            points: summary.points,
            level: summary.level,
            progress_percent: summary.progress_percent,
            badges,
        }
    }
}

/// Engagement points, level, and badges for a profile.
#[utoipa::path(
    get,
    path = "/gamification/{id}",
    tag = "gamification",
    params(("id" = Uuid, Path, description = "Profile id")),
    responses((status = 200, body = EngagementDto), (status = 404, body = Problem))
)]
pub async fn get_engagement(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<EngagementDto>, ProblemResponse> {
    svc.engagement(id)
        .await
        .map(|summary| Json(summary.into()))
        .map_err(|e| map_community_error(&e))
}
