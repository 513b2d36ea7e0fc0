use axum::{
    extract::{Path, Query},
    response::Json,
    Extension,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use api_core::problem::{Problem, ProblemResponse};

use super::{map_community_error, PageQuery};
use crate::domain::service::CommunityService;
use crate::infra::storage::profiles::{ProfilePatch, ProfileRow};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileDto {
    pub id: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateProfileReq {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<ProfileRow> for ProfileDto {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            full_name: row.full_name,
            avatar_url: row.avatar_url,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

impl From<UpdateProfileReq> for ProfilePatch {
    fn from(req: UpdateProfileReq) -> Self {
        Self {
            username: req.username,
            full_name: req.full_name,
            avatar_url: req.avatar_url,
        }
    }
}

/// List profiles.
#[utoipa::path(
    get,
    path = "/profiles",
    tag = "profiles",
    params(PageQuery),
    responses((status = 200, body = [ProfileDto]))
)]
pub async fn list_profiles(
    Extension(svc): Extension<Arc<CommunityService>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<ProfileDto>>, ProblemResponse> {
    svc.list_profiles(query.limit, query.offset)
        .await
        .map(|rows| Json(rows.into_iter().map(ProfileDto::from).collect()))
        .map_err(|e| map_community_error(&e))
}

/// Get a profile by id.
#[utoipa::path(
    get,
    path = "/profiles/{id}",
    tag = "profiles",
    params(("id" = Uuid, Path, description = "Profile id")),
    responses(
        (status = 200, body = ProfileDto),
        (status = 404, body = Problem)
    )
)]
pub async fn get_profile(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileDto>, ProblemResponse> {
    svc.get_profile(id)
        .await
        .map(|row| Json(row.into()))
        .map_err(|e| map_community_error(&e))
}

/// Update a profile.
#[utoipa::path(
    put,
    path = "/profiles/{id}",
    tag = "profiles",
    params(("id" = Uuid, Path, description = "Profile id")),
    request_body = UpdateProfileReq,
    responses(
        (status = 200, body = ProfileDto),
        (status = 400, body = Problem),
        (status = 404, body = Problem)
    )
)]
pub async fn update_profile(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProfileReq>,
) -> Result<Json<ProfileDto>, ProblemResponse> {
    svc.update_profile(id, req.into())
        .await
        .map(|row| Json(row.into()))
        .map_err(|e| map_community_error(&e))
}
