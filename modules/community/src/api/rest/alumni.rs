use axum::{
    extract::{Path, Query},
    response::Json,
    Extension,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use api_core::problem::{Problem, ProblemResponse};

use super::{map_community_error, PageQuery};
use crate::domain::service::{AlumniEntry, CommunityService};
use crate::infra::storage::alumni::AlumniProfileRow;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AlumniProfileDto {
    pub id: String,
    pub graduation_year: Option<i64>,
    pub degree: Option<String>,
    pub major: Option<String>,
    pub current_company: Option<String>,
    pub linkedin_url: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpsertAlumniReq {
    pub graduation_year: Option<i64>,
    pub degree: Option<String>,
    pub major: Option<String>,
    pub current_company: Option<String>,
    pub linkedin_url: Option<String>,
    pub bio: Option<String>,
}

impl From<AlumniProfileRow> for AlumniProfileDto {
    fn from(row: AlumniProfileRow) -> Self {
        Self {
            id: row.id,
            graduation_year: row.graduation_year,
            degree: row.degree,
            major: row.major,
            current_company: row.current_company,
            linkedin_url: row.linkedin_url,
            bio: row.bio,
        }
    }
}

/// Browse the alumni directory, most recent classes first.
#[utoipa::path(
    get,
    path = "/alumni",
    tag = "alumni",
    params(PageQuery),
    responses((status = 200, body = [AlumniProfileDto]))
)]
pub async fn list_alumni(
    Extension(svc): Extension<Arc<CommunityService>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<AlumniProfileDto>>, ProblemResponse> {
    svc.list_alumni_profiles(query.limit, query.offset)
        .await
        .map(|rows| Json(rows.into_iter().map(AlumniProfileDto::from).collect()))
        .map_err(|e| map_community_error(&e))
}

/// Get one alumni entry.
#[utoipa::path(
    get,
    path = "/alumni/{id}",
    tag = "alumni",
    params(("id" = Uuid, Path, description = "Profile id")),
    responses((status = 200, body = AlumniProfileDto), (status = 404, body = Problem))
)]
pub async fn get_alumni(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AlumniProfileDto>, ProblemResponse> {
    svc.get_alumni_profile(id)
        .await
        .map(|row| Json(row.into()))
        .map_err(|e| map_community_error(&e))
}

/// Create or replace the alumni entry for a profile.
#[utoipa::path(
    put,
    path = "/alumni/{id}",
    tag = "alumni",
    params(("id" = Uuid, Path, description = "Profile id")),
    request_body = UpsertAlumniReq,
    responses(
        (status = 200, body = AlumniProfileDto),
        (status = 404, body = Problem)
    )
)]
pub async fn upsert_alumni(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpsertAlumniReq>,
) -> Result<Json<AlumniProfileDto>, ProblemResponse> {
    svc.upsert_alumni_profile(
        id,
        AlumniEntry {
            graduation_year: req.graduation_year,
            degree: req.degree,
            major: req.major,
            current_company: req.current_company,
            linkedin_url: req.linkedin_url,
            bio: req.bio,
        },
    )
    .await
    .map(|row| Json(row.into()))
    .map_err(|e| map_community_error(&e))
}
