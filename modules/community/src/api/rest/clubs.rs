use axum::{
    extract::{Path, Query},
    http::StatusCode,
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
use crate::domain::service::{CommunityService, NewClub};
use crate::infra::storage::clubs::{ClubMemberRow, ClubPatch, ClubRow};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClubDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub president_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateClubReq {
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub president_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateClubReq {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub president_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MembershipReq {
    pub member_id: Uuid,
    /// "member" unless the joiner coordinates the club.
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClubMemberDto {
    pub club_id: String,
    pub member_id: String,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

impl From<ClubRow> for ClubDto {
    fn from(row: ClubRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            logo_url: row.logo_url,
            president_id: row.president_id,
            created_at: row.created_at,
        }
    }
}

impl From<ClubMemberRow> for ClubMemberDto {
    fn from(row: ClubMemberRow) -> Self {
        Self {
            club_id: row.club_id,
            member_id: row.member_id,
            role: row.role,
            joined_at: row.joined_at,
        }
    }
}

/// List clubs alphabetically.
#[utoipa::path(
    get,
    path = "/clubs",
    tag = "clubs",
    params(PageQuery),
    responses((status = 200, body = [ClubDto]))
)]
pub async fn list_clubs(
    Extension(svc): Extension<Arc<CommunityService>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<ClubDto>>, ProblemResponse> {
    svc.list_clubs(query.limit, query.offset)
        .await
        .map(|rows| Json(rows.into_iter().map(ClubDto::from).collect()))
        .map_err(|e| map_community_error(&e))
}

/// Get a club.
#[utoipa::path(
    get,
    path = "/clubs/{id}",
    tag = "clubs",
    params(("id" = Uuid, Path, description = "Club id")),
    responses((status = 200, body = ClubDto), (status = 404, body = Problem))
)]
pub async fn get_club(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClubDto>, ProblemResponse> {
    svc.get_club(id)
        .await
        .map(|row| Json(row.into()))
        .map_err(|e| map_community_error(&e))
}

/// Register a club.
#[utoipa::path(
    post,
    path = "/clubs",
    tag = "clubs",
    request_body = CreateClubReq,
    responses(
        (status = 201, body = ClubDto),
        (status = 400, body = Problem),
        (status = 409, body = Problem)
    )
)]
pub async fn create_club(
    Extension(svc): Extension<Arc<CommunityService>>,
    Json(req): Json<CreateClubReq>,
) -> Result<(StatusCode, Json<ClubDto>), ProblemResponse> {
    svc.create_club(NewClub {
        name: req.name,
        description: req.description,
        logo_url: req.logo_url,
        president_id: req.president_id,
    })
    .await
    .map(|row| (StatusCode::CREATED, Json(row.into())))
    .map_err(|e| map_community_error(&e))
}

/// Update a club.
#[utoipa::path(
    put,
    path = "/clubs/{id}",
    tag = "clubs",
    params(("id" = Uuid, Path, description = "Club id")),
    request_body = UpdateClubReq,
    responses(
        (status = 200, body = ClubDto),
        (status = 400, body = Problem),
        (status = 404, body = Problem)
    )
)]
pub async fn update_club(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateClubReq>,
) -> Result<Json<ClubDto>, ProblemResponse> {
    svc.update_club(
        id,
        ClubPatch {
            name: req.name,
            description: req.description,
            logo_url: req.logo_url,
            president_id: req.president_id.map(|id| id.to_string()),
        },
    )
    .await
    .map(|row| Json(row.into()))
    .map_err(|e| map_community_error(&e))
}

/// Dissolve a club.
#[utoipa::path(
    delete,
    path = "/clubs/{id}",
    tag = "clubs",
    params(("id" = Uuid, Path, description = "Club id")),
    responses((status = 204), (status = 404, body = Problem))
)]
pub async fn delete_club(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ProblemResponse> {
    svc.delete_club(id)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|e| map_community_error(&e))
}

/// Join a club.
#[utoipa::path(
    post,
    path = "/clubs/{id}/join",
    tag = "clubs",
    params(("id" = Uuid, Path, description = "Club id")),
    request_body = MembershipReq,
    responses(
        (status = 201, body = ClubMemberDto),
        (status = 404, body = Problem),
        (status = 409, body = Problem)
    )
)]
pub async fn join_club(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
    Json(req): Json<MembershipReq>,
) -> Result<(StatusCode, Json<ClubMemberDto>), ProblemResponse> {
    svc.join_club(id, req.member_id, req.role)
        .await
        .map(|row| (StatusCode::CREATED, Json(row.into())))
        .map_err(|e| map_community_error(&e))
}

/// Leave a club.
#[utoipa::path(
    post,
    path = "/clubs/{id}/leave",
    tag = "clubs",
    params(("id" = Uuid, Path, description = "Club id")),
    request_body = MembershipReq,
    responses((status = 204), (status = 404, body = Problem))
)]
pub async fn leave_club(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
    Json(req): Json<MembershipReq>,
) -> Result<StatusCode, ProblemResponse> {
    svc.leave_club(id, req.member_id)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|e| map_community_error(&e))
}

/// List club members, longest-standing first.
#[utoipa::path(
    get,
    path = "/clubs/{id}/members",
    tag = "clubs",
    params(("id" = Uuid, Path, description = "Club id")),
    responses((status = 200, body = [ClubMemberDto]), (status = 404, body = Problem))
)]
pub async fn list_club_members(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ClubMemberDto>>, ProblemResponse> {
    svc.list_club_members(id)
        .await
        .map(|rows| Json(rows.into_iter().map(ClubMemberDto::from).collect()))
        .map_err(|e| map_community_error(&e))
}
