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
use crate::domain::service::{CommunityService, NewAnnouncement};
use crate::infra::storage::announcements::{AnnouncementPatch, AnnouncementRow};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnnouncementDto {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAnnouncementReq {
    pub title: String,
    pub content: String,
    pub author_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateAnnouncementReq {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl From<AnnouncementRow> for AnnouncementDto {
    fn from(row: AnnouncementRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            author_id: row.author_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// List announcements, newest first.
#[utoipa::path(
    get,
    path = "/announcements",
    tag = "announcements",
    params(PageQuery),
    responses((status = 200, body = [AnnouncementDto]))
)]
pub async fn list_announcements(
    Extension(svc): Extension<Arc<CommunityService>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<AnnouncementDto>>, ProblemResponse> {
    svc.list_announcements(query.limit, query.offset)
        .await
        .map(|rows| Json(rows.into_iter().map(AnnouncementDto::from).collect()))
        .map_err(|e| map_community_error(&e))
}

/// Publish an announcement.
#[utoipa::path(
    post,
    path = "/announcements",
    tag = "announcements",
    request_body = CreateAnnouncementReq,
    responses((status = 201, body = AnnouncementDto), (status = 400, body = Problem))
)]
pub async fn create_announcement(
    Extension(svc): Extension<Arc<CommunityService>>,
    Json(req): Json<CreateAnnouncementReq>,
) -> Result<(StatusCode, Json<AnnouncementDto>), ProblemResponse> {
    svc.create_announcement(NewAnnouncement {
        title: req.title,
        content: req.content,
        author_id: req.author_id,
    })
    .await
    .map(|row| (StatusCode::CREATED, Json(row.into())))
    .map_err(|e| map_community_error(&e))
}

/// Edit an announcement.
#[utoipa::path(
    put,
    path = "/announcements/{id}",
    tag = "announcements",
    params(("id" = Uuid, Path, description = "Announcement id")),
    request_body = UpdateAnnouncementReq,
    responses(
        (status = 200, body = AnnouncementDto),
        (status = 400, body = Problem),
        (status = 404, body = Problem)
    )
)]
pub async fn update_announcement(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAnnouncementReq>,
) -> Result<Json<AnnouncementDto>, ProblemResponse> {
    svc.update_announcement(
        id,
        AnnouncementPatch {
            title: req.title,
            content: req.content,
        },
    )
    .await
    .map(|row| Json(row.into()))
    .map_err(|e| map_community_error(&e))
}

/// Remove an announcement.
#[utoipa::path(
    delete,
    path = "/announcements/{id}",
    tag = "announcements",
    params(("id" = Uuid, Path, description = "Announcement id")),
    responses((status = 204), (status = 404, body = Problem))
)]
pub async fn delete_announcement(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ProblemResponse> {
    svc.delete_announcement(id)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|e| map_community_error(&e))
}
