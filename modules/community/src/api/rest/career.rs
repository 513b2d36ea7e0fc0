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
use crate::domain::service::{CommunityService, NewCareerPost};
use crate::infra::storage::career::CareerPostRow;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CareerPostDto {
    pub id: String,
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub post_type: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub posted_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCareerPostReq {
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub post_type: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub posted_by: Option<Uuid>,
}

impl From<CareerPostRow> for CareerPostDto {
    fn from(row: CareerPostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            company: row.company,
            description: row.description,
            requirements: row.requirements,
            location: row.location,
            post_type: row.post_type,
            deadline: row.deadline,
            posted_by: row.posted_by,
            created_at: row.created_at,
        }
    }
}

/// List career postings, newest first.
#[utoipa::path(
    get,
    path = "/career-posts",
    tag = "career",
    params(PageQuery),
    responses((status = 200, body = [CareerPostDto]))
)]
pub async fn list_career_posts(
    Extension(svc): Extension<Arc<CommunityService>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<CareerPostDto>>, ProblemResponse> {
    svc.list_career_posts(query.limit, query.offset)
        .await
        .map(|rows| Json(rows.into_iter().map(CareerPostDto::from).collect()))
        .map_err(|e| map_community_error(&e))
}

/// Publish a career posting.
#[utoipa::path(
    post,
    path = "/career-posts",
    tag = "career",
    request_body = CreateCareerPostReq,
    responses((status = 201, body = CareerPostDto), (status = 400, body = Problem))
)]
pub async fn create_career_post(
    Extension(svc): Extension<Arc<CommunityService>>,
    Json(req): Json<CreateCareerPostReq>,
) -> Result<(StatusCode, Json<CareerPostDto>), ProblemResponse> {
    svc.create_career_post(NewCareerPost {
        title: req.title,
        company: req.company,
        description: req.description,
        requirements: req.requirements,
        location: req.location,
        post_type: req.post_type,
        deadline: req.deadline,
        posted_by: req.posted_by,
    })
    .await
    .map(|row| (StatusCode::CREATED, Json(row.into())))
    .map_err(|e| map_community_error(&e))
}

/// Remove a career posting.
#[utoipa::path(
    delete,
    path = "/career-posts/{id}",
    tag = "career",
    params(("id" = Uuid, Path, description = "Career post id")),
    responses((status = 204), (status = 404, body = Problem))
)]
pub async fn delete_career_post(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ProblemResponse> {
    svc.delete_career_post(id)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|e| map_community_error(&e))
}
