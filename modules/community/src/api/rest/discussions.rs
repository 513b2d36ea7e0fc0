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
use crate::domain::service::{CommunityService, NewComment, NewDiscussion};
use crate::infra::storage::comments::CommentRow;
use crate::infra::storage::discussions::{DiscussionPatch, DiscussionRow};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DiscussionDto {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author_id: String,
    pub votes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateDiscussionReq {
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateDiscussionReq {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VoteReq {
    /// +1 or -1.
    pub delta: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentDto {
    pub id: String,
    pub discussion_id: String,
    pub author_id: String,
    pub content: String,
    pub votes: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCommentReq {
    pub author_id: Uuid,
    pub content: String,
}

impl From<DiscussionRow> for DiscussionDto {
    fn from(row: DiscussionRow) -> Self {
        let tags = serde_json::from_str(&row.tags).unwrap_or_default();
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            category: row.category,
            tags,
            author_id: row.author_id,
            votes: row.votes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<CommentRow> for CommentDto {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            discussion_id: row.discussion_id,
            author_id: row.author_id,
            content: row.content,
            votes: row.votes,
            created_at: row.created_at,
        }
    }
}

/// List discussions, newest first.
#[utoipa::path(
    get,
    path = "/discussions",
    tag = "discussions",
    params(PageQuery),
    responses((status = 200, body = [DiscussionDto]))
)]
pub async fn list_discussions(
    Extension(svc): Extension<Arc<CommunityService>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<DiscussionDto>>, ProblemResponse> {
    svc.list_discussions(query.limit, query.offset)
        .await
        .map(|rows| Json(rows.into_iter().map(DiscussionDto::from).collect()))
        .map_err(|e| map_community_error(&e))
}

/// Get a discussion.
#[utoipa::path(
    get,
    path = "/discussions/{id}",
    tag = "discussions",
    params(("id" = Uuid, Path, description = "Discussion id")),
    responses((status = 200, body = DiscussionDto), (status = 404, body = Problem))
)]
pub async fn get_discussion(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DiscussionDto>, ProblemResponse> {
    svc.get_discussion(id)
        .await
        .map(|row| Json(row.into()))
        .map_err(|e| map_community_error(&e))
}

/// Start a discussion.
#[utoipa::path(
    post,
    path = "/discussions",
    tag = "discussions",
    request_body = CreateDiscussionReq,
    responses((status = 201, body = DiscussionDto), (status = 400, body = Problem))
)]
pub async fn create_discussion(
    Extension(svc): Extension<Arc<CommunityService>>,
    Json(req): Json<CreateDiscussionReq>,
) -> Result<(StatusCode, Json<DiscussionDto>), ProblemResponse> {
    svc.create_discussion(NewDiscussion {
        title: req.title,
        content: req.content,
        category: req.category,
        tags: req.tags,
        author_id: req.author_id,
    })
    .await
    .map(|row| (StatusCode::CREATED, Json(row.into())))
    .map_err(|e| map_community_error(&e))
}

/// Update a discussion.
#[utoipa::path(
    put,
    path = "/discussions/{id}",
    tag = "discussions",
    params(("id" = Uuid, Path, description = "Discussion id")),
    request_body = UpdateDiscussionReq,
    responses(
        (status = 200, body = DiscussionDto),
        (status = 400, body = Problem),
        (status = 404, body = Problem)
    )
)]
pub async fn update_discussion(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateDiscussionReq>,
) -> Result<Json<DiscussionDto>, ProblemResponse> {
    let tags = match req.tags {
        Some(tags) => Some(
            serde_json::to_string(&tags)
                .map_err(|e| map_community_error(&crate::domain::error::CommunityError::validation(format!("invalid tags: {e}"))))?,
        ),
        None => None,
    };
    svc.update_discussion(
        id,
        DiscussionPatch {
            title: req.title,
            content: req.content,
            category: req.category,
            tags,
        },
    )
    .await
    .map(|row| Json(row.into()))
    .map_err(|e| map_community_error(&e))
}

/// Delete a discussion and its comments.
#[utoipa::path(
    delete,
    path = "/discussions/{id}",
    tag = "discussions",
    params(("id" = Uuid, Path, description = "Discussion id")),
    responses((status = 204), (status = 404, body = Problem))
)]
pub async fn delete_discussion(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ProblemResponse> {
    svc.delete_discussion(id)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|e| map_community_error(&e))
}

/// Vote a discussion up or down.
#[utoipa::path(
    post,
    path = "/discussions/{id}/vote",
    tag = "discussions",
    params(("id" = Uuid, Path, description = "Discussion id")),
    request_body = VoteReq,
    responses(
        (status = 200, body = DiscussionDto),
        (status = 400, body = Problem),
        (status = 404, body = Problem)
    )
)]
pub async fn vote_discussion(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
    Json(req): Json<VoteReq>,
) -> Result<Json<DiscussionDto>, ProblemResponse> {
    svc.vote_discussion(id, req.delta)
        .await
        .map(|row| Json(row.into()))
        .map_err(|e| map_community_error(&e))
}

/// List a discussion's comments, oldest first.
#[utoipa::path(
    get,
    path = "/discussions/{id}/comments",
    tag = "discussions",
    params(("id" = Uuid, Path, description = "Discussion id")),
    responses((status = 200, body = [CommentDto]), (status = 404, body = Problem))
)]
pub async fn list_comments(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CommentDto>>, ProblemResponse> {
    svc.list_comments(id)
        .await
        .map(|rows| Json(rows.into_iter().map(CommentDto::from).collect()))
        .map_err(|e| map_community_error(&e))
}

/// Comment on a discussion.
#[utoipa::path(
    post,
    path = "/discussions/{id}/comments",
    tag = "discussions",
    params(("id" = Uuid, Path, description = "Discussion id")),
    request_body = CreateCommentReq,
    responses(
        (status = 201, body = CommentDto),
        (status = 400, body = Problem),
        (status = 404, body = Problem)
    )
)]
pub async fn create_comment(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateCommentReq>,
) -> Result<(StatusCode, Json<CommentDto>), ProblemResponse> {
    svc.add_comment(
        id,
        NewComment {
            author_id: req.author_id,
            content: req.content,
        },
    )
    .await
    .map(|row| (StatusCode::CREATED, Json(row.into())))
    .map_err(|e| map_community_error(&e))
}

/// Delete a comment.
#[utoipa::path(
    delete,
    path = "/comments/{id}",
    tag = "discussions",
    params(("id" = Uuid, Path, description = "Comment id")),
    responses((status = 204), (status = 404, body = Problem))
)]
pub async fn delete_comment(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ProblemResponse> {
    svc.delete_comment(id)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|e| map_community_error(&e))
}
