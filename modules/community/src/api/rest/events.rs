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
use crate::domain::service::{CommunityService, NewEvent};
use crate::infra::storage::events::{EventPatch, EventRow};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventDto {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub organizer_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateEventReq {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub organizer_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateEventReq {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl From<EventRow> for EventDto {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            location: row.location,
            start_time: row.start_time,
            end_time: row.end_time,
            organizer_id: row.organizer_id,
            created_at: row.created_at,
        }
    }
}

/// List upcoming events, soonest first.
#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    params(PageQuery),
    responses((status = 200, body = [EventDto]))
)]
pub async fn list_events(
    Extension(svc): Extension<Arc<CommunityService>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<EventDto>>, ProblemResponse> {
    svc.list_upcoming_events(query.limit, query.offset)
        .await
        .map(|rows| Json(rows.into_iter().map(EventDto::from).collect()))
        .map_err(|e| map_community_error(&e))
}

/// Schedule an event.
#[utoipa::path(
    post,
    path = "/events",
    tag = "events",
    request_body = CreateEventReq,
    responses((status = 201, body = EventDto), (status = 400, body = Problem))
)]
pub async fn create_event(
    Extension(svc): Extension<Arc<CommunityService>>,
    Json(req): Json<CreateEventReq>,
) -> Result<(StatusCode, Json<EventDto>), ProblemResponse> {
    svc.create_event(NewEvent {
        title: req.title,
        description: req.description,
        location: req.location,
        start_time: req.start_time,
        end_time: req.end_time,
        organizer_id: req.organizer_id,
    })
    .await
    .map(|row| (StatusCode::CREATED, Json(row.into())))
    .map_err(|e| map_community_error(&e))
}

/// Update an event.
#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event id")),
    request_body = UpdateEventReq,
    responses(
        (status = 200, body = EventDto),
        (status = 400, body = Problem),
        (status = 404, body = Problem)
    )
)]
pub async fn update_event(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateEventReq>,
) -> Result<Json<EventDto>, ProblemResponse> {
    svc.update_event(
        id,
        EventPatch {
            title: req.title,
            description: req.description,
            location: req.location,
            start_time: req.start_time,
            end_time: req.end_time,
        },
    )
    .await
    .map(|row| Json(row.into()))
    .map_err(|e| map_community_error(&e))
}

/// Cancel an event.
#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event id")),
    responses((status = 204), (status = 404, body = Problem))
)]
pub async fn delete_event(
    Extension(svc): Extension<Arc<CommunityService>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ProblemResponse> {
    svc.delete_event(id)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|e| map_community_error(&e))
}
