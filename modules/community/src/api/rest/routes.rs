use axum::{
    routing::{get, post, put},
    Extension, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

use super::{alumni, announcements, career, clubs, discussions, events, gamification, profiles};
use crate::domain::service::CommunityService;

#[derive(OpenApi)]
#[openapi(
    paths(
        profiles::list_profiles,
        profiles::get_profile,
        profiles::update_profile,
        discussions::list_discussions,
        discussions::get_discussion,
        discussions::create_discussion,
        discussions::update_discussion,
        discussions::delete_discussion,
        discussions::vote_discussion,
        discussions::list_comments,
        discussions::create_comment,
        discussions::delete_comment,
        announcements::list_announcements,
        announcements::create_announcement,
        announcements::update_announcement,
        announcements::delete_announcement,
        events::list_events,
        events::create_event,
        events::update_event,
        events::delete_event,
        clubs::list_clubs,
        clubs::get_club,
        clubs::create_club,
        clubs::update_club,
        clubs::delete_club,
        clubs::join_club,
        clubs::leave_club,
        clubs::list_club_members,
        career::list_career_posts,
        career::create_career_post,
        career::delete_career_post,
        alumni::list_alumni,
        alumni::get_alumni,
        alumni::upsert_alumni,
        gamification::get_engagement
    ),
    components(schemas(
        profiles::ProfileDto,
        profiles::UpdateProfileReq,
        discussions::DiscussionDto,
        discussions::CreateDiscussionReq,
        discussions::UpdateDiscussionReq,
        discussions::VoteReq,
        discussions::CommentDto,
        discussions::CreateCommentReq,
        announcements::AnnouncementDto,
        announcements::CreateAnnouncementReq,
        announcements::UpdateAnnouncementReq,
        events::EventDto,
        events::CreateEventReq,
        events::UpdateEventReq,
        clubs::ClubDto,
        clubs::CreateClubReq,
        clubs::UpdateClubReq,
        clubs::MembershipReq,
        clubs::ClubMemberDto,
        career::CareerPostDto,
        career::CreateCareerPostReq,
        alumni::AlumniProfileDto,
        alumni::UpsertAlumniReq,
        gamification::BadgeDto,
        gamification::EngagementDto,
        api_core::problem::Problem
    ))
)]
struct CommunityApi;

/// OpenAPI fragment for this module, merged by the server.
pub fn openapi() -> utoipa::openapi::OpenApi {
    CommunityApi::openapi()
}

pub fn router(service: Arc<CommunityService>) -> Router {
    Router::new()
        .route(
            "/profiles",
            get(profiles::list_profiles),
        )
        .route(
            "/profiles/{id}",
            get(profiles::get_profile).put(profiles::update_profile),
        )
        .route(
            "/discussions",
            get(discussions::list_discussions).post(discussions::create_discussion),
        )
        .route(
            "/discussions/{id}",
            get(discussions::get_discussion)
                .put(discussions::update_discussion)
                .delete(discussions::delete_discussion),
        )
        .route("/discussions/{id}/vote", post(discussions::vote_discussion))
        .route(
            "/discussions/{id}/comments",
            get(discussions::list_comments).post(discussions::create_comment),
        )
        .route(
            "/comments/{id}",
            axum::routing::delete(discussions::delete_comment),
        )
        .route(
            "/announcements",
            get(announcements::list_announcements).post(announcements::create_announcement),
        )
        .route(
            "/announcements/{id}",
            put(announcements::update_announcement).delete(announcements::delete_announcement),
        )
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/{id}",
            put(events::update_event).delete(events::delete_event),
        )
        .route("/clubs", get(clubs::list_clubs).post(clubs::create_club))
        .route(
            "/clubs/{id}",
            get(clubs::get_club)
                .put(clubs::update_club)
                .delete(clubs::delete_club),
        )
        .route("/clubs/{id}/join", post(clubs::join_club))
        .route("/clubs/{id}/leave", post(clubs::leave_club))
        .route("/clubs/{id}/members", get(clubs::list_club_members))
        .route(
            "/career-posts",
            get(career::list_career_posts).post(career::create_career_post),
        )
        .route(
            "/career-posts/{id}",
            axum::routing::delete(career::delete_career_post),
        )
        .route("/alumni", get(alumni::list_alumni))
        .route(
            "/alumni/{id}",
            get(alumni::get_alumni).put(alumni::upsert_alumni),
        )
        .route("/gamification/{id}", get(gamification::get_engagement))
        .layer(Extension(service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::infra::storage::ensure_schema;
    use sqlx::SqlitePool;

    async fn test_router() -> Router {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        ensure_schema(&pool).await.unwrap();
        router(Arc::new(CommunityService::new(pool)))
    }

    async fn send(
        router: &Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let resp = router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn discussion_crud_over_http() {
        let router = test_router().await;
        let author = uuid::Uuid::new_v4();

        let (status, created) = send(
            &router,
            "POST",
            "/discussions",
            Some(serde_json::json!({
                "title": "Study group",
                "content": "Anyone up for forming one?",
                "category": "academics",
                "tags": ["study", "groups"],
                "author_id": author
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["tags"][0], "study");

        let id = created["id"].as_str().unwrap().to_string();
        let (status, fetched) = send(&router, "GET", &format!("/discussions/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["title"], "Study group");

        let (status, voted) = send(
            &router,
            "POST",
            &format!("/discussions/{id}/vote"),
            Some(serde_json::json!({"delta": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(voted["votes"], 1);

        let (status, _) = send(&router, "DELETE", &format!("/discussions/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, problem) = send(&router, "GET", &format!("/discussions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(problem["code"], "not_found");
    }

    #[tokio::test]
    async fn empty_title_is_a_validation_problem() {
        let router = test_router().await;
        let (status, problem) = send(
            &router,
            "POST",
            "/announcements",
            Some(serde_json::json!({"title": "  ", "content": "body"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(problem["code"], "validation");
    }

    #[tokio::test]
    async fn malformed_uuid_in_path_is_rejected() {
        let router = test_router().await;
        let (status, _) = send(&router, "GET", "/discussions/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
