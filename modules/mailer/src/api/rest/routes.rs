use axum::{routing::post, Extension, Router};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::api::rest::handlers;
use crate::domain::service::MailerService;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::send_otp_email),
    components(schemas(
        crate::api::rest::dto::SendOtpEmailReq,
        crate::api::rest::dto::SendOtpEmailResp,
        crate::contract::model::OtpTemplate,
        crate::contract::model::OtpMetadata,
        crate::contract::model::RateLimitInfo,
        api_core::problem::Problem
    ))
)]
struct MailerApi;

/// OpenAPI fragment for this module, merged by the server.
pub fn openapi() -> utoipa::openapi::OpenApi {
    MailerApi::openapi()
}

pub fn router(service: Arc<MailerService>) -> Router {
    Router::new()
        .route("/internal/send-otp-email", post(handlers::send_otp_email))
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

    use crate::config::MailerConfig;
    use crate::infra::noop::NoopMailer;

    fn test_router() -> Router {
        let svc = Arc::new(MailerService::new(
            MailerConfig::default(),
            Arc::new(NoopMailer::new()),
        ));
        router(svc)
    }

    async fn post_json(router: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let resp = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/internal/send-otp-email")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    #[tokio::test]
    async fn valid_request_returns_success_with_rate_limit_info() {
        let (status, body) = post_json(
            test_router(),
            serde_json::json!({"email": "student@university.edu", "otp_code": "1234"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["rate_limit_info"]["remaining_attempts"], 4);
    }

    #[tokio::test]
    async fn missing_fields_return_400_problem() {
        let (status, body) = post_json(test_router(), serde_json::json!({"email": ""})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation");
    }

    #[tokio::test]
    async fn invalid_email_returns_400_problem() {
        let (status, body) = post_json(
            test_router(),
            serde_json::json!({"email": "nope", "otp_code": "1234"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation");
    }

    #[tokio::test]
    async fn sixth_request_returns_429_with_wait_time() {
        let router = test_router();
        for _ in 0..5 {
            let (status, _) = post_json(
                router.clone(),
                serde_json::json!({"email": "x@university.edu", "otp_code": "1234"}),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }
        let (status, body) = post_json(
            router,
            serde_json::json!({"email": "x@university.edu", "otp_code": "1234"}),
        )
        .await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["code"], "rate_limited");
        assert!(body["detail"].as_str().unwrap().contains("minutes"));
    }
}
