use axum::{routing::post, Extension, Router};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::api::rest::handlers;
use crate::domain::service::AuthFlowService;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::register,
        handlers::resend,
        handlers::verify,
        handlers::login
    ),
    components(schemas(
        crate::api::rest::dto::RegisterReq,
        crate::api::rest::dto::RegistrationPendingDto,
        crate::api::rest::dto::ResendReq,
        crate::api::rest::dto::ResendDto,
        crate::api::rest::dto::VerifyReq,
        crate::api::rest::dto::LoginReq,
        crate::api::rest::dto::AccountDto,
        crate::contract::model::Role,
        api_core::problem::Problem
    ))
)]
struct AuthFlowApi;

/// OpenAPI fragment for this module, merged by the server.
pub fn openapi() -> utoipa::openapi::OpenApi {
    AuthFlowApi::openapi()
}

pub fn router(service: Arc<AuthFlowService>) -> Router {
    Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/register/resend", post(handlers::resend))
        .route("/auth/register/verify", post(handlers::verify))
        .route("/auth/login", post(handlers::login))
        .layer(Extension(service))
}
