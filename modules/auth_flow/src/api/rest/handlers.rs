use axum::{http::StatusCode, response::Json, Extension};
use std::sync::Arc;
use tracing::warn;

use api_core::problem::{self, Problem, ProblemResponse};

use crate::api::rest::dto::{
    AccountDto, LoginReq, RegisterReq, RegistrationPendingDto, ResendDto, ResendReq, VerifyReq,
};
use crate::contract::error::AuthFlowError;
use crate::domain::service::AuthFlowService;

/// Begin signup: email a verification code and retain the registration.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterReq,
    responses(
        (status = 202, description = "Code dispatched, verification pending", body = RegistrationPendingDto),
        (status = 400, description = "Validation error", body = Problem),
        (status = 409, description = "Account already exists", body = Problem),
        (status = 429, description = "Rate limit exceeded", body = Problem),
        (status = 502, description = "Delivery failure", body = Problem)
    )
)]
pub async fn register(
    Extension(svc): Extension<Arc<AuthFlowService>>,
    Json(req): Json<RegisterReq>,
) -> Result<(StatusCode, Json<RegistrationPendingDto>), ProblemResponse> {
    match svc
        .start_registration(&req.email, &req.password, req.role)
        .await
    {
        Ok(receipt) => Ok((StatusCode::ACCEPTED, Json(receipt.into()))),
        Err(e) => {
            warn!(email = %req.email, error = %e, "registration start failed");
            Err(map_auth_error(&e))
        }
    }
}

/// Re-dispatch a verification code; silently ignored during cooldown.
#[utoipa::path(
    post,
    path = "/auth/register/resend",
    tag = "auth",
    request_body = ResendReq,
    responses(
        (status = 200, description = "Resend outcome", body = ResendDto),
        (status = 400, description = "No pending registration", body = Problem),
        (status = 410, description = "Code expired", body = Problem),
        (status = 429, description = "Rate limit exceeded", body = Problem),
        (status = 502, description = "Delivery failure", body = Problem)
    )
)]
pub async fn resend(
    Extension(svc): Extension<Arc<AuthFlowService>>,
    Json(req): Json<ResendReq>,
) -> Result<Json<ResendDto>, ProblemResponse> {
    match svc.resend_code(&req.email).await {
        Ok(outcome) => Ok(Json(outcome.into())),
        Err(e) => {
            warn!(email = %req.email, error = %e, "resend failed");
            Err(map_auth_error(&e))
        }
    }
}

/// Verify the entered code and create the account in one operation.
#[utoipa::path(
    post,
    path = "/auth/register/verify",
    tag = "auth",
    request_body = VerifyReq,
    responses(
        (status = 201, description = "Account created", body = AccountDto),
        (status = 400, description = "No pending registration", body = Problem),
        (status = 409, description = "Account already exists", body = Problem),
        (status = 410, description = "Code expired", body = Problem),
        (status = 422, description = "Verification mismatch", body = Problem)
    )
)]
pub async fn verify(
    Extension(svc): Extension<Arc<AuthFlowService>>,
    Json(req): Json<VerifyReq>,
) -> Result<(StatusCode, Json<AccountDto>), ProblemResponse> {
    match svc.verify_and_create(&req.email, &req.code).await {
        Ok(account) => Ok((StatusCode::CREATED, Json(account.into()))),
        Err(e) => {
            warn!(email = %req.email, error = %e, "verification failed");
            Err(map_auth_error(&e))
        }
    }
}

/// Password sign-in.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Signed in", body = AccountDto),
        (status = 401, description = "Invalid credentials", body = Problem)
    )
)]
pub async fn login(
    Extension(svc): Extension<Arc<AuthFlowService>>,
    Json(req): Json<LoginReq>,
) -> Result<Json<AccountDto>, ProblemResponse> {
    match svc.login(&req.email, &req.password).await {
        Ok(account) => Ok(Json(account.into())),
        Err(e) => Err(map_auth_error(&e)),
    }
}

/// Map signup-flow errors onto problem responses. Each error kind has a
/// stable `code`; clients branch on it, never on text.
pub fn map_auth_error(error: &AuthFlowError) -> ProblemResponse {
    match error {
        AuthFlowError::MissingFields
        | AuthFlowError::WeakPassword { .. }
        | AuthFlowError::DomainNotAllowed { .. }
        | AuthFlowError::UnknownPending { .. } => problem::validation(error.to_string()),
        AuthFlowError::RateLimited { seconds_remaining } => {
            problem::rate_limited(error.to_string(), *seconds_remaining)
        }
        AuthFlowError::Delivery { .. } => {
            Problem::new(StatusCode::BAD_GATEWAY, "Bad Gateway", error.to_string())
                .with_code("delivery_failed")
                .into()
        }
        AuthFlowError::CodeMismatch => Problem::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Unprocessable Entity",
            error.to_string(),
        )
        .with_code("code_mismatch")
        .into(),
        AuthFlowError::CodeExpired => {
            Problem::new(StatusCode::GONE, "Gone", error.to_string())
                .with_code("code_expired")
                .into()
        }
        AuthFlowError::AccountExists { .. } => {
            problem::conflict("account_exists", error.to_string())
        }
        AuthFlowError::InvalidCredentials => Problem::new(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            error.to_string(),
        )
        .with_code("invalid_credentials")
        .into(),
        AuthFlowError::Internal { .. } => problem::internal_error("Internal error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_distinct_codes() {
        let cases = [
            (
                map_auth_error(&AuthFlowError::CodeMismatch),
                422,
                "code_mismatch",
            ),
            (map_auth_error(&AuthFlowError::CodeExpired), 410, "code_expired"),
            (
                map_auth_error(&AuthFlowError::account_exists("a@b.edu")),
                409,
                "account_exists",
            ),
            (
                map_auth_error(&AuthFlowError::RateLimited {
                    seconds_remaining: 90,
                }),
                429,
                "rate_limited",
            ),
            (
                map_auth_error(&AuthFlowError::delivery("smtp down")),
                502,
                "delivery_failed",
            ),
            (
                map_auth_error(&AuthFlowError::InvalidCredentials),
                401,
                "invalid_credentials",
            ),
            (
                map_auth_error(&AuthFlowError::domain_not_allowed("x@y.z")),
                400,
                "validation",
            ),
        ];
        for (resp, status, code) in cases {
            assert_eq!(resp.0.status, status);
            assert_eq!(resp.0.code, code);
        }
    }

    #[test]
    fn internal_errors_never_leak_details() {
        let resp = map_auth_error(&AuthFlowError::internal("db path /secret/file"));
        assert_eq!(resp.0.status, 500);
        assert!(!resp.0.detail.contains("/secret/file"));
    }
}
