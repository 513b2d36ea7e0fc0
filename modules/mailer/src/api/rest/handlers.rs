use axum::{http::StatusCode, response::Json, Extension};
use std::sync::Arc;
use tracing::warn;

use api_core::problem::{self, Problem, ProblemResponse};

use crate::api::rest::dto::{SendOtpEmailReq, SendOtpEmailResp};
use crate::contract::error::MailerError;
use crate::contract::model::OtpSendRequest;
use crate::domain::service::MailerService;

/// Dispatch a formatted OTP email.
#[utoipa::path(
    post,
    path = "/internal/send-otp-email",
    tag = "mailer",
    request_body = SendOtpEmailReq,
    responses(
        (status = 200, description = "OTP email sent", body = SendOtpEmailResp),
        (status = 400, description = "Validation error", body = Problem),
        (status = 429, description = "Rate limit exceeded", body = Problem),
        (status = 502, description = "Delivery failure", body = Problem)
    )
)]
pub async fn send_otp_email(
    Extension(svc): Extension<Arc<MailerService>>,
    Json(req): Json<SendOtpEmailReq>,
) -> Result<Json<SendOtpEmailResp>, ProblemResponse> {
    let send_req: OtpSendRequest = req.into();
    let template = send_req.template;

    match svc.send_otp(&send_req).await {
        Ok(rate_limit_info) => Ok(Json(SendOtpEmailResp {
            success: true,
            message: "OTP email sent successfully".to_string(),
            template,
            rate_limit_info,
        })),
        Err(e) => {
            warn!(error = %e, to = %send_req.email, "OTP dispatch failed");
            Err(map_mailer_error(&e))
        }
    }
}

/// Map mailer errors to problem responses.
pub fn map_mailer_error(error: &MailerError) -> ProblemResponse {
    match error {
        MailerError::MissingFields | MailerError::InvalidEmail { .. } => {
            problem::validation(error.to_string())
        }
        MailerError::RateLimited { seconds_remaining } => {
            problem::rate_limited(error.to_string(), *seconds_remaining)
        }
        MailerError::Transport { .. } => {
            Problem::new(StatusCode::BAD_GATEWAY, "Bad Gateway", error.to_string())
                .with_code("delivery_failed")
                .into()
        }
        MailerError::InvalidConfig { .. } => problem::internal_error(error.to_string()),
    }
}
