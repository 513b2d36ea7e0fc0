use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Which formatted email to send.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OtpTemplate {
    #[default]
    Verification,
    ResetPassword,
    Login,
}

/// Substitutions available to templates. Unset fields fall back to the
/// mailer's configured defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct OtpMetadata {
    pub app_name: Option<String>,
    pub user_name: Option<String>,
    pub expiry_minutes: Option<u32>,
    pub support_email: Option<String>,
}

/// A request to deliver an OTP email.
#[derive(Debug, Clone)]
pub struct OtpSendRequest {
    pub email: String,
    pub otp_code: String,
    pub template: OtpTemplate,
    pub metadata: OtpMetadata,
}

/// Remaining budget under the per-email rate limit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct RateLimitInfo {
    pub remaining_attempts: u32,
    pub window_ms: u64,
}
