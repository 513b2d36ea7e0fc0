use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::contract::model::{OtpMetadata, OtpSendRequest, OtpTemplate, RateLimitInfo};

/// Request body for the OTP dispatch endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendOtpEmailReq {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp_code: String,
    #[serde(default)]
    pub template: Option<OtpTemplate>,
    #[serde(default)]
    pub metadata: Option<OtpMetadata>,
}

/// Successful dispatch response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendOtpEmailResp {
    pub success: bool,
    pub message: String,
    pub template: OtpTemplate,
    pub rate_limit_info: RateLimitInfo,
}

impl From<SendOtpEmailReq> for OtpSendRequest {
    fn from(req: SendOtpEmailReq) -> Self {
        Self {
            email: req.email,
            otp_code: req.otp_code,
            template: req.template.unwrap_or_default(),
            metadata: req.metadata.unwrap_or_default(),
        }
    }
}
