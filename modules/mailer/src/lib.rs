//! Outbound email module: OTP templates, per-email rate limiting, and the
//! transport used to deliver formatted mail.

pub mod api;
pub mod config;
pub mod contract;
pub mod domain;
pub mod infra;

pub use config::{MailerConfig, MailerProviderConfig};
pub use contract::error::MailerError;
pub use contract::model::{OtpMetadata, OtpSendRequest, OtpTemplate, RateLimitInfo};
pub use domain::service::MailerService;
