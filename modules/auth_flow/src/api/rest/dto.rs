use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::{Account, Role};
use crate::domain::service::{RegistrationReceipt, ResendOutcome};

/// Request to begin signup: dispatches a verification code.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterReq {
    pub email: String,
    pub password: String,
    /// Requested role; reserved email domains override it.
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Student
}

/// Code dispatched; verification pending.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegistrationPendingDto {
    pub email: String,
    pub expires_in_minutes: i64,
    pub resend_cooldown_secs: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResendReq {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResendDto {
    /// False when the cooldown guard ignored the request.
    pub sent: bool,
    pub seconds_remaining: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyReq {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

/// Public account representation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountDto {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub email_domain: String,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountDto {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            email: a.email,
            role: a.role,
            email_domain: a.email_domain,
            created_at: a.created_at,
        }
    }
}

impl From<RegistrationReceipt> for RegistrationPendingDto {
    fn from(r: RegistrationReceipt) -> Self {
        Self {
            email: r.email,
            expires_in_minutes: r.expires_in_minutes,
            resend_cooldown_secs: r.resend_cooldown_secs,
        }
    }
}

impl From<ResendOutcome> for ResendDto {
    fn from(o: ResendOutcome) -> Self {
        Self {
            sent: o.sent,
            seconds_remaining: o.seconds_remaining,
        }
    }
}
