pub mod error;
pub mod model;

use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::Role;

/// Companion-profile creation, implemented by whichever module owns the
/// profiles table. Failures here are non-fatal to the signup flow.
#[async_trait]
pub trait ProfileRegistrar: Send + Sync {
    async fn create_profile(&self, account_id: Uuid, email: &str, role: Role)
        -> anyhow::Result<()>;
}
