use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use auth_flow::{ProfileRegistrar, Role};

use crate::domain::service::CommunityService;

/// Bridges the signup flow to this module: after a verified signup the auth
/// module asks for a companion profile through this adapter.
pub struct CommunityProfileRegistrar {
    service: Arc<CommunityService>,
}

impl CommunityProfileRegistrar {
    pub fn new(service: Arc<CommunityService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ProfileRegistrar for CommunityProfileRegistrar {
    async fn create_profile(
        &self,
        account_id: Uuid,
        email: &str,
        role: Role,
    ) -> anyhow::Result<()> {
        self.service
            .create_profile(account_id, email, role)
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!(e))
    }
}
