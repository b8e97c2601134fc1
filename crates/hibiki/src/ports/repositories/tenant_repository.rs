//! Tenant Repository Port
//!
//! Abstract interface for per-tenant bot configuration.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, BotSettings};

/// Repository interface for tenant bot settings
#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Bot settings for an organization, `None` when never configured
    async fn find_bot_settings(&self, organization_id: Uuid)
        -> Result<Option<BotSettings>, DomainError>;
}
