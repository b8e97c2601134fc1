//! BotSettings - Per-tenant persona enablement and credentials

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::Vendor;

/// Tenant-level switch and credentials for automated replies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotSettings {
    pub organization_id: Uuid,
    pub enabled: bool,
    pub vendor: Vendor,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl BotSettings {
    /// API key if the tenant configured a non-blank one
    pub fn credentials(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn model_or_default(&self) -> &str {
        self.model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.vendor.default_model())
    }
}
