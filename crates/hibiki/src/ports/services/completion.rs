//! Completion Service Port
//!
//! Abstract interface for the generative-AI backend. The orchestrator
//! treats it as an opaque text-completion service; a client is created
//! per tenant from the tenant's own credentials.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{errors::DomainError, Vendor};

/// Role of a turn in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A turn handed to the completion service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Options for completion calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionOptions {
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Temperature (0.0 - 2.0)
    pub temperature: Option<f32>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            temperature: Some(0.8),
        }
    }
}

/// A configured completion client
///
/// # Example
///
/// ```rust,ignore
/// use hibiki::ports::CompletionClient;
///
/// struct AnthropicClient { /* ... */ }
///
/// #[async_trait]
/// impl CompletionClient for AnthropicClient {
///     async fn generate(&self, turns: &[ChatMessage], system_prompt: Option<&str>)
///         -> Result<String, DomainError> {
///         // Call Claude API
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate one reply. Single call, no retries.
    async fn generate(
        &self,
        turns: &[ChatMessage],
        system_prompt: Option<&str>,
    ) -> Result<String, DomainError>;

    /// Get the vendor name (e.g., "anthropic", "openai", "google")
    fn vendor(&self) -> Vendor;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}

/// Builds completion clients from tenant credentials
pub trait CompletionClientFactory: Send + Sync {
    /// `None` when the vendor/key combination cannot produce a client
    fn create_client(
        &self,
        vendor: Vendor,
        api_key: &str,
        model: &str,
    ) -> Option<Arc<dyn CompletionClient>>;
}
