//! Tool Executor Port
//!
//! Runs capability tools that contribute context and role suggestions.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, ToolContext, ToolExecutionResult};

#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Run up to `max_tools` tools whose relevance exceeds `min_relevance_score`
    async fn execute(
        &self,
        context: &ToolContext,
        max_tools: usize,
        min_relevance_score: u8,
    ) -> Result<ToolExecutionResult, DomainError>;

    /// Fails when the executor cannot run tools at all, before any message
    /// is analyzed. In-process executors are always ready.
    async fn check_ready(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
