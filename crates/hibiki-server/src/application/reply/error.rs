//! Reply orchestration errors

use thiserror::Error;

use hibiki::DomainError;

/// Failure of one orchestration run
///
/// Skip conditions (bot disabled, unknown room, ...) are not errors; they
/// come back as [`hibiki::ReplyOutcome::Skipped`].
#[derive(Debug, Error)]
pub enum ReplyError {
    /// Deployment is broken (e.g. no actor for the default persona)
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Store error: {0}")]
    Store(#[source] DomainError),

    /// Completion failed after the typing indicator was shown
    #[error("Generation failed: {0}")]
    Generation(#[source] DomainError),
}

impl ReplyError {
    /// Whether re-running the orchestration from the start may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            ReplyError::Configuration(_) => false,
            ReplyError::Store(e) | ReplyError::Generation(e) => e.is_transient(),
        }
    }
}

impl From<DomainError> for ReplyError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Configuration(msg) => ReplyError::Configuration(msg),
            other => ReplyError::Store(other),
        }
    }
}
