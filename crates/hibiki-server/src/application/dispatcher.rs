//! Reply Dispatcher
//!
//! Runs orchestrations off the request path, one tokio task per trigger.
//! Retryable failures re-run the whole orchestration from the guard step
//! with doubling backoff; configuration errors are logged once and dropped.
//! Triggers are not deduplicated, so a retry after delivery can post twice.

use std::sync::Arc;

use tokio::task::JoinHandle;
use uuid::Uuid;

use hibiki::{RandomDice, ReplyOutcome, ReplyRequest};

use super::reply::{ReplyError, ReplyOrchestrator};
use crate::config::DispatchConfig;

pub type JobId = Uuid;

#[derive(Clone)]
pub struct ReplyDispatcher {
    orchestrator: Arc<ReplyOrchestrator>,
    config: DispatchConfig,
}

impl ReplyDispatcher {
    pub fn new(orchestrator: Arc<ReplyOrchestrator>, config: DispatchConfig) -> Self {
        Self { orchestrator, config }
    }

    /// Spawn a background reply job
    pub fn enqueue(&self, request: ReplyRequest) -> JobId {
        self.spawn(request).0
    }

    pub fn spawn(&self, request: ReplyRequest) -> (JobId, JoinHandle<Result<ReplyOutcome, ReplyError>>) {
        let job_id = Uuid::new_v4();
        let orchestrator = Arc::clone(&self.orchestrator);
        let config = self.config.clone();

        tracing::info!(
            job_id = %job_id,
            room_id = %request.room_id,
            trigger_message_id = %request.trigger_message_id,
            "Reply job queued"
        );

        let handle = tokio::spawn(async move {
            let result = run_with_retry(&orchestrator, request, &config).await;
            match &result {
                Ok(ReplyOutcome::Replied { message, persona, .. }) => {
                    tracing::info!(job_id = %job_id, message_id = %message.id, persona = %persona, "Reply job finished");
                }
                Ok(ReplyOutcome::Skipped { reason }) => {
                    tracing::info!(job_id = %job_id, reason = %reason, "Reply job skipped");
                }
                Err(e @ ReplyError::Configuration(_)) => {
                    tracing::warn!(job_id = %job_id, error = %e, "Reply job dropped: configuration error");
                }
                Err(e) => {
                    tracing::error!(job_id = %job_id, error = %e, "Reply job failed");
                }
            }
            result
        });

        (job_id, handle)
    }
}

/// Run `request` up to `config.max_attempts` times
pub async fn run_with_retry(
    orchestrator: &ReplyOrchestrator,
    request: ReplyRequest,
    config: &DispatchConfig,
) -> Result<ReplyOutcome, ReplyError> {
    let max_attempts = config.max_attempts.max(1);
    let mut delay = config.retry_base_delay;
    let mut attempt = 1;

    loop {
        let mut dice = RandomDice::from_entropy();
        match orchestrator.handle_with_dice(request, &mut dice).await {
            Ok(outcome) => return Ok(outcome),
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                tracing::warn!(
                    room_id = %request.room_id,
                    attempt,
                    max_attempts,
                    retry_in_ms = delay.as_millis() as u64,
                    error = %e,
                    "Reply attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(config.retry_max_delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
