//! Reply Generator

use hibiki::{CompletionClient, DomainError};

use super::context::ReplyPlan;

/// Posted when the completion service answers with nothing
pub const EMPTY_REPLY_PLACEHOLDER: &str = "...";

/// Single completion call for `plan`. No retries here; the dispatcher
/// re-runs the whole orchestration instead.
pub async fn generate_reply(client: &dyn CompletionClient, plan: &ReplyPlan) -> Result<String, DomainError> {
    tracing::debug!(
        vendor = %client.vendor(),
        model = client.model_id(),
        turns = plan.turns.len(),
        "Requesting completion"
    );

    let text = client.generate(&plan.turns, plan.system_prompt.as_deref()).await?;
    let text = text.trim();

    if text.is_empty() {
        tracing::warn!(vendor = %client.vendor(), "Completion returned no text");
        return Ok(EMPTY_REPLY_PLACEHOLDER.to_string());
    }

    Ok(text.to_string())
}
