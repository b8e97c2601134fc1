//! Reply job DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use hibiki::{ReplyOutcome, ReplyRequest, SkipReason};

/// Ask a persona to answer a human message
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct ReplyJobRequest {
    pub organization_id: Uuid,
    pub room_id: Uuid,
    pub trigger_message_id: Uuid,
    /// Human actor who posted the trigger message
    pub sender_id: Uuid,
}

impl From<ReplyJobRequest> for ReplyRequest {
    fn from(req: ReplyJobRequest) -> Self {
        Self {
            organization_id: req.organization_id,
            room_id: req.room_id,
            trigger_message_id: req.trigger_message_id,
            sender_id: req.sender_id,
        }
    }
}

/// Accepted reply job
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReplyJobResponse {
    pub job_id: Uuid,
}

/// Outcome of an inline reply run
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReplyRunResponse {
    /// `replied` or `skipped`
    pub status: String,
    /// Skip reason, when skipped
    pub reason: Option<String>,
    pub message: Option<ReplyMessage>,
    /// Persona kind that answered
    pub persona: Option<String>,
    pub wild: bool,
    pub role: Option<String>,
}

/// Persisted persona reply
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReplyMessage {
    pub id: Uuid,
    pub room_id: Uuid,
    pub actor_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<ReplyOutcome> for ReplyRunResponse {
    fn from(outcome: ReplyOutcome) -> Self {
        match outcome {
            ReplyOutcome::Skipped { reason } => Self {
                status: "skipped".to_string(),
                reason: Some(skip_code(reason).to_string()),
                message: None,
                persona: None,
                wild: false,
                role: None,
            },
            ReplyOutcome::Replied {
                message,
                persona,
                wild,
                role,
            } => Self {
                status: "replied".to_string(),
                reason: None,
                message: Some(ReplyMessage {
                    id: message.id,
                    room_id: message.room_id,
                    actor_id: message.actor_id,
                    text: message.text,
                    created_at: message.created_at,
                }),
                persona: Some(persona.to_string()),
                wild,
                role,
            },
        }
    }
}

fn skip_code(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::BotDisabled => "bot_disabled",
        SkipReason::MissingCredentials => "missing_credentials",
        SkipReason::ClientUnavailable => "client_unavailable",
        SkipReason::RoomNotFound => "room_not_found",
        SkipReason::TriggerNotFound => "trigger_not_found",
        SkipReason::SenderUnresolved => "sender_unresolved",
    }
}
