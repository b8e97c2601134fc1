//! Reply - Orchestration request and outcome

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Message;
use crate::domain::value_objects::PersonaKind;

/// One reply attempt for one trigger message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplyRequest {
    pub organization_id: Uuid,
    pub room_id: Uuid,
    pub trigger_message_id: Uuid,
    pub sender_id: Uuid,
}

/// Why a run ended without replying
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    BotDisabled,
    MissingCredentials,
    ClientUnavailable,
    RoomNotFound,
    TriggerNotFound,
    SenderUnresolved,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            SkipReason::BotDisabled => "bot disabled for tenant",
            SkipReason::MissingCredentials => "no completion credentials",
            SkipReason::ClientUnavailable => "completion client unavailable",
            SkipReason::RoomNotFound => "room not found",
            SkipReason::TriggerNotFound => "trigger message not found",
            SkipReason::SenderUnresolved => "sender could not be resolved",
        };
        write!(f, "{}", reason)
    }
}

/// Result of a finished orchestration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReplyOutcome {
    Skipped {
        reason: SkipReason,
    },
    Replied {
        message: Message,
        persona: PersonaKind,
        wild: bool,
        role: Option<String>,
    },
}

impl ReplyOutcome {
    pub fn skipped(reason: SkipReason) -> Self {
        Self::Skipped { reason }
    }

    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::Replied { message, .. } => Some(message),
            Self::Skipped { .. } => None,
        }
    }
}
