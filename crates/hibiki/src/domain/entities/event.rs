//! Realtime notification events
//!
//! Payloads published to room subscribers and tenant-wide groups.
//! Delivery is fire-and-forget.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Message;

/// Client-side timeout after which a "typing" indicator clears itself
pub const TYPING_TIMEOUT_SECS: u64 = 60;

/// Text shown in the room when a reply could not be generated
pub const REPLY_FAILED_NOTICE: &str = "Could not generate a reply, please retry.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    ReadReceipt {
        actor_id: Uuid,
        message_id: Uuid,
        read_at: DateTime<Utc>,
    },
    TypingStarted {
        actor_id: Uuid,
        timeout_secs: u64,
    },
    TypingStopped {
        actor_id: Uuid,
    },
    MessageReceived {
        message: Message,
    },
    UnreadCount {
        room_id: Uuid,
        last_message_at: DateTime<Utc>,
    },
    ReplyFailed {
        actor_id: Uuid,
        notice: String,
    },
}

impl NotificationEvent {
    /// Event type name used by the realtime transport
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ReadReceipt { .. } => "read_receipt",
            Self::TypingStarted { .. } => "typing_started",
            Self::TypingStopped { .. } => "typing_stopped",
            Self::MessageReceived { .. } => "message_received",
            Self::UnreadCount { .. } => "unread_count",
            Self::ReplyFailed { .. } => "reply_failed",
        }
    }
}
