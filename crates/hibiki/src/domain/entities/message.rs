//! Message / Room - Projections of the chat store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted chat message. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: Uuid,
    pub room_id: Uuid,
    /// Actor (human user or persona actor) that authored the message
    pub actor_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(room_id: Uuid, actor_id: Uuid, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_id,
            actor_id,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// A chat room owned by one tenant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    pub fn new(organization_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            organization_id,
            name: name.into(),
            updated_at: Utc::now(),
        }
    }
}
