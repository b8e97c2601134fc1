//! Message Store Port
//!
//! Abstract interface over persisted chat rooms and messages.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{errors::DomainError, Message, PersonaKind, Room};

/// Repository interface for rooms, messages and actor identities
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Find a message by ID
    async fn get_message(&self, id: Uuid) -> Result<Option<Message>, DomainError>;

    /// Messages in a room created at or after `since`, oldest first, at most `limit`.
    ///
    /// When more than `limit` messages match, the most recent ones are returned.
    async fn list_recent_messages(
        &self,
        room_id: Uuid,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Message>, DomainError>;

    /// Append a message to a room's log
    async fn append_message(
        &self,
        room_id: Uuid,
        actor_id: Uuid,
        text: &str,
    ) -> Result<Message, DomainError>;

    /// Find a room by ID
    async fn get_room(&self, id: Uuid) -> Result<Option<Room>, DomainError>;

    /// Bump the room's `updated_at` (last write wins)
    async fn touch_room_updated_at(&self, id: Uuid) -> Result<(), DomainError>;

    /// Display name of a human or persona actor
    async fn get_actor_display_name(&self, actor_id: Uuid) -> Result<Option<String>, DomainError>;

    /// Actor that stamps messages for a persona kind in a tenant
    async fn resolve_persona_actor(
        &self,
        kind: PersonaKind,
        organization_id: Uuid,
    ) -> Result<Option<Uuid>, DomainError>;

    /// Persona kind behind an actor, if the actor is a persona
    async fn persona_kind_of_actor(&self, actor_id: Uuid) -> Result<Option<PersonaKind>, DomainError>;

    /// Persist an actor's read watermark for a room
    async fn mark_read(
        &self,
        room_id: Uuid,
        actor_id: Uuid,
        read_at: DateTime<Utc>,
    ) -> Result<(), DomainError>;
}
