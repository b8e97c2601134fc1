//! Labelled conversation history
//!
//! Recent room messages annotated with the sender's display name and, for
//! persona actors, their persona kind.

use std::collections::HashMap;

use chrono::{TimeDelta, Utc};
use uuid::Uuid;

use hibiki::{ConversationMessage, DomainError, MessageStore, PersonaKind};

const UNKNOWN_SENDER: &str = "Unknown";

#[derive(Debug, Clone, Default)]
pub struct RecentHistory {
    entries: Vec<ConversationMessage>,
    message_ids: Vec<Uuid>,
}

impl RecentHistory {
    /// Rebuild the last `limit` messages posted within `window`, oldest first.
    pub async fn rebuild(
        store: &dyn MessageStore,
        room_id: Uuid,
        window: TimeDelta,
        limit: usize,
    ) -> Result<Self, DomainError> {
        let since = Utc::now() - window;
        let messages = store.list_recent_messages(room_id, since, limit).await?;

        let mut senders: HashMap<Uuid, (String, Option<PersonaKind>)> = HashMap::new();
        let mut history = Self {
            entries: Vec::with_capacity(messages.len()),
            message_ids: Vec::with_capacity(messages.len()),
        };

        for message in messages {
            if !senders.contains_key(&message.actor_id) {
                let name = store
                    .get_actor_display_name(message.actor_id)
                    .await?
                    .unwrap_or_else(|| UNKNOWN_SENDER.to_string());
                let kind = store.persona_kind_of_actor(message.actor_id).await?;
                senders.insert(message.actor_id, (name, kind));
            }
            let Some((name, kind)) = senders.get(&message.actor_id) else {
                continue;
            };

            let entry = match kind {
                Some(kind) => ConversationMessage::persona(message.actor_id, *kind, name.clone(), message.text),
                None => ConversationMessage::human(message.actor_id, name.clone(), message.text),
            };
            history.entries.push(entry);
            history.message_ids.push(message.id);
        }

        tracing::debug!(room_id = %room_id, messages = history.entries.len(), "Rebuilt history");
        Ok(history)
    }

    pub fn entries(&self) -> &[ConversationMessage] {
        &self.entries
    }

    pub fn contains_message(&self, message_id: Uuid) -> bool {
        self.message_ids.contains(&message_id)
    }
}
