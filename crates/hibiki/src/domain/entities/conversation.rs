//! ConversationMessage - Labelled history projection
//!
//! Rebuilt per reply from the message store; never persisted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::PersonaKind;

/// A history entry labelled as human or persona
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationMessage {
    pub sender_id: Uuid,
    /// Persona kind when the sender is a persona actor
    pub persona_kind: Option<PersonaKind>,
    pub display_name: String,
    pub text: String,
}

impl ConversationMessage {
    pub fn human(sender_id: Uuid, display_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender_id,
            persona_kind: None,
            display_name: display_name.into(),
            text: text.into(),
        }
    }

    pub fn persona(
        sender_id: Uuid,
        kind: PersonaKind,
        display_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            sender_id,
            persona_kind: Some(kind),
            display_name: display_name.into(),
            text: text.into(),
        }
    }

    pub fn is_persona(&self) -> bool {
        self.persona_kind.is_some()
    }
}
