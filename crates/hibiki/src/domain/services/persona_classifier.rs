//! Built-in persona classifiers
//!
//! - `KeywordContentClassifier`: trigger text only, utility keywords route to
//!   the system persona.
//! - `RecencyHistoryClassifier`: persona addressed by name, else the persona
//!   that spoke last.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, ConversationMessage, Persona, PersonaKind};
use crate::ports::{ContentPersonaClassifier, HistoryPersonaClassifier};

const SYSTEM_KEYWORDS: &[&str] = &[
    "settings",
    "password",
    "invite",
    "permission",
    "billing",
    "account",
    "notification",
    "how to use",
    "login",
    "log in",
    "sign in",
    "bug",
    "error",
];

#[derive(Debug, Clone, Default)]
pub struct KeywordContentClassifier;

impl KeywordContentClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn kind_for(&self, text: &str) -> PersonaKind {
        let lowered = text.to_lowercase();
        if SYSTEM_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            PersonaKind::System
        } else {
            PersonaKind::DefaultChat
        }
    }
}

#[async_trait]
impl ContentPersonaClassifier for KeywordContentClassifier {
    async fn classify(&self, trigger_text: &str) -> Result<PersonaKind, DomainError> {
        Ok(self.kind_for(trigger_text))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecencyHistoryClassifier;

impl RecencyHistoryClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn pick(
        &self,
        candidates: &[Persona],
        history: &[ConversationMessage],
        trigger_text: &str,
    ) -> Option<PersonaKind> {
        let lowered = trigger_text.to_lowercase();
        if let Some(addressed) = candidates
            .iter()
            .find(|p| !p.name.is_empty() && lowered.contains(&p.name.to_lowercase()))
        {
            return Some(addressed.kind);
        }

        history
            .iter()
            .rev()
            .filter_map(|m| m.persona_kind)
            .find(|kind| candidates.iter().any(|p| p.kind == *kind))
    }
}

#[async_trait]
impl HistoryPersonaClassifier for RecencyHistoryClassifier {
    async fn select(
        &self,
        candidates: &[Persona],
        history: &[ConversationMessage],
        trigger_text: &str,
    ) -> Result<Option<PersonaKind>, DomainError> {
        Ok(self.pick(candidates, history, trigger_text))
    }
}
