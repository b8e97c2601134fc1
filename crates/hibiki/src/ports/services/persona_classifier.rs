//! Persona Classifier Ports
//!
//! Strategies that judge which persona should answer.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, ConversationMessage, Persona, PersonaKind};

/// Picks the most relevant persona from recent conversation history
#[async_trait]
pub trait HistoryPersonaClassifier: Send + Sync {
    /// `candidates` are the personas that may answer; `None` when no judgement
    async fn select(
        &self,
        candidates: &[Persona],
        history: &[ConversationMessage],
        trigger_text: &str,
    ) -> Result<Option<PersonaKind>, DomainError>;
}

/// Maps trigger text alone to a persona kind
#[async_trait]
pub trait ContentPersonaClassifier: Send + Sync {
    async fn classify(&self, trigger_text: &str) -> Result<PersonaKind, DomainError>;
}
