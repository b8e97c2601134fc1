//! Persona Selector
//!
//! Picks the persona that answers a trigger message, trying strategies in
//! order until one yields a persona with a live actor in the tenant:
//!
//! 1. forced wild persona (decided by the caller, see [`PersonaSelector::wild`])
//! 2. coin flip between a uniform-random active persona and the history
//!    classifier
//! 3. content classifier on the trigger text
//! 4. hard fallback to the default chat persona
//!
//! Collaborator failures in 2 and 3 degrade to the next strategy. Only the
//! hard fallback can fail the run.

use std::sync::Arc;

use uuid::Uuid;

use hibiki::domain::{coin_flip, pick};
use hibiki::{
    ActivePersona, ContentPersonaClassifier, Dice, DomainError, HistoryPersonaClassifier,
    MessageStore, Persona, PersonaCatalog, PersonaKind,
};

use super::error::ReplyError;
use super::history::RecentHistory;
use crate::config::OrchestratorConfig;

/// Strategy that produced the selected persona
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStrategy {
    Wild,
    Random,
    History,
    Content,
    Fallback,
}

impl std::fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SelectionStrategy::Wild => "wild",
            SelectionStrategy::Random => "random",
            SelectionStrategy::History => "history",
            SelectionStrategy::Content => "content",
            SelectionStrategy::Fallback => "fallback",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone)]
pub struct Selection {
    pub persona: ActivePersona,
    pub strategy: SelectionStrategy,
}

pub struct PersonaSelector {
    store: Arc<dyn MessageStore>,
    personas: Arc<PersonaCatalog>,
    history_classifier: Option<Arc<dyn HistoryPersonaClassifier>>,
    content_classifier: Option<Arc<dyn ContentPersonaClassifier>>,
    config: OrchestratorConfig,
}

impl PersonaSelector {
    pub fn new(
        store: Arc<dyn MessageStore>,
        personas: Arc<PersonaCatalog>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            store,
            personas,
            history_classifier: None,
            content_classifier: None,
            config,
        }
    }

    pub fn with_history_classifier(mut self, classifier: Arc<dyn HistoryPersonaClassifier>) -> Self {
        self.history_classifier = Some(classifier);
        self
    }

    pub fn with_content_classifier(mut self, classifier: Arc<dyn ContentPersonaClassifier>) -> Self {
        self.content_classifier = Some(classifier);
        self
    }

    /// Catalog entry of `kind` bound to its actor in the tenant, if any
    pub async fn resolve(
        &self,
        kind: PersonaKind,
        organization_id: Uuid,
    ) -> Result<Option<ActivePersona>, DomainError> {
        let Some(persona) = self.personas.get(kind) else {
            return Ok(None);
        };
        let actor_id = self.store.resolve_persona_actor(kind, organization_id).await?;

        Ok(actor_id.map(|actor_id| ActivePersona {
            persona: persona.clone(),
            actor_id,
        }))
    }

    /// The wild persona, if the tenant has an actor for it
    pub async fn wild(&self, organization_id: Uuid) -> Option<ActivePersona> {
        self.resolve_or_warn(PersonaKind::Wild, organization_id).await
    }

    /// Strategies 2-4
    pub async fn select(
        &self,
        organization_id: Uuid,
        room_id: Uuid,
        trigger_text: &str,
        dice: &mut dyn Dice,
    ) -> Result<Selection, ReplyError> {
        let first = if coin_flip(dice) {
            self.random(organization_id, dice)
                .await
                .map(|persona| (persona, SelectionStrategy::Random))
        } else {
            self.by_history(organization_id, room_id, trigger_text)
                .await
                .map(|persona| (persona, SelectionStrategy::History))
        };

        let chosen = match first {
            Some(found) => Some(found),
            None => self
                .by_content(organization_id, trigger_text)
                .await
                .map(|persona| (persona, SelectionStrategy::Content)),
        };

        if let Some((persona, strategy)) = chosen {
            return Ok(Selection { persona, strategy });
        }

        match self.resolve(PersonaKind::DefaultChat, organization_id).await? {
            Some(persona) => Ok(Selection {
                persona,
                strategy: SelectionStrategy::Fallback,
            }),
            None => Err(ReplyError::Configuration(format!(
                "No actor for the {} persona in organization {}",
                PersonaKind::DefaultChat,
                organization_id
            ))),
        }
    }

    fn candidates(&self) -> Vec<Persona> {
        self.personas
            .all()
            .iter()
            .filter(|p| p.kind != PersonaKind::Wild)
            .cloned()
            .collect()
    }

    async fn random(&self, organization_id: Uuid, dice: &mut dyn Dice) -> Option<ActivePersona> {
        let mut active = Vec::new();
        for persona in self.candidates() {
            if let Some(found) = self.resolve_or_warn(persona.kind, organization_id).await {
                active.push(found);
            }
        }
        pick(dice, &active).cloned()
    }

    async fn by_history(
        &self,
        organization_id: Uuid,
        room_id: Uuid,
        trigger_text: &str,
    ) -> Option<ActivePersona> {
        let classifier = self.history_classifier.as_ref()?;

        let history = match RecentHistory::rebuild(
            self.store.as_ref(),
            room_id,
            self.config.history_window,
            self.config.history_limit,
        )
        .await
        {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(room_id = %room_id, error = %e, "History unavailable for persona selection");
                return None;
            }
        };

        let kind = match classifier
            .select(&self.candidates(), history.entries(), trigger_text)
            .await
        {
            Ok(Some(kind)) => kind,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(room_id = %room_id, error = %e, "History classifier failed");
                return None;
            }
        };

        self.resolve_or_warn(kind, organization_id).await
    }

    async fn by_content(&self, organization_id: Uuid, trigger_text: &str) -> Option<ActivePersona> {
        let classifier = self.content_classifier.as_ref()?;

        match classifier.classify(trigger_text).await {
            Ok(kind) => self.resolve_or_warn(kind, organization_id).await,
            Err(e) => {
                tracing::warn!(error = %e, "Content classifier failed");
                None
            }
        }
    }

    async fn resolve_or_warn(&self, kind: PersonaKind, organization_id: Uuid) -> Option<ActivePersona> {
        match self.resolve(kind, organization_id).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(persona = %kind, organization_id = %organization_id, error = %e, "Persona actor lookup failed");
                None
            }
        }
    }
}
