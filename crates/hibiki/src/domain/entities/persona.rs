//! Persona (声) - Automated chat participant identity
//!
//! Pure domain entity without infrastructure dependencies.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::PersonaKind;

/// Persona - a configured bot with a fixed voice and behavioural rules.
///
/// Seeded once per deployment and read-only at runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Persona {
    pub kind: PersonaKind,
    pub name: String,
    #[serde(default)]
    pub icon_url: Option<String>,
    /// Free-text persona voice, placed first in the system prompt
    pub voice: String,
    /// Free-text behavioural rules, placed last in the system prompt
    pub constraint: String,
}

impl Persona {
    pub fn new(
        kind: PersonaKind,
        name: impl Into<String>,
        voice: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            icon_url: None,
            voice: voice.into(),
            constraint: constraint.into(),
        }
    }

    pub fn with_icon(mut self, icon_url: impl Into<String>) -> Self {
        self.icon_url = Some(icon_url.into());
        self
    }
}

/// A persona bound to the actor identity that stamps its messages in one tenant
#[derive(Debug, Clone, PartialEq)]
pub struct ActivePersona {
    pub persona: Persona,
    pub actor_id: Uuid,
}

impl ActivePersona {
    pub fn kind(&self) -> PersonaKind {
        self.persona.kind
    }

    pub fn name(&self) -> &str {
        &self.persona.name
    }
}

/// Process-wide, read-only persona catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonaCatalog {
    #[serde(rename = "persona", default)]
    personas: Vec<Persona>,
}

impl PersonaCatalog {
    /// Build a catalog, keeping the first persona seen for each kind
    pub fn new(personas: Vec<Persona>) -> Self {
        let mut unique: Vec<Persona> = Vec::with_capacity(personas.len());
        for persona in personas {
            if unique.iter().any(|p| p.kind == persona.kind) {
                tracing::warn!(kind = %persona.kind, name = %persona.name, "Duplicate persona kind ignored");
                continue;
            }
            unique.push(persona);
        }
        Self { personas: unique }
    }

    pub fn get(&self, kind: PersonaKind) -> Option<&Persona> {
        self.personas.iter().find(|p| p.kind == kind)
    }

    /// Case-insensitive lookup by display name
    pub fn find_by_name(&self, name: &str) -> Option<&Persona> {
        let name = name.trim();
        self.personas
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn all(&self) -> &[Persona] {
        &self.personas
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}
