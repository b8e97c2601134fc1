//! Persona catalog DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use hibiki::Persona;

/// Persona catalog entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PersonaResponse {
    /// `default_chat`, `system` or `wild`
    pub kind: String,
    pub name: String,
    pub icon_url: Option<String>,
    pub voice: String,
    pub constraint: String,
}

impl From<&Persona> for PersonaResponse {
    fn from(persona: &Persona) -> Self {
        Self {
            kind: persona.kind.to_string(),
            name: persona.name.clone(),
            icon_url: persona.icon_url.clone(),
            voice: persona.voice.clone(),
            constraint: persona.constraint.clone(),
        }
    }
}
