//! PersonaKind - The closed set of persona categories

use serde::{Deserialize, Serialize};

/// Persona category. Every tenant sees at most one persona per kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PersonaKind {
    /// General conversation partner, also the hard fallback
    #[default]
    DefaultChat,
    /// Utility persona for operational questions
    System,
    /// Unfiltered persona answering garbled input
    Wild,
}

impl PersonaKind {
    pub const ALL: [PersonaKind; 3] = [PersonaKind::DefaultChat, PersonaKind::System, PersonaKind::Wild];
}

impl std::fmt::Display for PersonaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersonaKind::DefaultChat => write!(f, "default_chat"),
            PersonaKind::System => write!(f, "system"),
            PersonaKind::Wild => write!(f, "wild"),
        }
    }
}

impl std::str::FromStr for PersonaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "default_chat" | "default" | "chat" => Ok(PersonaKind::DefaultChat),
            "system" | "utility" => Ok(PersonaKind::System),
            "wild" | "unfiltered" => Ok(PersonaKind::Wild),
            _ => Err(format!("Unknown persona kind: {}", s)),
        }
    }
}
