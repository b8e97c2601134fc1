//! Vendor - Completion service vendors

use serde::{Deserialize, Serialize};

/// Generative-AI vendor backing a tenant's completion client
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Anthropic,
    OpenAI,
    Google,
}

impl Vendor {
    /// Model used when a tenant configures a vendor without a model
    pub fn default_model(&self) -> &'static str {
        match self {
            Vendor::Anthropic => "claude-3-5-haiku-latest",
            Vendor::OpenAI => "gpt-4o-mini",
            Vendor::Google => "gemini-2.0-flash",
        }
    }
}

impl std::fmt::Display for Vendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Vendor::Anthropic => write!(f, "anthropic"),
            Vendor::OpenAI => write!(f, "openai"),
            Vendor::Google => write!(f, "google"),
        }
    }
}

impl std::str::FromStr for Vendor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(Vendor::Anthropic),
            "openai" => Ok(Vendor::OpenAI),
            "google" | "gemini" => Ok(Vendor::Google),
            _ => Err(format!("Unknown vendor: {}", s)),
        }
    }
}
