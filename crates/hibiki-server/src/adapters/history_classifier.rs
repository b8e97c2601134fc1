//! LLM History Classifier
//!
//! Asks a platform-level completion client which persona should answer,
//! given the labelled recent history. Deployed when `CLASSIFIER_API_KEY`
//! is configured; otherwise the recency heuristic is used.

use std::sync::Arc;

use async_trait::async_trait;

use hibiki::{
    ChatMessage, CompletionClient, ConversationMessage, DomainError, HistoryPersonaClassifier,
    Persona, PersonaKind,
};

const NO_PERSONA: &str = "NONE";

const CLASSIFIER_PROMPT: &str = "You route chat messages to the persona best suited to answer. \
Reply with the persona's name only, or NONE if no persona fits.";

pub struct LlmHistoryClassifier {
    client: Arc<dyn CompletionClient>,
}

impl LlmHistoryClassifier {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }
}

fn build_request(candidates: &[Persona], history: &[ConversationMessage], trigger_text: &str) -> String {
    let mut request = String::from("Personas:\n");
    for persona in candidates {
        let summary = persona.voice.lines().next().unwrap_or("").trim();
        request.push_str(&format!("- {} ({}): {}\n", persona.name, persona.kind, summary));
    }

    request.push_str("\nRecent conversation:\n");
    for entry in history {
        request.push_str(&format!("{}: {}\n", entry.display_name, entry.text));
    }

    request.push_str(&format!("\nNew message: {}\n\nWho should answer?", trigger_text));
    request
}

/// Persona named in the classifier's answer, if any
fn parse_answer(candidates: &[Persona], answer: &str) -> Option<PersonaKind> {
    let cleaned = answer
        .trim()
        .trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace());
    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case(NO_PERSONA) {
        return None;
    }

    if let Some(exact) = candidates.iter().find(|p| p.name.eq_ignore_ascii_case(cleaned)) {
        return Some(exact.kind);
    }

    let lowered = cleaned.to_lowercase();
    candidates
        .iter()
        .find(|p| !p.name.is_empty() && lowered.contains(&p.name.to_lowercase()))
        .map(|p| p.kind)
}

#[async_trait]
impl HistoryPersonaClassifier for LlmHistoryClassifier {
    async fn select(
        &self,
        candidates: &[Persona],
        history: &[ConversationMessage],
        trigger_text: &str,
    ) -> Result<Option<PersonaKind>, DomainError> {
        if candidates.is_empty() {
            return Ok(None);
        }

        let turns = [ChatMessage::user(build_request(candidates, history, trigger_text))];
        let answer = self.client.generate(&turns, Some(CLASSIFIER_PROMPT)).await?;
        let kind = parse_answer(candidates, &answer);

        tracing::debug!(answer = %answer.trim(), persona = ?kind, "History classifier answered");
        Ok(kind)
    }
}
