//! Prompt composition
//!
//! Builds the turn list and system prompt handed to the completion
//! service. Three turn layouts exist:
//!
//! - **context**: addressed-user line, merged tool context, trigger message
//! - **plain**: the trigger message alone
//! - **history**: addressed-user line followed by labelled recent history
//!
//! Wild replies use the plain layout with no system prompt at all.

use crate::domain::{ConversationMessage, Persona, PersonaKind, RoleConfig};
use crate::ports::ChatMessage;

/// System prompt: persona voice, role description, persona constraints.
///
/// Blank parts are skipped; the remaining parts are joined by blank lines.
pub fn compose_system_prompt(persona: &Persona, role: Option<&RoleConfig>) -> String {
    [
        Some(persona.voice.as_str()),
        role.map(|r| r.description.as_str()),
        Some(persona.constraint.as_str()),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join("\n\n")
}

pub fn addressed_user_line(user_name: &str) -> String {
    format!("You are talking with {}.", user_name)
}

pub fn context_turns(user_name: &str, merged_context: &str, trigger_text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::user(addressed_user_line(user_name)),
        ChatMessage::user(format!("Context: {}", merged_context.trim())),
        ChatMessage::user(trigger_text),
    ]
}

pub fn plain_turns(trigger_text: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::user(trigger_text)]
}

/// History turns from the point of view of `speaker`.
///
/// The speaker's own prior messages become assistant turns, other
/// personas' messages become user turns prefixed with `[Name]:`, and
/// human messages stay plain user turns.
pub fn history_turns(
    speaker: PersonaKind,
    user_name: &str,
    history: &[ConversationMessage],
) -> Vec<ChatMessage> {
    let mut turns = Vec::with_capacity(history.len() + 1);
    turns.push(ChatMessage::user(addressed_user_line(user_name)));

    for entry in history {
        let turn = match entry.persona_kind {
            Some(kind) if kind == speaker => ChatMessage::assistant(entry.text.clone()),
            Some(_) => ChatMessage::user(format!("[{}]: {}", entry.display_name, entry.text)),
            None => ChatMessage::user(entry.text.clone()),
        };
        turns.push(turn);
    }

    turns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MessageRole;
    use uuid::Uuid;

    fn persona() -> Persona {
        Persona::new(PersonaKind::DefaultChat, "Mio", "You are Mio.", "Never swear.")
    }

    #[test]
    fn test_system_prompt_order() {
        let role = RoleConfig::new("secretary", "Take notes.");
        assert_eq!(
            compose_system_prompt(&persona(), Some(&role)),
            "You are Mio.\n\nTake notes.\n\nNever swear."
        );
        assert_eq!(compose_system_prompt(&persona(), None), "You are Mio.\n\nNever swear.");
    }

    #[test]
    fn test_context_turns_layout() {
        let turns = context_turns("Aiko", "It is Monday.", "what day is it?");
        assert_eq!(turns.len(), 3);
        assert!(turns.iter().all(|t| t.role == MessageRole::User));
        assert_eq!(turns[0].content, "You are talking with Aiko.");
        assert_eq!(turns[1].content, "Context: It is Monday.");
        assert_eq!(turns[2].content, "what day is it?");
    }

    #[test]
    fn test_history_turns_labelling() {
        let history = vec![
            ConversationMessage::human(Uuid::new_v4(), "Aiko", "hi all"),
            ConversationMessage::persona(Uuid::new_v4(), PersonaKind::System, "Kanri", "welcome"),
            ConversationMessage::persona(Uuid::new_v4(), PersonaKind::DefaultChat, "Mio", "hey Aiko"),
        ];
        let turns = history_turns(PersonaKind::DefaultChat, "Aiko", &history);

        assert_eq!(
            turns,
            vec![
                ChatMessage::user("You are talking with Aiko."),
                ChatMessage::user("hi all"),
                ChatMessage::user("[Kanri]: welcome"),
                ChatMessage::assistant("hey Aiko"),
            ]
        );
    }
}
