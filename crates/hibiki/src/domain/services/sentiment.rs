//! Keyword sentiment/intent analyzer
//!
//! Fast phrase scan that scores guidance-seeking and information-seeking
//! intent. Anything under `NEUTRAL_THRESHOLD` on both axes is neutral.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, SentimentResult};
use crate::ports::SentimentAnalyzer;

pub const NEUTRAL_THRESHOLD: u8 = 30;

const PHRASE_WEIGHT: u32 = 35;
const QUESTION_BONUS: u32 = 15;
const BARE_QUESTION_SCORE: u32 = 20;
const MAX_TOPIC_CHARS: usize = 60;

const GUIDANCE_PHRASES: &[&str] = &[
    "should i",
    "what should",
    "advice",
    "help me",
    "how do i",
    "how can i",
    "recommend",
    "suggest",
    "i'm stuck",
    "i am stuck",
    "any tips",
    "what would you do",
    "guide me",
];

const INFORMATION_PHRASES: &[&str] = &[
    "what is",
    "what's",
    "what are",
    "who is",
    "when is",
    "when did",
    "where is",
    "why is",
    "why does",
    "how does",
    "tell me about",
    "explain",
    "meaning of",
    "what time",
    "what day",
];

/// Phrases after which the information topic starts, longest first
const TOPIC_MARKERS: &[&str] = &[
    "tell me about ",
    "meaning of ",
    "what are ",
    "what is ",
    "what's ",
    "explain ",
    "about ",
];

#[derive(Debug, Clone, Default)]
pub struct KeywordSentimentAnalyzer;

impl KeywordSentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, text: &str) -> SentimentResult {
        let lowered = text.to_ascii_lowercase();
        let is_question = lowered.contains('?') || lowered.contains('？');

        let guidance_hits = count_hits(&lowered, GUIDANCE_PHRASES);
        let information_hits = count_hits(&lowered, INFORMATION_PHRASES);

        let mut guidance = guidance_hits * PHRASE_WEIGHT;
        let mut information = information_hits * PHRASE_WEIGHT;
        if is_question {
            match (guidance_hits, information_hits) {
                (0, 0) => information = BARE_QUESTION_SCORE,
                (_, 0) => guidance += QUESTION_BONUS,
                _ => information += QUESTION_BONUS,
            }
        }

        let guidance_seeking_score = guidance.min(100) as u8;
        let information_seeking_score = information.min(100) as u8;
        let is_neutral = guidance_seeking_score < NEUTRAL_THRESHOLD
            && information_seeking_score < NEUTRAL_THRESHOLD;

        let information_topic = if information_seeking_score >= NEUTRAL_THRESHOLD {
            extract_topic(text, &lowered)
        } else {
            None
        };

        SentimentResult {
            is_neutral,
            guidance_seeking_score,
            information_seeking_score,
            information_topic,
        }
    }
}

#[async_trait]
impl SentimentAnalyzer for KeywordSentimentAnalyzer {
    async fn analyze(&self, text: &str) -> Result<SentimentResult, DomainError> {
        Ok(self.classify(text))
    }
}

fn count_hits(lowered: &str, phrases: &[&str]) -> u32 {
    phrases.iter().filter(|p| lowered.contains(*p)).count() as u32
}

/// `lowered` must be the ASCII-lowercased `text` so byte offsets line up
fn extract_topic(text: &str, lowered: &str) -> Option<String> {
    let start = TOPIC_MARKERS
        .iter()
        .find_map(|marker| lowered.find(marker).map(|idx| idx + marker.len()))?;

    let rest = text.get(start..)?;
    let end = rest
        .find(['?', '？', '.', '!', '\n'])
        .unwrap_or(rest.len());
    let topic: String = rest[..end].trim().chars().take(MAX_TOPIC_CHARS).collect();

    let topic = topic
        .trim_start_matches("the ")
        .trim_start_matches("a ")
        .trim()
        .to_string();

    (!topic.is_empty()).then_some(topic)
}
