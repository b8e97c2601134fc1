//! SentimentResult - Intent classification of a trigger message

use serde::{Deserialize, Serialize};

/// Produced fresh per trigger message; not stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentimentResult {
    pub is_neutral: bool,
    /// 0..=100
    pub guidance_seeking_score: u8,
    /// 0..=100
    pub information_seeking_score: u8,
    pub information_topic: Option<String>,
}

impl SentimentResult {
    pub fn neutral() -> Self {
        Self {
            is_neutral: true,
            guidance_seeking_score: 0,
            information_seeking_score: 0,
            information_topic: None,
        }
    }
}
