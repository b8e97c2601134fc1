//! Message Analysis Ports
//!
//! Input quality gate and sentiment/intent analysis.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, InputQuality, SentimentResult};

/// Classifies raw text as gibberish / special keyword / normal
#[async_trait]
pub trait InputQualityAnalyzer: Send + Sync {
    async fn analyze_input_quality(&self, text: &str) -> Result<InputQuality, DomainError>;
}

/// Classifies a message as neutral, guidance-seeking or information-seeking
#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<SentimentResult, DomainError>;
}
