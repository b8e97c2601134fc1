//! InputQuality - Classification of raw trigger text

use serde::{Deserialize, Serialize};

/// Quality class of a raw message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InputQualityType {
    Gibberish,
    ContainsSpecialKeyword,
    #[default]
    Normal,
}

/// Result of the input quality gate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct InputQuality {
    pub is_gibberish: bool,
    pub quality_type: InputQualityType,
}

impl InputQuality {
    pub fn normal() -> Self {
        Self {
            is_gibberish: false,
            quality_type: InputQualityType::Normal,
        }
    }

    pub fn gibberish() -> Self {
        Self {
            is_gibberish: true,
            quality_type: InputQualityType::Gibberish,
        }
    }

    pub fn special_keyword() -> Self {
        Self {
            is_gibberish: false,
            quality_type: InputQualityType::ContainsSpecialKeyword,
        }
    }

    /// Whether this input should be answered by the wild persona
    pub fn forces_wild(&self) -> bool {
        self.is_gibberish || self.quality_type == InputQualityType::ContainsSpecialKeyword
    }
}
