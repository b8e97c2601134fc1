//! Heuristic input quality gate
//!
//! Flags keyboard mash, vowel-less ASCII words, long repeated-character
//! runs and mostly-symbol text as gibberish, and detects configured
//! special keywords.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, InputQuality};
use crate::ports::InputQualityAnalyzer;

/// Keywords that always summon the wild persona
pub const DEFAULT_SPECIAL_KEYWORDS: &[&str] = &["!wild", "#chaos", "unhinged mode"];

const KEYBOARD_ROWS: &[&str] = &["qwertyuiop", "asdfghjkl", "zxcvbnm"];
const MIN_MASH_LEN: usize = 5;
const MIN_VOWELLESS_LEN: usize = 6;
const MAX_REPEAT_RUN: usize = 6;
const MIN_SYMBOL_CHECK_LEN: usize = 6;

#[derive(Debug, Clone)]
pub struct HeuristicInputQuality {
    special_keywords: Vec<String>,
}

impl Default for HeuristicInputQuality {
    fn default() -> Self {
        Self::new(DEFAULT_SPECIAL_KEYWORDS.iter().map(|k| k.to_string()))
    }
}

impl HeuristicInputQuality {
    pub fn new(special_keywords: impl IntoIterator<Item = String>) -> Self {
        Self {
            special_keywords: special_keywords
                .into_iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn classify(&self, text: &str) -> InputQuality {
        let text = text.trim();
        if text.is_empty() {
            return InputQuality::normal();
        }

        let lowered = text.to_lowercase();
        if self.special_keywords.iter().any(|k| lowered.contains(k.as_str())) {
            return InputQuality::special_keyword();
        }

        if is_gibberish(&lowered) {
            return InputQuality::gibberish();
        }

        InputQuality::normal()
    }
}

#[async_trait]
impl InputQualityAnalyzer for HeuristicInputQuality {
    async fn analyze_input_quality(&self, text: &str) -> Result<InputQuality, DomainError> {
        Ok(self.classify(text))
    }
}

fn is_gibberish(lowered: &str) -> bool {
    if has_repeated_run(lowered) || mostly_symbols(lowered) {
        return true;
    }

    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|w| !w.is_empty())
        .collect();

    if words.is_empty() {
        return false;
    }

    let noisy = words
        .iter()
        .filter(|w| is_keyboard_mash(w) || is_vowelless(w))
        .count();

    // A single mashed word inside an otherwise normal sentence is tolerated
    noisy * 2 >= words.len()
}

fn has_repeated_run(text: &str) -> bool {
    let mut run = 0;
    let mut previous = None;
    for c in text.chars().filter(|c| !c.is_whitespace()) {
        if Some(c) == previous {
            run += 1;
            if run >= MAX_REPEAT_RUN {
                return true;
            }
        } else {
            run = 1;
            previous = Some(c);
        }
    }
    false
}

fn mostly_symbols(text: &str) -> bool {
    let visible: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    if visible.len() < MIN_SYMBOL_CHECK_LEN {
        return false;
    }
    let symbols = visible
        .iter()
        .filter(|c| c.is_ascii_punctuation())
        .count();
    symbols * 2 > visible.len()
}

fn is_keyboard_mash(word: &str) -> bool {
    word.len() >= MIN_MASH_LEN && KEYBOARD_ROWS.iter().any(|row| row.contains(word))
}

fn is_vowelless(word: &str) -> bool {
    word.len() >= MIN_VOWELLESS_LEN && !word.chars().any(|c| "aeiouy".contains(c))
}
