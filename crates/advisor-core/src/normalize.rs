//! Question normalization.
//!
//! Matching operates on unique word tokens. Normalization lower-cases
//! the text, replaces punctuation runs with spaces, and splits on
//! whitespace. The punctuation class is Unicode-aware: Devanagari
//! letters, matras, and digits pass through untouched while the danda
//! and Latin punctuation become token boundaries, so Hindi and English
//! questions normalize the same way.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::Language;

/// A question reduced to the form the matcher scores against.
#[derive(Debug, Clone)]
pub struct NormalizedQuery {
    /// The question as the caller sent it
    pub raw: String,
    pub language: Language,
    /// Unique normalized tokens; empty when the text had no word characters
    pub tokens: HashSet<String>,
}

fn punctuation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s]+").expect("valid regex"))
}

/// Splits text into its unique set of normalized tokens.
pub fn tokenize(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    let stripped = punctuation_re().replace_all(&lowered, " ");
    stripped
        .split_whitespace()
        .map(|token| token.to_string())
        .collect()
}

/// Builds the matcher input for one question.
pub fn normalize(text: &str, language: Language) -> NormalizedQuery {
    NormalizedQuery {
        raw: text.to_string(),
        language,
        tokens: tokenize(text),
    }
}
