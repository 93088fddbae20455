use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Languages the advisor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Hi,
}

impl Language {
    /// Wire code, e.g. "en".
    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
        }
    }

    /// Parses a wire code. Returns `None` for anything outside {en, hi};
    /// the caller decides whether that is an error.
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.eq_ignore_ascii_case("en") {
            Some(Language::En)
        } else if code.eq_ignore_ascii_case("hi") {
            Some(Language::Hi)
        } else {
            None
        }
    }
}

/// How the question reached the advisor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMethod {
    #[default]
    Text,
    Voice,
}

impl InputMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            InputMethod::Text => "text",
            InputMethod::Voice => "voice",
        }
    }
}

/// One knowledge record as it appears in the knowledge file, before
/// validation. Every field is optional so a single malformed record
/// cannot abort deserialization of the whole file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// A validated knowledge entry. Immutable after load; a reload replaces
/// the whole store rather than mutating entries in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Stable identifier, e.g. "rice_planting_time"
    pub id: String,
    /// Topic bucket, e.g. "crop_planning"
    pub category: String,
    /// Language this entry answers in
    pub language: Language,
    /// Canonical question phrasing
    pub question: String,
    /// The stored advice text
    pub answer: String,
    /// Match keywords; may be empty, in which case scoring falls back
    /// to the tokenized question
    pub keywords: Vec<String>,
}

/// One logged question/answer exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Unix seconds at the time the question was answered
    pub timestamp: u64,
    pub question: String,
    pub answer: String,
    pub language: Language,
    pub input_method: InputMethod,
}

impl Interaction {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        language: Language,
        input_method: InputMethod,
    ) -> Self {
        Self {
            timestamp: unix_now(),
            question: question.into(),
            answer: answer.into(),
            language,
            input_method,
        }
    }
}

/// Per-language answers used when no entry matches a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackAnswers {
    pub en: String,
    pub hi: String,
}

impl FallbackAnswers {
    pub fn for_language(&self, language: Language) -> &str {
        match language {
            Language::En => &self.en,
            Language::Hi => &self.hi,
        }
    }
}

/// Seconds since the Unix epoch, clamped to zero for clocks set
/// before it.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_secs()
}
