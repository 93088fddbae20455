/// Errors surfaced to callers of [`crate::advisor::Advisor::ask`].
///
/// A question that simply matches nothing is not an error; the advisor
/// answers it with the per-language fallback instead.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AdvisorError {
    #[error("question is empty")]
    EmptyQuery,

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
}

/// Why a single knowledge record was rejected during store load.
///
/// Record problems are logged and skipped; they never abort the load.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("record has no question text")]
    EmptyQuestion,

    #[error("record has no answer text")]
    EmptyAnswer,

    #[error("unknown language code: {0}")]
    UnknownLanguage(String),
}
