//! The entry store: validated knowledge records plus the token sets
//! the matcher scores against.
//!
//! A store is immutable once built. Reloading knowledge builds a fresh
//! store and swaps it in wholesale (see [`crate::advisor::Advisor`]),
//! so readers never observe a half-loaded state.

use std::collections::{BTreeMap, HashSet};

use tracing::warn;

use crate::error::RecordError;
use crate::model::{Entry, Language, RawRecord};
use crate::normalize::tokenize;

/// Category records fall into when the knowledge file names none.
const DEFAULT_CATEGORY: &str = "general";

/// Totals from one load pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records that validated and entered the store
    pub loaded: usize,
    /// Records skipped as malformed (logged individually)
    pub skipped: usize,
}

/// An entry with its precomputed match-token sets.
#[derive(Debug, Clone)]
pub(crate) struct IndexedEntry {
    pub(crate) entry: Entry,
    /// Normalized tokens drawn from the keyword list; falls back to the
    /// question tokens when the keyword list normalizes to nothing
    pub(crate) keyword_tokens: HashSet<String>,
    /// Normalized tokens of the canonical question
    pub(crate) question_tokens: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct EntryStore {
    entries: Vec<IndexedEntry>,
}

impl EntryStore {
    /// Validates raw records into a store, in input order. Malformed
    /// records (no question, no answer, or an unknown language code)
    /// are skipped with a warning; they never fail the load.
    pub fn load(records: Vec<RawRecord>) -> (Self, LoadReport) {
        let mut entries = Vec::with_capacity(records.len());
        let mut skipped = 0usize;

        for (position, record) in records.into_iter().enumerate() {
            let label = record
                .id
                .clone()
                .unwrap_or_else(|| format!("record-{position}"));
            match validate_record(position, record) {
                Ok(entry) => entries.push(index_entry(entry)),
                Err(e) => {
                    warn!(record = %label, error = %e, "skipping invalid knowledge record");
                    skipped += 1;
                }
            }
        }

        let report = LoadReport {
            loaded: entries.len(),
            skipped,
        };
        (Self { entries }, report)
    }

    /// All entries, in load order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().map(|indexed| &indexed.entry)
    }

    /// Entries answering in `language`, preserving load order.
    pub fn entries_for_language(&self, language: Language) -> impl Iterator<Item = &Entry> {
        self.entries
            .iter()
            .filter(move |indexed| indexed.entry.language == language)
            .map(|indexed| &indexed.entry)
    }

    pub(crate) fn indexed(&self) -> &[IndexedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Category name → number of entries, freshly derived from the
    /// current snapshot. Sorted keys keep the serialized form stable.
    pub fn categories(&self) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for indexed in &self.entries {
            *counts.entry(indexed.entry.category.clone()).or_insert(0) += 1;
        }
        counts
    }
}

fn validate_record(position: usize, record: RawRecord) -> Result<Entry, RecordError> {
    let question = match record.question.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => q.to_string(),
        _ => return Err(RecordError::EmptyQuestion),
    };
    let answer = match record.answer.as_deref().map(str::trim) {
        Some(a) if !a.is_empty() => a.to_string(),
        _ => return Err(RecordError::EmptyAnswer),
    };
    let raw_language = record.language.unwrap_or_default();
    let language = Language::parse(&raw_language)
        .ok_or(RecordError::UnknownLanguage(raw_language))?;

    let id = match record.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => format!("entry-{position}"),
    };
    let category = match record.category.as_deref().map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => DEFAULT_CATEGORY.to_string(),
    };

    Ok(Entry {
        id,
        category,
        language,
        question,
        answer,
        keywords: record.keywords,
    })
}

fn index_entry(entry: Entry) -> IndexedEntry {
    let question_tokens = tokenize(&entry.question);
    let mut keyword_tokens: HashSet<String> = HashSet::new();
    for keyword in &entry.keywords {
        keyword_tokens.extend(tokenize(keyword));
    }
    if keyword_tokens.is_empty() {
        keyword_tokens = question_tokens.clone();
    }
    IndexedEntry {
        entry,
        keyword_tokens,
        question_tokens,
    }
}
