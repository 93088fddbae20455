//! Token-overlap matcher.
//!
//! Candidates are the entries whose language equals the query language.
//! Each candidate scores `keyword hits * 2 + question token overlap`,
//! exact token membership only. The scan runs in load order with a
//! strictly-greater comparison, so equal scores keep the earliest
//! loaded entry and results are deterministic for a given snapshot.

use std::collections::HashSet;

use crate::model::Entry;
use crate::normalize::NormalizedQuery;
use crate::store::{EntryStore, IndexedEntry};

/// Outcome of scoring one query against a store snapshot.
#[derive(Debug, Clone, Copy)]
pub struct MatchResult<'s> {
    /// Winning entry; `None` when nothing scored above zero
    pub entry: Option<&'s Entry>,
    /// The winning score, 0 for no match
    pub score: u32,
    pub matched: bool,
}

impl MatchResult<'_> {
    fn none() -> Self {
        Self {
            entry: None,
            score: 0,
            matched: false,
        }
    }
}

/// Scores every same-language entry and returns the best one.
///
/// A query with no tokens matches nothing. A score of zero is not a
/// match; the caller substitutes the fallback answer.
pub fn best_match<'s>(query: &NormalizedQuery, store: &'s EntryStore) -> MatchResult<'s> {
    if query.tokens.is_empty() {
        return MatchResult::none();
    }

    let mut best_entry: Option<&'s Entry> = None;
    let mut best_score = 0u32;

    for indexed in store.indexed() {
        if indexed.entry.language != query.language {
            continue;
        }
        let score = score_entry(indexed, &query.tokens);
        if score > best_score {
            best_score = score;
            best_entry = Some(&indexed.entry);
        }
    }

    MatchResult {
        matched: best_entry.is_some(),
        entry: best_entry,
        score: best_score,
    }
}

fn score_entry(indexed: &IndexedEntry, tokens: &HashSet<String>) -> u32 {
    let keyword_hits = indexed.keyword_tokens.intersection(tokens).count() as u32;
    let overlap = indexed.question_tokens.intersection(tokens).count() as u32;
    keyword_hits * 2 + overlap
}
