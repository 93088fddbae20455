//! The advisor facade: one object owning the knowledge snapshot, the
//! matcher, and the interaction history.
//!
//! Intended to sit behind an `Arc` and be called from any number of
//! threads. Questions clone the current snapshot handle and score
//! against it lock-free; a reload builds the replacement store first
//! and swaps the handle in one write, so in-flight questions keep the
//! snapshot they started with.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use tracing::info;

use crate::error::AdvisorError;
use crate::history::HistoryLog;
use crate::matcher;
use crate::model::{FallbackAnswers, InputMethod, Interaction, Language, RawRecord};
use crate::normalize;
use crate::store::{EntryStore, LoadReport};

/// The advisor's answer to one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskOutcome {
    /// The question after trimming, as recorded in history
    pub question: String,
    pub answer: String,
    pub language: Language,
    /// False when `answer` is the per-language fallback
    pub matched: bool,
    /// Category of the matched entry, absent on fallback
    pub category: Option<String>,
}

pub struct Advisor {
    store: RwLock<Arc<EntryStore>>,
    history: HistoryLog,
    fallbacks: FallbackAnswers,
}

impl Advisor {
    pub fn new(store: EntryStore, fallbacks: FallbackAnswers, history_capacity: usize) -> Self {
        Self {
            store: RwLock::new(Arc::new(store)),
            history: HistoryLog::new(history_capacity),
            fallbacks,
        }
    }

    /// Handle to the current knowledge snapshot. Stays valid across
    /// reloads; it just goes stale.
    pub fn snapshot(&self) -> Arc<EntryStore> {
        Arc::clone(&self.store.read().unwrap())
    }

    /// Answers one question and records the exchange in history.
    ///
    /// Blank questions and unknown language codes are the caller's
    /// errors and are not recorded. A question that matches nothing is
    /// answered with the per-language fallback, `matched = false`.
    pub fn ask(
        &self,
        question: &str,
        language_code: &str,
        input_method: InputMethod,
    ) -> Result<AskOutcome, AdvisorError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AdvisorError::EmptyQuery);
        }
        let language = Language::parse(language_code)
            .ok_or_else(|| AdvisorError::UnsupportedLanguage(language_code.trim().to_string()))?;

        let store = self.snapshot();
        let query = normalize::normalize(question, language);
        let result = matcher::best_match(&query, &store);

        let (answer, matched, category) = match result.entry {
            Some(entry) => (entry.answer.clone(), true, Some(entry.category.clone())),
            None => (
                self.fallbacks.for_language(language).to_string(),
                false,
                None,
            ),
        };

        info!(
            question,
            language = language.as_str(),
            input_method = input_method.as_str(),
            matched,
            score = result.score,
            "question answered"
        );

        self.history
            .record(Interaction::new(question, answer.clone(), language, input_method));

        Ok(AskOutcome {
            question: question.to_string(),
            answer,
            language,
            matched,
            category,
        })
    }

    /// Category name → entry count for the current snapshot.
    pub fn list_categories(&self) -> BTreeMap<String, usize> {
        self.snapshot().categories()
    }

    /// Most recent interactions, newest first.
    pub fn recent_history(&self, limit: usize) -> Vec<Interaction> {
        self.history.recent(limit)
    }

    pub fn entry_count(&self) -> usize {
        self.snapshot().len()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_capacity(&self) -> usize {
        self.history.capacity()
    }

    /// Replaces the knowledge snapshot wholesale. The new store is
    /// fully built before the swap, and the old one lives on until its
    /// last in-flight reader drops it.
    pub fn reload(&self, records: Vec<RawRecord>) -> LoadReport {
        let (store, report) = EntryStore::load(records);
        *self.store.write().unwrap() = Arc::new(store);
        info!(
            loaded = report.loaded,
            skipped = report.skipped,
            "knowledge snapshot replaced"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallbacks() -> FallbackAnswers {
        FallbackAnswers {
            en: "Sorry, I do not know.".to_string(),
            hi: "क्षमा करें, मुझे नहीं पता।".to_string(),
        }
    }

    fn record(id: &str, category: &str, language: &str, question: &str, keywords: &[&str]) -> RawRecord {
        RawRecord {
            id: Some(id.to_string()),
            category: Some(category.to_string()),
            language: Some(language.to_string()),
            question: Some(question.to_string()),
            answer: Some(format!("answer for {id}")),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn advisor() -> Advisor {
        let (store, _) = EntryStore::load(vec![
            record("rice", "crop_planning", "en", "when to plant rice", &["rice", "paddy"]),
            record("hi-rice", "crop_planning", "hi", "चावल कब लगाएं", &["चावल", "धान"]),
            record("soil", "soil_management", "en", "how to test soil", &["soil test", "ph"]),
        ]);
        Advisor::new(store, fallbacks(), 10)
    }

    #[test]
    fn test_ask_matches_entry() {
        let advisor = advisor();
        let outcome = advisor
            .ask("When should I plant rice?", "en", InputMethod::Text)
            .unwrap();
        assert!(outcome.matched);
        assert_eq!(outcome.answer, "answer for rice");
        assert_eq!(outcome.category.as_deref(), Some("crop_planning"));
        assert_eq!(outcome.question, "When should I plant rice?");
        assert_eq!(outcome.language, Language::En);
    }

    #[test]
    fn test_ask_falls_back_when_nothing_matches() {
        let advisor = advisor();
        let outcome = advisor
            .ask("goat vaccination schedule", "en", InputMethod::Text)
            .unwrap();
        assert!(!outcome.matched);
        assert_eq!(outcome.answer, "Sorry, I do not know.");
        assert!(outcome.category.is_none());
    }

    #[test]
    fn test_fallback_is_language_specific() {
        let advisor = advisor();
        let outcome = advisor
            .ask("बकरी का टीकाकरण", "hi", InputMethod::Text)
            .unwrap();
        assert!(!outcome.matched);
        assert_eq!(outcome.answer, "क्षमा करें, मुझे नहीं पता।");
    }

    #[test]
    fn test_blank_question_is_rejected_and_not_recorded() {
        let advisor = advisor();
        assert_eq!(
            advisor.ask("", "en", InputMethod::Text),
            Err(AdvisorError::EmptyQuery)
        );
        assert_eq!(
            advisor.ask("   \t", "en", InputMethod::Text),
            Err(AdvisorError::EmptyQuery)
        );
        assert_eq!(advisor.history_len(), 0);
    }

    #[test]
    fn test_unknown_language_is_rejected_and_not_recorded() {
        let advisor = advisor();
        assert_eq!(
            advisor.ask("when to plant rice", "fr", InputMethod::Text),
            Err(AdvisorError::UnsupportedLanguage("fr".to_string()))
        );
        assert_eq!(advisor.history_len(), 0);
    }

    #[test]
    fn test_blank_question_reported_before_bad_language() {
        let advisor = advisor();
        assert_eq!(
            advisor.ask("", "fr", InputMethod::Text),
            Err(AdvisorError::EmptyQuery)
        );
    }

    #[test]
    fn test_punctuation_only_question_gets_fallback_not_error() {
        let advisor = advisor();
        let outcome = advisor.ask("???", "en", InputMethod::Text).unwrap();
        assert!(!outcome.matched);
        assert_eq!(outcome.answer, "Sorry, I do not know.");
    }

    #[test]
    fn test_every_answered_question_is_recorded_once() {
        let advisor = advisor();
        advisor.ask("when to plant rice", "en", InputMethod::Voice).unwrap();
        advisor.ask("goat vaccination", "en", InputMethod::Text).unwrap();

        assert_eq!(advisor.history_len(), 2);
        let recent = advisor.recent_history(10);
        assert_eq!(recent[0].question, "goat vaccination");
        assert_eq!(recent[1].question, "when to plant rice");
        assert_eq!(recent[1].input_method, InputMethod::Voice);
        assert_eq!(recent[1].answer, "answer for rice");
    }

    #[test]
    fn test_list_categories_counts_entries() {
        let advisor = advisor();
        let categories = advisor.list_categories();
        assert_eq!(categories.get("crop_planning"), Some(&2));
        assert_eq!(categories.get("soil_management"), Some(&1));
    }

    #[test]
    fn test_reload_swaps_snapshot_atomically() {
        let advisor = advisor();
        let before = advisor.snapshot();

        let report = advisor.reload(vec![
            record("wheat", "crop_planning", "en", "when to sow wheat", &["wheat"]),
            RawRecord::default(),
        ]);
        assert_eq!(report.loaded, 1);
        assert_eq!(report.skipped, 1);

        // the pre-reload handle still sees the old snapshot
        assert_eq!(before.len(), 3);
        assert_eq!(advisor.entry_count(), 1);

        // new snapshot answers, old entries are gone
        let outcome = advisor.ask("when to sow wheat", "en", InputMethod::Text).unwrap();
        assert!(outcome.matched);
        let outcome = advisor.ask("rice planting season", "en", InputMethod::Text).unwrap();
        assert!(!outcome.matched);
    }

    #[test]
    fn test_reload_refreshes_categories() {
        let advisor = advisor();
        advisor.reload(vec![record("pest", "pest_control", "en", "aphid control", &["aphid"])]);
        let categories = advisor.list_categories();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories.get("pest_control"), Some(&1));
    }
}
