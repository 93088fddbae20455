//! Knowledge file loading.
//!
//! The loader reads the JSON knowledge file, fingerprints the raw
//! bytes, and hands the records to `EntryStore::load` untouched.
//! Entry-level validation (and skipping of malformed records) is the
//! store's job; the loader fails only on unreadable files or content
//! that is not JSON at all.

use std::path::Path;

use advisor_core::model::{FallbackAnswers, RawRecord};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::AppError;

/// Answer returned for English questions that match nothing, unless
/// the knowledge file supplies its own.
const FALLBACK_EN: &str = "I'm sorry, I don't have specific information about that topic in my \
knowledge base. Could you please rephrase your question or ask about crop planning, soil \
management, irrigation, pest control, fertilizers, or weather-related farming topics?";

/// Hindi counterpart of [`FALLBACK_EN`].
const FALLBACK_HI: &str = "क्षमा करें, मेरे ज्ञान आधार में उस विषय के बारे में विशिष्ट जानकारी नहीं है। कृपया अपना प्रश्न दूसरे तरीके से पूछें या फसल योजना, मिट्टी प्रबंधन, सिंचाई, कीट नियंत्रण, उर्वरक, या मौसम संबंधी खेती के विषयों के बारे में पूछें।";

/// On-disk shape of the knowledge file.
#[derive(Debug, Deserialize)]
struct KnowledgeFile {
    #[serde(default)]
    fallbacks: RawFallbacks,
    #[serde(default)]
    entries: Vec<RawRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct RawFallbacks {
    en: Option<String>,
    hi: Option<String>,
}

/// Parsed knowledge file contents plus the fingerprint of the bytes
/// they came from.
#[derive(Debug)]
pub struct LoadedKnowledge {
    pub records: Vec<RawRecord>,
    pub fallbacks: FallbackAnswers,
    pub fingerprint: String,
}

pub fn load_knowledge(path: &Path) -> Result<LoadedKnowledge, AppError> {
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::Knowledge(format!("failed to read {}: {e}", path.display())))?;
    parse_knowledge(&bytes)
        .map_err(|e| AppError::Knowledge(format!("failed to parse {}: {e}", path.display())))
}

fn parse_knowledge(bytes: &[u8]) -> Result<LoadedKnowledge, serde_json::Error> {
    let file: KnowledgeFile = serde_json::from_slice(bytes)?;
    Ok(LoadedKnowledge {
        records: file.entries,
        fallbacks: FallbackAnswers {
            en: file.fallbacks.en.unwrap_or_else(|| FALLBACK_EN.to_string()),
            hi: file.fallbacks.hi.unwrap_or_else(|| FALLBACK_HI.to_string()),
        },
        fingerprint: fingerprint(bytes),
    })
}

/// SHA-256 of the raw file bytes as lowercase hex. Reloads compare
/// this to decide whether swapping the snapshot would change anything.
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex_lower(&hasher.finalize())
}

fn hex_lower(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0x0f) as usize] as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::store::EntryStore;

    #[test]
    fn test_parse_knowledge_file() {
        let raw = r#"{
            "fallbacks": { "en": "no match", "hi": "कोई मेल नहीं" },
            "entries": [
                {
                    "id": "rice_planting_time",
                    "category": "crop_planning",
                    "language": "en",
                    "question": "when to plant rice",
                    "answer": "June to July, after the first good rain.",
                    "keywords": ["rice", "paddy", "monsoon"]
                }
            ]
        }"#;
        let knowledge = parse_knowledge(raw.as_bytes()).unwrap();
        assert_eq!(knowledge.records.len(), 1);
        assert_eq!(knowledge.fallbacks.en, "no match");
        assert_eq!(knowledge.fallbacks.hi, "कोई मेल नहीं");
        assert_eq!(knowledge.fingerprint.len(), 64);
    }

    #[test]
    fn test_missing_fallbacks_use_defaults() {
        let knowledge = parse_knowledge(br#"{ "entries": [] }"#).unwrap();
        assert_eq!(knowledge.fallbacks.en, FALLBACK_EN);
        assert_eq!(knowledge.fallbacks.hi, FALLBACK_HI);
    }

    #[test]
    fn test_partial_fallbacks_fill_the_gap() {
        let knowledge =
            parse_knowledge(br#"{ "fallbacks": { "en": "custom" }, "entries": [] }"#).unwrap();
        assert_eq!(knowledge.fallbacks.en, "custom");
        assert_eq!(knowledge.fallbacks.hi, FALLBACK_HI);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(parse_knowledge(b"not json").is_err());
        assert!(load_knowledge(std::path::Path::new("/nonexistent/knowledge.json")).is_err());
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        assert_eq!(
            fingerprint(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(fingerprint(b"abc"), fingerprint(b"abc"));
        assert_ne!(fingerprint(b"abc"), fingerprint(b"abd"));
    }

    /// Integration test: the bundled knowledge file must parse and
    /// every record in it must validate into the store.
    #[test]
    fn test_bundled_knowledge_file_is_clean() {
        let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../data/knowledge.json");
        let knowledge = load_knowledge(&path).expect("bundled knowledge file loads");
        assert!(!knowledge.records.is_empty());

        let (store, report) = EntryStore::load(knowledge.records);
        assert_eq!(report.skipped, 0, "bundled records must all validate");
        assert!(store.len() >= 10);

        // both languages and several categories are represented
        use advisor_core::model::Language;
        assert!(store.entries_for_language(Language::En).count() > 0);
        assert!(store.entries_for_language(Language::Hi).count() > 0);
        assert!(store.categories().len() >= 4);
    }
}
