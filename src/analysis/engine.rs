//! Analysis engine tying the deterministic heuristics to the optional
//! key-phrase extractor.

use super::key_phrases::KeyPhraseExtractor;
use super::missing::detect_missing_details;
use super::suggest::{base_suggestions, NO_SUGGESTIONS_FALLBACK};
use super::summary::fallback_summary;

/// At most this many key phrases make it into a summary.
const MAX_SUMMARY_PHRASES: usize = 10;
/// At most this many "Explore:" suggestions from key phrases.
const MAX_EXPLORE_PHRASES: usize = 5;

/// Runs the three analyses. Holds an optional extractor; without one,
/// every path is deterministic.
pub struct AnalysisEngine<K> {
    extractor: Option<K>,
}

impl<K: KeyPhraseExtractor> AnalysisEngine<K> {
    pub fn new(extractor: Option<K>) -> Self {
        Self { extractor }
    }

    /// Summarize a note. With an extractor, a "Key points:" line from
    /// up to ten phrases; otherwise (or on failure, or when the phrase
    /// list comes back empty) the 200-character truncation fallback.
    pub async fn summarize(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return fallback_summary(text);
        }
        let Some(extractor) = &self.extractor else {
            return fallback_summary(text);
        };

        match extractor.key_phrases(text).await {
            Ok(phrases) if !phrases.is_empty() => {
                let joined = phrases
                    .iter()
                    .take(MAX_SUMMARY_PHRASES)
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join("; ");
                if joined.trim().is_empty() {
                    fallback_summary(text)
                } else {
                    format!("Key points: {joined}")
                }
            }
            Ok(_) => fallback_summary(text),
            Err(e) => {
                tracing::warn!(error = %e, "key-phrase extraction failed, using fallback summary");
                fallback_summary(text)
            }
        }
    }

    /// Section labels absent from the note, in fixed order.
    pub fn detect_missing(&self, note_text: &str) -> Vec<String> {
        detect_missing_details(note_text)
    }

    /// Rule-based suggestions over notes + assessment, enriched with up
    /// to five "Explore:" phrases when an extractor is available.
    /// Extraction failures are ignored. Never returns an empty list.
    pub async fn suggest(&self, notes: &str, assessment: &str) -> Vec<String> {
        let mut suggestions = base_suggestions(notes, assessment);

        if let Some(extractor) = &self.extractor {
            match extractor.key_phrases(notes).await {
                Ok(phrases) => {
                    for phrase in phrases.into_iter().take(MAX_EXPLORE_PHRASES) {
                        suggestions.push(format!("Explore: {phrase}"));
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "key-phrase enrichment failed, skipping");
                }
            }
        }

        if suggestions.is_empty() {
            suggestions.push(NO_SUGGESTIONS_FALLBACK.to_string());
        }
        suggestions
    }
}
