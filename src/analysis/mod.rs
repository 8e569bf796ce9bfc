//! Clinical note analysis: missing-section detection, follow-up
//! suggestions, and summarization.
//!
//! Detection and the base suggestions are deterministic keyword
//! heuristics. Summaries and suggestion enrichment can optionally use a
//! remote key-phrase extractor; when it is absent or failing, every
//! operation degrades to the deterministic path.

pub mod engine;
pub mod key_phrases;
pub mod missing;
pub mod suggest;
pub mod summary;

pub use engine::AnalysisEngine;
pub use key_phrases::{KeyPhraseError, KeyPhraseExtractor, TextAnalyticsClient};
pub use missing::detect_missing_details;
pub use summary::fallback_summary;
