//! Truncation-based fallback summary, used whenever no key-phrase
//! extractor is available or it fails.

const FALLBACK_MAX_CHARS: usize = 200;

/// Trims the text and caps it at 200 characters, appending "..." when
/// truncated. Counts characters, not bytes, so multi-byte text is never
/// split mid-character.
pub fn fallback_summary(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= FALLBACK_MAX_CHARS {
        return trimmed.to_string();
    }
    let head: String = trimmed.chars().take(FALLBACK_MAX_CHARS).collect();
    format!("{head}...")
}
