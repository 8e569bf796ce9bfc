//! Deterministic follow-up suggestions keyed off the note and
//! assessment text. Key-phrase enrichment and the empty-result fallback
//! live in the engine.

pub const NO_SUGGESTIONS_FALLBACK: &str =
    "No specific suggestions generated. Consider clarifying HPI, vitals, and red flags.";

struct SuggestionRule {
    triggers: &'static [&'static str],
    advice: &'static [&'static str],
}

/// Ordered condition checks. Matching rules contribute their advice in
/// table order.
const SUGGESTION_RULES: &[SuggestionRule] = &[
    SuggestionRule {
        triggers: &["hypertension", "high blood pressure"],
        advice: &[
            "Check recent BP trend; ensure lifestyle counseling and medication adherence.",
            "Order BMP, lipid panel if not recent; review secondary causes if resistant.",
        ],
    },
    SuggestionRule {
        triggers: &["diabetes", "hyperglycemia"],
        advice: &[
            "Review A1c and kidney function; foot and eye exam as indicated.",
            "Discuss hypoglycemia risk and individualized glycemic targets.",
        ],
    },
    SuggestionRule {
        triggers: &["chest pain"],
        advice: &["Assess ACS risk; obtain ECG; consider troponin and risk stratification."],
    },
];

/// Rule-based suggestions over the combined note and assessment text.
/// May be empty; the caller applies enrichment and the fallback.
pub fn base_suggestions(notes: &str, assessment: &str) -> Vec<String> {
    let text = format!("{notes} {assessment}").to_lowercase();
    let mut suggestions = Vec::new();
    for rule in SUGGESTION_RULES {
        if rule.triggers.iter().any(|t| text.contains(t)) {
            suggestions.extend(rule.advice.iter().map(|s| s.to_string()));
        }
    }
    suggestions
}
