//! Missing-section detection over free-text clinical notes.
//!
//! Each SOAP-style section has a presence predicate over the lowercased
//! note text. The output lists the labels of absent sections in a fixed
//! clinical reading order.

use std::sync::LazyLock;

use regex::Regex;

/// Matches "on <drug-like word>", e.g. "on metformin", "on beta-blockers".
static ON_DRUG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bon\s+[a-z][a-z0-9-]+").expect("valid regex")
});

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

const CONDITION_TERMS: &[&str] = &[
    "diabetes",
    "hypertension",
    "asthma",
    "copd",
    "cad",
    "ckd",
    "stroke",
    "mi ",
    "thyroid",
    "cancer",
];

const MEDICATION_TERMS: &[&str] = &["meds", "medications", "rx:", "prescribed"];

const COMMON_DRUGS: &[&str] = &[
    "metformin",
    "lisinopril",
    "atorvastatin",
    "amlodipine",
    "insulin",
    "metoprolol",
];

const VITALS_TERMS: &[&str] = &[
    "bp",
    "blood pressure",
    "pulse",
    "hr ",
    "heart rate",
    "temperature",
    "temp ",
    "fever",
    "spo2",
    "o2",
    "resp",
    "rr ",
];

struct SectionRule {
    label: &'static str,
    present: fn(&str) -> bool,
}

/// Ordered section checks. Detection walks this table top to bottom so
/// the output order is stable.
const SECTION_RULES: &[SectionRule] = &[
    SectionRule {
        label: "Chief complaint",
        present: |t| contains_any(t, &["chief complaint", "cc:"]),
    },
    SectionRule {
        label: "History of present illness",
        present: |t| contains_any(t, &["hpi", "history of present illness"]),
    },
    SectionRule {
        label: "Past medical history",
        present: |t| {
            contains_any(t, &["pmh", "past medical history"]) || contains_any(t, CONDITION_TERMS)
        },
    },
    SectionRule {
        label: "Medications",
        present: |t| {
            contains_any(t, MEDICATION_TERMS)
                || ON_DRUG_RE.is_match(t)
                || contains_any(t, COMMON_DRUGS)
        },
    },
    SectionRule {
        label: "Allergies",
        present: |t| contains_any(t, &["allergies", "nka", "nkd a", "nkda"]),
    },
    SectionRule {
        label: "Vitals",
        present: |t| contains_any(t, VITALS_TERMS),
    },
    SectionRule {
        label: "Physical exam",
        present: |t| contains_any(t, &["pe:", "physical exam", "exam:"]),
    },
    SectionRule {
        label: "Assessment/Impression",
        present: |t| contains_any(t, &["assessment", "impression"]),
    },
    SectionRule {
        label: "Plan",
        present: |t| contains_any(t, &["plan:", "plan "]),
    },
];

/// Returns the labels of sections the note does not mention, in fixed
/// order. An empty result means the note looks complete.
pub fn detect_missing_details(note_text: &str) -> Vec<String> {
    let text = note_text.to_lowercase();
    SECTION_RULES
        .iter()
        .filter(|rule| !(rule.present)(&text))
        .map(|rule| rule.label.to_string())
        .collect()
}
