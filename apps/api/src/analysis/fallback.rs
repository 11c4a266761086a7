//! Deterministic regex extraction used when the provider cannot produce an analysis.
//!
//! Extracted text is normalized to a single line, so a labelled value such as
//! `Skills: Go, Rust` runs until the next recognised label or the end of the text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::models::{AnalysisResult, AnalysisSource};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w._%+-]+@[\w.-]+\.[a-zA-Z]{2,}").expect("valid email regex"));

/// Every label the extractor knows. Longer alternatives come first so that
/// `Full Name:` is not read as `Name:`. Qualified labels such as `Company Name:` are
/// matched whole; they end the previous value but are not extracted.
static LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b((?:full|first|last|company|employer|user|project|school|institution|reference)\s+name|username|email\s+address|e-?mail|phone\s+number|phone|mobile|technical\s+skills|soft\s+skills|skills|work\s+experience|experience|name|education|summary|objective|projects|certifications|languages)\s*:",
    )
    .expect("valid label regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Skills,
    Experience,
    Other,
}

impl Field {
    fn from_label(label: &str) -> Self {
        let label = label
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase();
        match label.as_str() {
            "name" | "full name" => Field::Name,
            "skills" | "technical skills" => Field::Skills,
            "experience" | "work experience" => Field::Experience,
            _ => Field::Other,
        }
    }
}

/// Builds an `AnalysisResult` from `text` alone. Never fails; unmatched fields stay empty.
pub fn extract_fields(text: &str) -> AnalysisResult {
    let mut result = AnalysisResult {
        source: AnalysisSource::Fallback,
        email: EMAIL_RE.find(text).map(|m| m.as_str().to_string()),
        raw_text: text.to_string(),
        ..Default::default()
    };

    for (field, value) in labelled_values(text) {
        match field {
            Field::Name if result.name.is_none() => result.name = Some(value.to_string()),
            Field::Skills if result.skills.is_empty() => {
                result.skills = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            Field::Experience if result.experience.is_none() => {
                result.experience = Some(value.to_string())
            }
            _ => {}
        }
    }

    result
}

/// Each recognised label with its non-empty value, in document order.
fn labelled_values(text: &str) -> Vec<(Field, &str)> {
    let labels: Vec<_> = LABEL_RE.captures_iter(text).collect();
    labels
        .iter()
        .enumerate()
        .filter_map(|(i, caps)| {
            let whole = caps.get(0)?;
            let label = caps.get(1)?;
            let end = labels
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(text.len(), |m| m.start());
            let value = text[whole.end()..end].trim();
            (!value.is_empty()).then(|| (Field::from_label(label.as_str()), value))
        })
        .collect()
}
