//! Locates and loosely validates the JSON object inside free-form model output.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::analysis::AnalysisError;
use crate::llm_client::strip_json_fences;

/// Top-level keys of a résumé analysis payload.
pub const ANALYSIS_KEYS: &[&str] = &[
    "name",
    "email",
    "skills",
    "experience",
    "currentPosition",
    "careerAnalysis",
    "analysis",
];

/// Top-level keys of a job-match payload.
pub const MATCH_KEYS: &[&str] = &[
    "matchRate",
    "suitable",
    "cvSummary",
    "jobSummary",
    "improvements",
    "analysis",
];

/// Returns the span from the first `{` to the last `}` (inclusive), if any.
pub fn json_span(text: &str) -> Option<&str> {
    let text = strip_json_fences(text);
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parses model output into `T`.
///
/// The payload must be a JSON object carrying at least one of `expected_keys`; anything
/// else (no braces, invalid JSON, an object of the wrong shape) is `ParseFailed`.
pub fn parse_model_output<T: DeserializeOwned>(
    text: &str,
    expected_keys: &[&str],
) -> Result<T, AnalysisError> {
    let span = json_span(text)
        .ok_or_else(|| AnalysisError::ParseFailed("no JSON object in model output".to_string()))?;

    let value: Value = serde_json::from_str(span)
        .map_err(|e| AnalysisError::ParseFailed(format!("invalid JSON: {e}")))?;

    let Value::Object(object) = &value else {
        return Err(AnalysisError::ParseFailed(
            "model output is not a JSON object".to_string(),
        ));
    };
    if !expected_keys.iter().any(|key| object.contains_key(*key)) {
        return Err(AnalysisError::ParseFailed(format!(
            "JSON object has none of the expected fields ({})",
            expected_keys.join(", ")
        )));
    }

    serde_json::from_value(value)
        .map_err(|e| AnalysisError::ParseFailed(format!("unexpected shape: {e}")))
}
