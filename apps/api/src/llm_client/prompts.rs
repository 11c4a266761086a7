// Shared prompt fragments. Each caller that needs the provider keeps its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// Instruction appended to every structured-output prompt. The provider has no
/// separate system channel in the `generateContent` envelope, so it travels inline.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";

/// Instruction that keeps scores inside the documented range.
pub const SCORE_RANGE_INSTRUCTION: &str = "\
    Every score and rate is an integer from 0 to 100.";
