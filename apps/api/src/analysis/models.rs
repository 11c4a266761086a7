//! Result models for résumé analysis and job matching.
//!
//! The provider does not reliably honour nested types, so every field is optional or a
//! defaulted list, and each one is decoded leniently: a value with the wrong JSON type
//! becomes absent instead of failing the whole payload. Wire names are camelCase.

use serde::{Deserialize, Deserializer, Serialize};

/// Which path produced an `AnalysisResult`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    #[default]
    Ai,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    None,
    Basic,
    Intermediate,
    Advanced,
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(serde::de::Error::unknown_variant(
                &raw,
                &["high", "medium", "low"],
            )),
        }
    }
}

impl<'de> Deserialize<'de> for SkillLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(SkillLevel::None),
            "basic" => Ok(SkillLevel::Basic),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            _ => Err(serde::de::Error::unknown_variant(
                &raw,
                &["none", "basic", "intermediate", "advanced"],
            )),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Résumé analysis
// ────────────────────────────────────────────────────────────────────────────

/// Structured analysis of one résumé, from the provider or the regex fallback.
///
/// `raw_text` is always the extracted text the analysis was run on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default)]
    pub source: AnalysisSource,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub experience: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub current_position: Option<Position>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub career_analysis: Option<CareerAnalysis>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub analysis: Option<CvAssessment>,
    #[serde(
        default,
        deserialize_with = "lenient::opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub job_match: Option<MatchResult>,
    #[serde(default)]
    pub raw_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub designation: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionHistoryEntry {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub designation: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerAnalysis {
    #[serde(default, deserialize_with = "lenient::text")]
    pub current_level: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_years_of_experience: Option<f64>,
    /// Ordered as the provider returned it.
    #[serde(default, deserialize_with = "lenient::list")]
    pub position_history: Vec<PositionHistoryEntry>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub suggested_next_role: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub career_progression: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub progression_roadmap: Option<ProgressionRoadmap>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionRoadmap {
    #[serde(default, deserialize_with = "lenient::text")]
    pub target_role: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub estimated_timeframe: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub required_skills: Vec<RequiredSkill>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub milestones: Vec<Milestone>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredSkill {
    #[serde(default, deserialize_with = "lenient::text")]
    pub skill: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub current_level: Option<SkillLevel>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub action_items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub timeframe: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub actions: Vec<String>,
}

/// The `analysis` block: strengths, improvements and the two 0–100 scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvAssessment {
    #[serde(default, deserialize_with = "lenient::opt")]
    pub strengths: Option<Strengths>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub improvements: Option<Improvements>,
    #[serde(default, deserialize_with = "lenient::score")]
    pub market_score: Option<u8>,
    #[serde(default, deserialize_with = "lenient::score")]
    pub cv_score: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strengths {
    #[serde(default, deserialize_with = "lenient::strings")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub experience: Vec<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub market_alignment: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Improvements {
    #[serde(default, deserialize_with = "lenient::strings")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub experience: Vec<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub suggestions: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Job matching
// ────────────────────────────────────────────────────────────────────────────

/// Comparison of a résumé against one job description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    #[serde(default, deserialize_with = "lenient::score")]
    pub match_rate: Option<u8>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub suitable: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub cv_summary: Option<CvSummary>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub job_summary: Option<JobSummary>,
    /// Ordered by the provider, highest impact first.
    #[serde(default, deserialize_with = "lenient::list")]
    pub improvements: Vec<MatchImprovement>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub analysis: Option<MatchAnalysis>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvSummary {
    #[serde(default, deserialize_with = "lenient::text")]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub experience: Vec<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub responsibilities: Vec<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchImprovement {
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub details: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAnalysis {
    #[serde(default, deserialize_with = "lenient::strings")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub gaps: Vec<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub recommendations: Vec<String>,
}

/// Per-field decoders that never fail on a type mismatch.
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(serde_json::from_value(value).ok())
    }

    /// Strings pass through; numbers and booleans are rendered; blanks are absent.
    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(scalar_to_string(Value::deserialize(deserializer)?))
    }

    /// Arrays keep their scalar items; a bare string becomes a one-item list.
    pub fn strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items.into_iter().filter_map(scalar_to_string).collect(),
            other => scalar_to_string(other).into_iter().collect(),
        })
    }

    /// Arrays keep the items that decode as `T`; anything else is an empty list.
    pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }

    /// Numbers, or numeric strings such as `"7"`, `"7.5"` or `"85%"`.
    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(value_to_f64(&Value::deserialize(deserializer)?))
    }

    /// A 0–100 score; out-of-range values are clamped, fractions rounded.
    pub fn score<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(value_to_f64(&Value::deserialize(deserializer)?)
            .filter(|n| n.is_finite())
            .map(|n| n.round().clamp(0.0, 100.0) as u8))
    }

    /// Booleans, or the strings `"true"`/`"false"`/`"yes"`/`"no"`.
    pub fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Bool(b) => Some(b),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" => Some(true),
                "false" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        })
    }

    fn scalar_to_string(value: Value) -> Option<String> {
        match value {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn value_to_f64(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_full_payload_decodes() {
        let result: AnalysisResult = serde_json::from_value(json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "skills": ["Rust", "Go"],
            "experience": "8 years of backend work",
            "currentPosition": { "title": "Engineer", "designation": "Senior", "company": "Acme", "duration": "3 years" },
            "careerAnalysis": {
                "currentLevel": "Senior",
                "totalYearsOfExperience": 8,
                "positionHistory": [
                    { "title": "Engineer", "company": "Acme", "responsibilities": ["APIs"] },
                    { "title": "Intern", "company": "Initech" }
                ],
                "suggestedNextRole": "Staff Engineer",
                "progressionRoadmap": {
                    "targetRole": "Staff Engineer",
                    "requiredSkills": [{ "skill": "System design", "priority": "high", "currentLevel": "intermediate", "actionItems": ["Lead a design review"] }],
                    "milestones": [{ "title": "Own a service", "timeframe": "6 months", "actions": ["Volunteer"] }]
                }
            },
            "analysis": {
                "strengths": { "skills": ["Rust"], "experience": [], "marketAlignment": ["Cloud"] },
                "improvements": { "skills": ["Kubernetes"], "experience": [], "suggestions": ["Add metrics"] },
                "marketScore": 82,
                "cvScore": 74
            }
        }))
        .unwrap();

        assert_eq!(result.source, AnalysisSource::Ai);
        assert_eq!(result.name.as_deref(), Some("Jane Doe"));
        assert_eq!(result.skills, vec!["Rust", "Go"]);

        let career = result.career_analysis.unwrap();
        assert_eq!(career.total_years_of_experience, Some(8.0));
        assert_eq!(career.position_history.len(), 2);
        assert_eq!(career.position_history[1].title.as_deref(), Some("Intern"));
        let roadmap = career.progression_roadmap.unwrap();
        assert_eq!(roadmap.required_skills[0].priority, Some(Priority::High));
        assert_eq!(
            roadmap.required_skills[0].current_level,
            Some(SkillLevel::Intermediate)
        );

        let assessment = result.analysis.unwrap();
        assert_eq!(assessment.market_score, Some(82));
        assert_eq!(assessment.cv_score, Some(74));
    }

    #[test]
    fn test_wrong_types_become_absent() {
        let result: AnalysisResult = serde_json::from_value(json!({
            "name": { "first": "Jane" },
            "skills": "Rust",
            "currentPosition": "Engineer at Acme",
            "careerAnalysis": { "totalYearsOfExperience": "seven", "positionHistory": "none" },
            "analysis": { "marketScore": "85%", "cvScore": 140, "strengths": "great" }
        }))
        .unwrap();

        assert_eq!(result.name, None);
        assert_eq!(result.skills, vec!["Rust"]);
        assert_eq!(result.current_position, None);
        let career = result.career_analysis.unwrap();
        assert_eq!(career.total_years_of_experience, None);
        assert!(career.position_history.is_empty());
        let assessment = result.analysis.unwrap();
        assert_eq!(assessment.market_score, Some(85));
        assert_eq!(assessment.cv_score, Some(100));
        assert_eq!(assessment.strengths, None);
    }

    #[test]
    fn test_priority_is_case_insensitive_and_unknown_is_dropped() {
        let result: MatchResult = serde_json::from_value(json!({
            "improvements": [
                { "category": "Skills", "details": "Learn Kafka", "priority": "HIGH" },
                { "category": "Format", "details": "Shorten", "priority": "urgent" },
                "not an object"
            ]
        }))
        .unwrap();

        assert_eq!(result.improvements.len(), 2);
        assert_eq!(result.improvements[0].priority, Some(Priority::High));
        assert_eq!(result.improvements[1].priority, None);
    }

    #[test]
    fn test_match_result_scalars() {
        let result: MatchResult = serde_json::from_value(json!({
            "matchRate": 67.6,
            "suitable": "yes",
            "analysis": { "strengths": ["Rust"], "gaps": ["Kafka"], "recommendations": [] }
        }))
        .unwrap();

        assert_eq!(result.match_rate, Some(68));
        assert_eq!(result.suitable, Some(true));
        assert_eq!(result.analysis.unwrap().gaps, vec!["Kafka"]);
    }

    #[test]
    fn test_serializes_camel_case_with_source_tag() {
        let result = AnalysisResult {
            source: AnalysisSource::Fallback,
            raw_text: "text".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["source"], "fallback");
        assert_eq!(value["rawText"], "text");
        assert!(value.get("currentPosition").is_some());
        assert!(value.get("jobMatch").is_none());
    }
}
