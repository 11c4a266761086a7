//! Résumé analyzer: provider call, parsing and fallback.

use std::sync::Arc;

use tracing::{info, warn};

use crate::analysis::fallback::extract_fields;
use crate::analysis::json::{parse_model_output, ANALYSIS_KEYS, MATCH_KEYS};
use crate::analysis::models::{AnalysisResult, AnalysisSource, MatchResult};
use crate::analysis::prompts::{render_job_match, render_resume_analysis};
use crate::analysis::AnalysisError;
use crate::llm_client::AnalysisProvider;

/// Turns extracted text into an `AnalysisResult`, optionally with an embedded job match.
///
/// CRITICAL: every call sends the full résumé text (and job description) to the
/// configured third-party provider.
#[derive(Clone)]
pub struct ResumeAnalyzer {
    provider: Arc<dyn AnalysisProvider>,
}

impl ResumeAnalyzer {
    pub fn new(provider: Arc<dyn AnalysisProvider>) -> Self {
        Self { provider }
    }

    /// Analyzes `text`; with a non-blank job description also produces a `MatchResult`.
    ///
    /// The résumé analysis never fails (it falls back to regex extraction). The match
    /// has no fallback: its failure is the error of the whole call.
    pub async fn analyze(
        &self,
        text: &str,
        job_description: Option<&str>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let job_description = job_description.map(str::trim).filter(|jd| !jd.is_empty());

        let Some(job_description) = job_description else {
            return Ok(self.analyze_resume(text).await);
        };

        let (mut result, job_match) = tokio::join!(
            self.analyze_resume(text),
            self.match_job(text, job_description)
        );
        result.job_match = Some(job_match?);
        Ok(result)
    }

    /// Provider analysis with regex fallback. `raw_text` is always `text` and
    /// `job_match` is always `None`.
    pub async fn analyze_resume(&self, text: &str) -> AnalysisResult {
        match self.request_analysis(text).await {
            Ok(mut result) => {
                result.source = AnalysisSource::Ai;
                result.raw_text = text.to_string();
                result.job_match = None;
                info!("Résumé analysis completed: skills={}", result.skills.len());
                result
            }
            Err(e) => {
                warn!("Résumé analysis failed, using regex fallback: {e}");
                extract_fields(text)
            }
        }
    }

    /// Compares `text` against `job_description`. Errors propagate.
    pub async fn match_job(
        &self,
        text: &str,
        job_description: &str,
    ) -> Result<MatchResult, AnalysisError> {
        let reply = self
            .provider
            .generate(&render_job_match(text, job_description))
            .await?;
        let result: MatchResult = parse_model_output(&reply, MATCH_KEYS)?;
        info!("Job match completed: match_rate={:?}", result.match_rate);
        Ok(result)
    }

    async fn request_analysis(&self, text: &str) -> Result<AnalysisResult, AnalysisError> {
        let reply = self.provider.generate(&render_resume_analysis(text)).await?;
        parse_model_output(&reply, ANALYSIS_KEYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fakes::ScriptedProvider;

    const ANALYSIS_REPLY: &str = r#"Here you go:
```json
{
  "name": "Jane Doe",
  "email": "jane@example.com",
  "skills": ["Go", "Rust"],
  "analysis": { "marketScore": 81, "cvScore": 77 }
}
```"#;

    const MATCH_REPLY: &str = r#"{"matchRate": 72, "suitable": true, "improvements": [{"category": "Skills", "details": "Add Kafka", "priority": "high"}]}"#;

    fn analyzer(provider: ScriptedProvider) -> (ResumeAnalyzer, Arc<ScriptedProvider>) {
        let provider = Arc::new(provider);
        (ResumeAnalyzer::new(provider.clone()), provider)
    }

    #[tokio::test]
    async fn test_provider_result_is_tagged_ai_and_keeps_raw_text() {
        let (analyzer, provider) = analyzer(ScriptedProvider::new(Some(ANALYSIS_REPLY), None));
        let text = "Name: Jane Doe Skills: Go, Rust";

        let result = analyzer.analyze(text, None).await.unwrap();

        assert_eq!(result.source, AnalysisSource::Ai);
        assert_eq!(result.name.as_deref(), Some("Jane Doe"));
        assert_eq!(result.analysis.unwrap().market_score, Some(81));
        assert_eq!(result.raw_text, text);
        assert!(result.job_match.is_none());
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_regex() {
        let (analyzer, _) = analyzer(ScriptedProvider::unreachable());
        let text = "Name: Jane Doe Email: jane@example.com Skills: Go, Rust";

        let result = analyzer.analyze(text, None).await.unwrap();

        assert_eq!(result.source, AnalysisSource::Fallback);
        assert_eq!(result.name.as_deref(), Some("Jane Doe"));
        assert_eq!(result.email.as_deref(), Some("jane@example.com"));
        assert_eq!(result.skills, vec!["Go", "Rust"]);
        assert_eq!(result.raw_text, text);
    }

    #[tokio::test]
    async fn test_unparseable_reply_falls_back_to_regex() {
        let (analyzer, _) = analyzer(ScriptedProvider::new(
            Some("I'm sorry, I can't read this resume."),
            None,
        ));

        let result = analyzer.analyze("Skills: Rust", None).await.unwrap();

        assert_eq!(result.source, AnalysisSource::Fallback);
        assert_eq!(result.skills, vec!["Rust"]);
    }

    #[tokio::test]
    async fn test_job_description_embeds_match() {
        let (analyzer, provider) =
            analyzer(ScriptedProvider::new(Some(ANALYSIS_REPLY), Some(MATCH_REPLY)));

        let result = analyzer
            .analyze("Name: Jane Doe", Some("Senior Rust Engineer"))
            .await
            .unwrap();

        let job_match = result.job_match.unwrap();
        assert_eq!(job_match.match_rate, Some(72));
        assert_eq!(job_match.suitable, Some(true));
        assert_eq!(job_match.improvements.len(), 1);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_match_failure_propagates_even_when_analysis_falls_back() {
        let (analyzer, _) = analyzer(ScriptedProvider::unreachable());

        let err = analyzer
            .analyze("Name: Jane Doe", Some("Senior Rust Engineer"))
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unparseable_match_is_parse_failure() {
        let (analyzer, _) = analyzer(ScriptedProvider::new(None, Some("no idea")));

        let err = analyzer.match_job("text", "job").await.unwrap_err();

        assert!(matches!(err, AnalysisError::ParseFailed(_)));
    }

    #[tokio::test]
    async fn test_unrequested_job_match_from_provider_is_dropped() {
        let reply = r#"{"name": "Jane", "jobMatch": {"matchRate": 99, "suitable": true}}"#;
        let (analyzer, provider) = analyzer(ScriptedProvider::new(Some(reply), None));

        let result = analyzer.analyze("Name: Jane", None).await.unwrap();

        assert_eq!(result.source, AnalysisSource::Ai);
        assert_eq!(result.name.as_deref(), Some("Jane"));
        assert!(result.job_match.is_none());
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_job_match_comes_from_match_call_not_analysis_reply() {
        let reply = r#"{"name": "Jane", "jobMatch": {"matchRate": 99}}"#;
        let (analyzer, _) = analyzer(ScriptedProvider::new(Some(reply), Some(MATCH_REPLY)));

        let result = analyzer.analyze("Name: Jane", Some("Rust Engineer")).await.unwrap();

        assert_eq!(result.job_match.unwrap().match_rate, Some(72));
    }

    #[tokio::test]
    async fn test_blank_job_description_is_ignored() {
        let (analyzer, provider) = analyzer(ScriptedProvider::new(Some(ANALYSIS_REPLY), None));

        let result = analyzer.analyze("Name: Jane Doe", Some("   ")).await.unwrap();

        assert!(result.job_match.is_none());
        assert_eq!(provider.call_count(), 1);
    }
}
