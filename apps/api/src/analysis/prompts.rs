// Analysis prompt templates.
// Placeholders are filled with `str::replace`; the shared JSON and score
// instructions from llm_client::prompts are appended by the render helpers.

use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, SCORE_RANGE_INSTRUCTION};

pub const RESUME_ANALYSIS_PROMPT: &str = r#"Analyze the following resume and return a JSON object describing the candidate.

RESUME TEXT:
{resume_text}

OUTPUT SCHEMA (return exactly this structure; use null or [] for anything not stated in the resume):
{
  "name": "string",
  "email": "string",
  "skills": ["string"],
  "experience": "string",
  "currentPosition": { "title": "string", "designation": "string", "company": "string", "duration": "string" },
  "careerAnalysis": {
    "currentLevel": "string",
    "totalYearsOfExperience": number,
    "positionHistory": [
      { "title": "string", "designation": "string", "company": "string", "duration": "string", "level": "string", "responsibilities": ["string"] }
    ],
    "suggestedNextRole": "string",
    "careerProgression": "string",
    "progressionRoadmap": {
      "targetRole": "string",
      "estimatedTimeframe": "string",
      "requiredSkills": [
        { "skill": "string", "priority": "high" | "medium" | "low", "currentLevel": "none" | "basic" | "intermediate" | "advanced", "actionItems": ["string"] }
      ],
      "milestones": [ { "title": "string", "timeframe": "string", "actions": ["string"] } ]
    }
  },
  "analysis": {
    "strengths": { "skills": ["string"], "experience": ["string"], "marketAlignment": ["string"] },
    "improvements": { "skills": ["string"], "experience": ["string"], "suggestions": ["string"] },
    "marketScore": number,
    "cvScore": number
  }
}

List positionHistory from most recent to oldest."#;

pub const JOB_MATCH_PROMPT: &str = r#"Compare the following resume against the job description and return a JSON object describing the fit.

RESUME TEXT:
{resume_text}

JOB DESCRIPTION:
{job_description}

OUTPUT SCHEMA (return exactly this structure):
{
  "matchRate": number,
  "suitable": boolean,
  "cvSummary": { "position": "string", "experience": ["string"], "skills": ["string"] },
  "jobSummary": { "title": "string", "responsibilities": ["string"], "requirements": ["string"] },
  "improvements": [ { "category": "string", "details": "string", "priority": "high" | "medium" | "low" } ],
  "analysis": { "strengths": ["string"], "gaps": ["string"], "recommendations": ["string"] }
}

Order improvements from highest to lowest impact."#;

pub fn render_resume_analysis(resume_text: &str) -> String {
    format!(
        "{}\n\n{}\n{}",
        fill(RESUME_ANALYSIS_PROMPT, &[("{resume_text}", resume_text)]),
        SCORE_RANGE_INSTRUCTION,
        JSON_ONLY_INSTRUCTION
    )
}

pub fn render_job_match(resume_text: &str, job_description: &str) -> String {
    format!(
        "{}\n\n{}\n{}",
        fill(
            JOB_MATCH_PROMPT,
            &[
                ("{resume_text}", resume_text),
                ("{job_description}", job_description),
            ],
        ),
        SCORE_RANGE_INSTRUCTION,
        JSON_ONLY_INSTRUCTION
    )
}

/// Substitutes placeholders in one pass over `template`; inserted values are never
/// scanned for placeholders.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    loop {
        let next = values
            .iter()
            .filter_map(|&(placeholder, value)| {
                rest.find(placeholder).map(|at| (at, placeholder, value))
            })
            .min_by_key(|&(at, _, _)| at);
        let Some((at, placeholder, value)) = next else {
            out.push_str(rest);
            return out;
        };
        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + placeholder.len()..];
    }
}
