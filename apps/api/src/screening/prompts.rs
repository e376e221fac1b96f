// All LLM prompt constants for the Screening module.
// Reuses cross-cutting fragments from llm_client::prompts.

use serde_json::{json, Value};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::models::{Application, Job};

/// System prompt for candidate screening.
pub fn screening_system() -> String {
    format!("You are an expert HR Recruiter who scores candidates strictly against job requirements. {JSON_ONLY_SYSTEM}")
}

/// Response schema: an array of `{applicationId, score, feedback}`, all required.
pub fn screening_response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "applicationId": {"type": "STRING"},
                "score": {"type": "NUMBER"},
                "feedback": {"type": "STRING"}
            },
            "required": ["applicationId", "score", "feedback"]
        }
    })
}

fn candidate_block(app: &Application) -> String {
    format!(
        "Candidate (ID: {}):\nName: {}\nSkills Description: {}",
        app.id, app.candidate_name, app.resume_text
    )
}

/// Builds the screening prompt. Built in one pass so candidate text can never be
/// mistaken for a template placeholder.
pub fn build_screening_prompt(job: &Job, applications: &[Application]) -> String {
    let candidates = applications
        .iter()
        .map(candidate_block)
        .collect::<Vec<_>>()
        .join("\n---\n");

    format!(
        r#"You are an expert HR Recruiter. Your task is to analyze candidate compatibility for the following job:

JOB TITLE: {title}
COMPANY: {company}
REQUIREMENTS: {requirements}
DESCRIPTION: {description}

Please evaluate the following candidates based on their expertise and skills:

{candidates}

For each candidate, provide:
1. A match score (0-100) based strictly on requirements.
2. A professional feedback summary (max 2 sentences) explaining the score.

Return a JSON ARRAY with exactly one object per candidate:
[
  {{"applicationId": "<the exact candidate ID above>", "score": 85, "feedback": "..."}}
]"#,
        title = job.title,
        company = job.company,
        requirements = job.requirements.join(", "),
        description = job.description,
    )
}
