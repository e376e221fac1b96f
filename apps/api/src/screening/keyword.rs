use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{Application, Job, Recommendation};
use crate::screening::CandidateScreener;

const SKILL_MATCH: f64 = 1.0;
const TEXT_MATCH: f64 = 0.6;

/// Pure-Rust requirement matcher. Fast, deterministic, no LLM call.
///
/// Algorithm, per job requirement:
/// - exact (case-insensitive) match in the candidate's skills → strength 1.0
/// - substring of the resume text → strength 0.6
/// - otherwise → strength 0.0
///
/// score = mean strength × 100, rounded.
pub struct KeywordScreener;

#[async_trait]
impl CandidateScreener for KeywordScreener {
    async fn screen(
        &self,
        job: &Job,
        applications: &[Application],
    ) -> Result<Vec<Recommendation>, AppError> {
        Ok(applications
            .iter()
            .map(|app| score_application(&job.requirements, app))
            .collect())
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

/// How well one candidate covers one requirement.
#[derive(Debug, Clone, PartialEq)]
struct RequirementMatch {
    requirement: String,
    strength: f64,
}

fn requirement_strength(requirement: &str, app: &Application, resume_lower: &str) -> f64 {
    let requirement_lower = requirement.to_lowercase();
    if app
        .skills
        .iter()
        .any(|s| s.trim().to_lowercase() == requirement_lower)
    {
        SKILL_MATCH
    } else if resume_lower.contains(&requirement_lower) {
        TEXT_MATCH
    } else {
        0.0
    }
}

fn score_application(requirements: &[String], app: &Application) -> Recommendation {
    if requirements.is_empty() {
        return Recommendation {
            application_id: app.id.to_string(),
            score: 0.0,
            feedback: "The job lists no requirements, so fit cannot be scored.".to_string(),
            strengths: Some(vec![]),
            weaknesses: Some(vec![]),
            recommended_actions: None,
        };
    }

    let resume_lower = app.resume_text.to_lowercase();
    let matches: Vec<RequirementMatch> = requirements
        .iter()
        .map(|r| RequirementMatch {
            requirement: r.clone(),
            strength: requirement_strength(r, app, &resume_lower),
        })
        .collect();

    let total: f64 = matches.iter().map(|m| m.strength).sum();
    let score = (total / matches.len() as f64 * 100.0).round();

    let strengths: Vec<String> = matches
        .iter()
        .filter(|m| m.strength > 0.0)
        .map(|m| {
            if m.strength >= SKILL_MATCH {
                format!("Lists {} as a skill", m.requirement)
            } else {
                format!("Mentions {} in the resume", m.requirement)
            }
        })
        .collect();
    let missing: Vec<&str> = matches
        .iter()
        .filter(|m| m.strength == 0.0)
        .map(|m| m.requirement.as_str())
        .collect();
    let weaknesses: Vec<String> = missing.iter().map(|r| format!("No evidence of {r}")).collect();

    Recommendation {
        application_id: app.id.to_string(),
        score,
        feedback: build_feedback(score as u32, &matches, &missing),
        strengths: Some(strengths),
        weaknesses: Some(weaknesses),
        recommended_actions: None,
    }
}

/// Two sentences at most: a verdict, then what is covered or missing.
fn build_feedback(score: u32, matches: &[RequirementMatch], missing: &[&str]) -> String {
    let matched: Vec<&str> = matches
        .iter()
        .filter(|m| m.strength > 0.0)
        .map(|m| m.requirement.as_str())
        .collect();

    let verdict = if score >= 80 {
        format!("Strong fit ({score}/100).")
    } else if score >= 60 {
        format!("Moderate fit ({score}/100).")
    } else {
        format!("Low fit ({score}/100).")
    };

    if missing.is_empty() {
        format!("{verdict} Covers {}.", matched.join(", "))
    } else if matched.is_empty() {
        format!("{verdict} Missing {}.", missing.join(", "))
    } else {
        format!(
            "{verdict} Covers {}; missing {}.",
            matched.join(", "),
            missing.join(", ")
        )
    }
}
