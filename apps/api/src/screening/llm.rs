use async_trait::async_trait;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::{Application, Job, Recommendation};
use crate::screening::prompts::{
    build_screening_prompt, screening_response_schema, screening_system,
};
use crate::screening::CandidateScreener;

/// Semantic screener backed by the hosted Gemini model.
pub struct LlmScreener(pub LlmClient);

#[async_trait]
impl CandidateScreener for LlmScreener {
    async fn screen(
        &self,
        job: &Job,
        applications: &[Application],
    ) -> Result<Vec<Recommendation>, AppError> {
        let prompt = build_screening_prompt(job, applications);
        let schema = screening_response_schema();

        let recommendations: Vec<Recommendation> = self
            .0
            .call_json(&prompt, &screening_system(), Some(&schema))
            .await
            .map_err(screening_error)?;

        info!(
            "LLM screened job {}: {} candidates, {} verdicts",
            job.id,
            applications.len(),
            recommendations.len()
        );
        Ok(recommendations)
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

fn screening_error(e: LlmError) -> AppError {
    match e {
        LlmError::MissingApiKey => AppError::ServiceUnavailable(e.to_string()),
        LlmError::EmptyContent => AppError::Llm(e.to_string()),
        other => AppError::Llm(format!("Failed to analyze applications: {other}")),
    }
}
