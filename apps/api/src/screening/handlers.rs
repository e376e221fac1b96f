//! Axum route handler for AI screening.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::jobs::handlers::load_job;
use crate::models::{Application, UserRole};
use crate::screening::merge::collect_verdicts;
use crate::state::AppState;
use crate::store::ApplicationFilter;

#[derive(Debug, Serialize)]
pub struct ScreeningResult {
    /// Number of applications that received a score in this run.
    pub screened: usize,
    pub backend: &'static str,
    /// The job's applications after scoring, in apply order.
    pub applications: Vec<Application>,
}

/// POST /api/v1/jobs/:id/screen
///
/// Scores every application for the job. Only the score and feedback fields are written,
/// so reviews made while the screener runs are kept.
pub async fn handle_screen_job(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ScreeningResult>, AppError> {
    let hr = current.require(UserRole::Hr)?;
    let job = load_job(&state, job_id).await?;

    let applications = state
        .store
        .list_applications(ApplicationFilter::ForJob(job_id))
        .await?;
    if applications.is_empty() {
        return Ok(Json(ScreeningResult {
            screened: 0,
            backend: state.screener.backend(),
            applications,
        }));
    }

    let recommendations = state.screener.screen(&job, &applications).await?;
    let verdicts = collect_verdicts(&applications, &recommendations);
    let screened = if verdicts.is_empty() {
        0
    } else {
        state.store.set_ai_verdicts(&verdicts).await?
    };

    info!(
        "HR user {} screened job {}: {}/{} applications scored",
        hr.id,
        job_id,
        screened,
        applications.len()
    );

    // Re-read so reviews made while the screener ran are reflected.
    let applications = state
        .store
        .list_applications(ApplicationFilter::ForJob(job_id))
        .await?;

    Ok(Json(ScreeningResult {
        screened,
        backend: state.screener.backend(),
        applications,
    }))
}
