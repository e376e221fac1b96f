//! Axum route handlers for the Jobs API.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::jobs::validation::{validate_draft, JobDraft};
use crate::models::{Job, UserRole};
use crate::state::AppState;
use crate::store::ApplicationFilter;

/// A job as listed on the board. HR callers also get the applicant count.
#[derive(Debug, Serialize)]
pub struct JobListing {
    #[serde(flatten)]
    pub job: Job,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant_count: Option<usize>,
}

/// Loads a job or fails with `NotFound`.
pub(crate) async fn load_job(state: &AppState, id: Uuid) -> Result<Job, AppError> {
    state
        .store
        .get_job(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

/// GET /api/v1/jobs
///
/// Candidates see active postings only; HR sees everything with applicant counts.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<JobListing>>, AppError> {
    let jobs = state.store.list_jobs().await?;

    let listings = match current.user.role {
        UserRole::Candidate => jobs
            .into_iter()
            .filter(|j| j.is_active)
            .map(|job| JobListing {
                job,
                applicant_count: None,
            })
            .collect(),
        UserRole::Hr => {
            let mut counts: HashMap<Uuid, usize> = HashMap::new();
            for app in state.store.list_applications(ApplicationFilter::All).await? {
                *counts.entry(app.job_id).or_default() += 1;
            }
            jobs.into_iter()
                .map(|job| JobListing {
                    applicant_count: Some(counts.get(&job.id).copied().unwrap_or(0)),
                    job,
                })
                .collect()
        }
    };

    Ok(Json(listings))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, AppError> {
    let job = load_job(&state, id).await?;
    if current.user.role == UserRole::Candidate && !job.is_active {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    Ok(Json(job))
}

/// POST /api/v1/jobs
pub async fn handle_post_job(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(draft): Json<JobDraft>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let hr = current.require(UserRole::Hr)?;
    let job = validate_draft(draft)?.into_job(hr.id, Utc::now());

    state.store.insert_job(&job).await?;
    info!("HR user {} posted job {} ({})", hr.id, job.id, job.title);

    Ok((StatusCode::CREATED, Json(job)))
}

/// PUT /api/v1/jobs/:id
///
/// Any HR user may edit any posting.
pub async fn handle_update_job(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(draft): Json<JobDraft>,
) -> Result<Json<Job>, AppError> {
    let hr = current.require(UserRole::Hr)?;
    let valid = validate_draft(draft)?;

    let mut job = load_job(&state, id).await?;
    valid.apply_to(&mut job);

    if !state.store.update_job(&job).await? {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    info!("HR user {} updated job {}", hr.id, job.id);

    Ok(Json(job))
}
