//! Axum route handlers for the talent views.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::jobs::handlers::load_job;
use crate::models::UserRole;
use crate::state::AppState;
use crate::store::ApplicationFilter;
use crate::talent::{
    dashboard_stats, talent_pool, talent_report, DashboardStats, TalentPoolEntry, TalentReport,
};

/// GET /api/v1/jobs/:id/talent
pub async fn handle_talent_report(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<TalentReport>, AppError> {
    current.require(UserRole::Hr)?;
    let job = load_job(&state, job_id).await?;
    let applications = state
        .store
        .list_applications(ApplicationFilter::ForJob(job_id))
        .await?;

    Ok(Json(talent_report(&job, &applications)))
}

/// GET /api/v1/talent
pub async fn handle_talent_pool(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<TalentPoolEntry>>, AppError> {
    current.require(UserRole::Hr)?;
    let jobs = state.store.list_jobs().await?;
    let applications = state.store.list_applications(ApplicationFilter::All).await?;

    Ok(Json(talent_pool(&jobs, &applications)))
}

/// GET /api/v1/dashboard/stats
pub async fn handle_dashboard_stats(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<DashboardStats>, AppError> {
    current.require(UserRole::Hr)?;
    let jobs = state.store.list_jobs().await?;
    let applications = state.store.list_applications(ApplicationFilter::All).await?;

    Ok(Json(dashboard_stats(&jobs, &applications)))
}
