//! Axum route handlers for the Applications API.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::applications::resume::{
    build_resume_text, extract_text, sanitize_file_name, validate_pdf,
};
use crate::applications::storage::resume_key;
use crate::auth::service::{normalize_email, validate_email};
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::jobs::handlers::load_job;
use crate::jobs::validation::split_csv;
use crate::models::{Application, ApplicationStatus, UserRole};
use crate::state::AppState;
use crate::store::{duplicate_application, ApplicationFilter, ReviewUpdate};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct JobSummary {
    pub title: String,
    pub company: String,
    pub location: String,
}

#[derive(Debug, Serialize)]
pub struct MyApplication {
    #[serde(flatten)]
    pub application: Application,
    /// `None` if the job has since been removed.
    pub job: Option<JobSummary>,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationUpdate {
    pub status: Option<ApplicationStatus>,
    pub notes: Option<String>,
}

/// Fields collected from the multipart apply form.
#[derive(Debug, Default)]
struct ApplyForm {
    candidate_name: Option<String>,
    candidate_email: Option<String>,
    skills: Option<String>,
    resume: Option<ResumeUpload>,
}

#[derive(Debug)]
struct ResumeUpload {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("File is too large. Please upload a PDF under 2MB.".to_string())
    } else {
        AppError::Validation(format!("Malformed form data: {}", e.body_text()))
    }
}

async fn read_apply_form(mut multipart: Multipart) -> Result<ApplyForm, AppError> {
    let mut form = ApplyForm::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                form.resume = Some(ResumeUpload {
                    file_name,
                    content_type,
                    data,
                });
            }
            "candidate_name" => form.candidate_name = Some(field.text().await.map_err(multipart_error)?),
            "candidate_email" => form.candidate_email = Some(field.text().await.map_err(multipart_error)?),
            "skills" => form.skills = Some(field.text().await.map_err(multipart_error)?),
            _ => {} // unknown fields are ignored
        }
    }
    Ok(form)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/:id/applications
///
/// Multipart form: `candidate_name`, `candidate_email`, `skills`, and a `resume` PDF part.
/// Name and email default to the signed-in candidate's.
pub async fn handle_apply(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(job_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let candidate = current.require(UserRole::Candidate)?;
    let form = read_apply_form(multipart).await?;

    let candidate_name = non_blank(form.candidate_name).unwrap_or_else(|| candidate.name.clone());
    let candidate_email = non_blank(form.candidate_email)
        .map(|e| normalize_email(&e))
        .unwrap_or_else(|| candidate.email.clone());
    validate_email(&candidate_email)?;

    let skills_input = non_blank(form.skills)
        .ok_or_else(|| AppError::Validation("skills cannot be empty".to_string()))?;
    let skills = split_csv(&skills_input);
    if skills.is_empty() {
        return Err(AppError::Validation("skills cannot be empty".to_string()));
    }

    let resume = form
        .resume
        .filter(|r| !r.data.is_empty())
        .ok_or_else(|| AppError::Validation("Please upload your resume PDF.".to_string()))?;
    validate_pdf(resume.content_type.as_deref(), &resume.data)?;

    let job = load_job(&state, job_id).await?;
    if !job.is_active {
        return Err(AppError::Validation(
            "Job is no longer accepting applications".to_string(),
        ));
    }

    let already_applied = state
        .store
        .list_applications(ApplicationFilter::ForJob(job_id))
        .await?
        .iter()
        .any(|a| a.candidate_email.eq_ignore_ascii_case(&candidate_email));
    if already_applied {
        return Err(duplicate_application());
    }

    let extracted = extract_text(resume.data.clone()).await;

    let id = Uuid::new_v4();
    let key = resume_key(id);
    state.resumes.put(&key, resume.data).await?;

    let application = Application {
        id,
        job_id,
        candidate_id: Some(candidate.id),
        candidate_name,
        candidate_email,
        resume_text: build_resume_text(&skills_input, extracted.as_deref()),
        resume_key: Some(key.clone()),
        resume_file_name: resume.file_name.map(|n| sanitize_file_name(&n)),
        skills,
        applied_at: Utc::now(),
        status: ApplicationStatus::Pending,
        ai_score: None,
        ai_feedback: None,
        viewed_at: None,
        notes: None,
    };
    // The store rejects a concurrent duplicate; drop the uploaded PDF with it.
    if let Err(e) = state.store.insert_application(&application).await {
        if let Err(cleanup) = state.resumes.delete(&key).await {
            warn!("Failed to remove orphaned resume {key}: {cleanup}");
        }
        return Err(e);
    }
    info!(
        "Candidate {} applied to job {} (application {})",
        candidate.id, job_id, application.id
    );

    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/applications/mine
///
/// Applications filed from the caller's account, newest first.
pub async fn handle_my_applications(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<MyApplication>>, AppError> {
    let candidate = current.require(UserRole::Candidate)?;

    let mut applications = state
        .store
        .list_applications(ApplicationFilter::ForCandidate(candidate.id))
        .await?;
    applications.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));

    let jobs = state.store.list_jobs().await?;
    let mine = applications
        .into_iter()
        .map(|application| {
            let job = jobs
                .iter()
                .find(|j| j.id == application.job_id)
                .map(|j| JobSummary {
                    title: j.title.clone(),
                    company: j.company.clone(),
                    location: j.location.clone(),
                });
            MyApplication { application, job }
        })
        .collect();

    Ok(Json(mine))
}

/// GET /api/v1/jobs/:id/applications
///
/// Applicants for one job in the order they applied. Marks unseen ones as viewed.
pub async fn handle_job_applications(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<Application>>, AppError> {
    current.require(UserRole::Hr)?;
    load_job(&state, job_id).await?;

    state.store.mark_viewed(job_id, Utc::now()).await?;
    let applications = state
        .store
        .list_applications(ApplicationFilter::ForJob(job_id))
        .await?;

    Ok(Json(applications))
}

/// PATCH /api/v1/applications/:id
pub async fn handle_update_application(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(update): Json<ApplicationUpdate>,
) -> Result<Json<Application>, AppError> {
    let hr = current.require(UserRole::Hr)?;

    let review = ReviewUpdate {
        status: update.status,
        notes: update.notes.map(|n| non_blank(Some(n))),
    };
    let application = state
        .store
        .update_review(id, &review)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;
    info!(
        "HR user {} set application {} to {}",
        hr.id,
        id,
        application.status.as_str()
    );

    Ok(Json(application))
}

/// GET /api/v1/applications/:id/resume
///
/// Streams the stored PDF. HR may read any resume; candidates only those filed from their account.
pub async fn handle_get_resume(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let application = state
        .store
        .get_application(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;

    let user = &current.user;
    let is_owner = application.candidate_id == Some(user.id);
    if user.role != UserRole::Hr && !is_owner {
        return Err(AppError::Forbidden);
    }

    let no_resume = || AppError::NotFound("No PDF resume available.".to_string());
    let key = application.resume_key.as_deref().ok_or_else(no_resume)?;
    let pdf = state.resumes.get(key).await?.ok_or_else(no_resume)?;

    let file_name = application
        .resume_file_name
        .unwrap_or_else(|| "resume.pdf".to_string());
    Ok((
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (CONTENT_DISPOSITION, format!("inline; filename=\"{file_name}\"")),
        ],
        pdf,
    ))
}
