//! Record storage for users, jobs and applications.
//!
//! Handlers only see `Arc<dyn Store>`. `PgStore` backs hosted deployments and
//! `MemoryStore` backs local runs and tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Application, ApplicationStatus, Job, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Which applications `Store::list_applications` returns.
#[derive(Debug, Clone)]
pub enum ApplicationFilter {
    All,
    ForJob(Uuid),
    /// Applications filed by this user account.
    ForCandidate(Uuid),
}

impl ApplicationFilter {
    pub fn matches(&self, app: &Application) -> bool {
        match self {
            ApplicationFilter::All => true,
            ApplicationFilter::ForJob(job_id) => app.job_id == *job_id,
            ApplicationFilter::ForCandidate(user_id) => app.candidate_id == Some(*user_id),
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Fails with `AppError::Conflict` when the email is already registered.
    async fn insert_user(&self, user: &User) -> Result<(), AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// All jobs, newest first.
    async fn list_jobs(&self) -> Result<Vec<Job>, AppError>;

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>, AppError>;

    async fn insert_job(&self, job: &Job) -> Result<(), AppError>;

    /// Replaces the stored job with the same id. Returns false if there was none.
    async fn update_job(&self, job: &Job) -> Result<bool, AppError>;

    /// Inserts `jobs` the first time `marker` is seen. Returns whether anything was inserted.
    async fn seed_jobs(&self, marker: &str, jobs: &[Job]) -> Result<bool, AppError>;

    /// Matching applications in the order they were submitted.
    async fn list_applications(
        &self,
        filter: ApplicationFilter,
    ) -> Result<Vec<Application>, AppError>;

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>, AppError>;

    /// Fails with `AppError::Conflict` when the same email already applied to the job
    /// (case-insensitive).
    async fn insert_application(&self, app: &Application) -> Result<(), AppError>;

    /// Sets `ai_score` and `ai_feedback` only. Unknown ids are skipped.
    /// Returns the number of rows changed.
    async fn set_ai_verdicts(&self, verdicts: &[AiVerdict]) -> Result<usize, AppError>;

    /// Stamps `viewed_at` on the job's applications that have never been viewed.
    async fn mark_viewed(&self, job_id: Uuid, at: DateTime<Utc>) -> Result<usize, AppError>;

    /// Applies an HR review to one application and returns the stored result.
    /// `None` if the id is unknown.
    async fn update_review(
        &self,
        id: Uuid,
        review: &ReviewUpdate,
    ) -> Result<Option<Application>, AppError>;
}

/// One screening outcome, already clamped to 0..=100.
#[derive(Debug, Clone, PartialEq)]
pub struct AiVerdict {
    pub application_id: Uuid,
    pub score: i32,
    pub feedback: String,
}

/// Fields an HR review may change. `None` leaves the stored value alone;
/// `notes: Some(None)` clears the note.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewUpdate {
    pub status: Option<ApplicationStatus>,
    pub notes: Option<Option<String>>,
}

impl ReviewUpdate {
    pub fn apply_to(&self, app: &mut Application) {
        if let Some(status) = self.status {
            app.status = status;
        }
        if let Some(notes) = &self.notes {
            app.notes = notes.clone();
        }
    }
}

pub(crate) fn duplicate_email() -> AppError {
    AppError::Conflict("Email already registered".to_string())
}

pub(crate) fn duplicate_application() -> AppError {
    AppError::Conflict("You have already applied to this job".to_string())
}
