use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    duplicate_application, duplicate_email, AiVerdict, ApplicationFilter, ReviewUpdate, Store,
};
use crate::errors::AppError;
use crate::models::{Application, Job, User};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    jobs: Vec<Job>,
    applications: Vec<Application>,
    seed_markers: HashSet<String>,
}

/// In-process store. Everything is lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(duplicate_email());
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, AppError> {
        let tables = self.tables.read().await;
        let mut jobs = tables.jobs.clone();
        jobs.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
        Ok(jobs)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn insert_job(&self, job: &Job) -> Result<(), AppError> {
        self.tables.write().await.jobs.push(job.clone());
        Ok(())
    }

    async fn update_job(&self, job: &Job) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        match tables.jobs.iter_mut().find(|j| j.id == job.id) {
            Some(existing) => {
                *existing = job.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn seed_jobs(&self, marker: &str, jobs: &[Job]) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.seed_markers.insert(marker.to_string()) {
            return Ok(false);
        }
        tables.jobs.extend(jobs.iter().cloned());
        Ok(true)
    }

    async fn list_applications(
        &self,
        filter: ApplicationFilter,
    ) -> Result<Vec<Application>, AppError> {
        let tables = self.tables.read().await;
        let mut apps: Vec<Application> = tables
            .applications
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        apps.sort_by(|a, b| a.applied_at.cmp(&b.applied_at));
        Ok(apps)
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn insert_application(&self, app: &Application) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let already_applied = tables.applications.iter().any(|a| {
            a.job_id == app.job_id && a.candidate_email.eq_ignore_ascii_case(&app.candidate_email)
        });
        if already_applied {
            return Err(duplicate_application());
        }
        tables.applications.push(app.clone());
        Ok(())
    }

    async fn set_ai_verdicts(&self, verdicts: &[AiVerdict]) -> Result<usize, AppError> {
        let by_id: HashMap<Uuid, &AiVerdict> =
            verdicts.iter().map(|v| (v.application_id, v)).collect();
        let mut tables = self.tables.write().await;
        let mut changed = 0;
        for stored in tables.applications.iter_mut() {
            if let Some(verdict) = by_id.get(&stored.id) {
                stored.ai_score = Some(verdict.score);
                stored.ai_feedback = Some(verdict.feedback.clone());
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn mark_viewed(&self, job_id: Uuid, at: DateTime<Utc>) -> Result<usize, AppError> {
        let mut tables = self.tables.write().await;
        let mut changed = 0;
        for stored in tables
            .applications
            .iter_mut()
            .filter(|a| a.job_id == job_id && a.viewed_at.is_none())
        {
            stored.viewed_at = Some(at);
            changed += 1;
        }
        Ok(changed)
    }

    async fn update_review(
        &self,
        id: Uuid,
        review: &ReviewUpdate,
    ) -> Result<Option<Application>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .applications
            .iter_mut()
            .find(|a| a.id == id)
            .map(|stored| {
                review.apply_to(stored);
                stored.clone()
            }))
    }
}
