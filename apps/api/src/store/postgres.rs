use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use super::{
    duplicate_application, duplicate_email, AiVerdict, ApplicationFilter, ReviewUpdate, Store,
};
use crate::errors::AppError;
use crate::models::application::ApplicationRow;
use crate::models::job::JobRow;
use crate::models::user::UserRow;
use crate::models::{Application, Job, UnknownVariant, User};

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn corrupt(e: UnknownVariant) -> AppError {
    AppError::Internal(anyhow::Error::new(e).context("stored row holds an unknown enum value"))
}

async fn insert_job_in(tx: &mut Transaction<'_, Postgres>, job: &Job) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO jobs
            (id, creator_id, title, company, description, requirements,
             location, salary, posted_at, is_active, employment_type, experience_level)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(job.id)
    .bind(job.creator_id)
    .bind(&job.title)
    .bind(&job.company)
    .bind(&job.description)
    .bind(&job.requirements)
    .bind(&job.location)
    .bind(&job.salary)
    .bind(job.posted_at)
    .bind(job.is_active)
    .bind(job.employment_type.map(|t| t.as_str()))
    .bind(job.experience_level.map(|l| l.as_str()))
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, name, email, role, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(duplicate_email()),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose().map_err(corrupt)
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, AppError> {
        let rows = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY posted_at DESC, id")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter()
            .map(Job::try_from)
            .collect::<Result<_, _>>()
            .map_err(corrupt)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>, AppError> {
        let row = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Job::try_from).transpose().map_err(corrupt)
    }

    async fn insert_job(&self, job: &Job) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        insert_job_in(&mut tx, job).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_job(&self, job: &Job) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE jobs SET
                title = $2, company = $3, description = $4, requirements = $5,
                location = $6, salary = $7, is_active = $8,
                employment_type = $9, experience_level = $10
            WHERE id = $1
            "#,
        )
        .bind(job.id)
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(&job.location)
        .bind(&job.salary)
        .bind(job.is_active)
        .bind(job.employment_type.map(|t| t.as_str()))
        .bind(job.experience_level.map(|l| l.as_str()))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn seed_jobs(&self, marker: &str, jobs: &[Job]) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        let claimed =
            sqlx::query("INSERT INTO seed_markers (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
                .bind(marker)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        if claimed == 0 {
            tx.rollback().await?;
            return Ok(false);
        }
        for job in jobs {
            insert_job_in(&mut tx, job).await?;
        }
        tx.commit().await?;
        info!("Seeded {} jobs under marker '{marker}'", jobs.len());
        Ok(true)
    }

    async fn list_applications(
        &self,
        filter: ApplicationFilter,
    ) -> Result<Vec<Application>, AppError> {
        let rows = match filter {
            ApplicationFilter::All => {
                sqlx::query_as::<_, ApplicationRow>(
                    "SELECT * FROM applications ORDER BY applied_at, id",
                )
                .fetch_all(&self.pool)
                .await?
            }
            ApplicationFilter::ForJob(job_id) => {
                sqlx::query_as::<_, ApplicationRow>(
                    "SELECT * FROM applications WHERE job_id = $1 ORDER BY applied_at, id",
                )
                .bind(job_id)
                .fetch_all(&self.pool)
                .await?
            }
            ApplicationFilter::ForCandidate(user_id) => {
                sqlx::query_as::<_, ApplicationRow>(
                    "SELECT * FROM applications WHERE candidate_id = $1 ORDER BY applied_at, id",
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
        };
        rows.into_iter()
            .map(Application::try_from)
            .collect::<Result<_, _>>()
            .map_err(corrupt)
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Application::try_from).transpose().map_err(corrupt)
    }

    async fn insert_application(&self, app: &Application) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO applications
                (id, job_id, candidate_id, candidate_name, candidate_email, resume_text,
                 resume_key, resume_file_name, skills, applied_at, status,
                 ai_score, ai_feedback, viewed_at, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(app.id)
        .bind(app.job_id)
        .bind(app.candidate_id)
        .bind(&app.candidate_name)
        .bind(&app.candidate_email)
        .bind(&app.resume_text)
        .bind(&app.resume_key)
        .bind(&app.resume_file_name)
        .bind(&app.skills)
        .bind(app.applied_at)
        .bind(app.status.as_str())
        .bind(app.ai_score)
        .bind(&app.ai_feedback)
        .bind(app.viewed_at)
        .bind(&app.notes)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(duplicate_application())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn set_ai_verdicts(&self, verdicts: &[AiVerdict]) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut changed = 0;
        for verdict in verdicts {
            let result = sqlx::query(
                "UPDATE applications SET ai_score = $2, ai_feedback = $3 WHERE id = $1",
            )
            .bind(verdict.application_id)
            .bind(verdict.score)
            .bind(&verdict.feedback)
            .execute(&mut *tx)
            .await?;
            changed += result.rows_affected() as usize;
        }
        tx.commit().await?;
        Ok(changed)
    }

    async fn mark_viewed(&self, job_id: Uuid, at: DateTime<Utc>) -> Result<usize, AppError> {
        let result = sqlx::query(
            "UPDATE applications SET viewed_at = $2 WHERE job_id = $1 AND viewed_at IS NULL",
        )
        .bind(job_id)
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() as usize)
    }

    async fn update_review(
        &self,
        id: Uuid,
        review: &ReviewUpdate,
    ) -> Result<Option<Application>, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            UPDATE applications SET
                status = COALESCE($2, status),
                notes = CASE WHEN $3 THEN $4 ELSE notes END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(review.status.map(|s| s.as_str()))
        .bind(review.notes.is_some())
        .bind(review.notes.clone().flatten())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Application::try_from).transpose().map_err(corrupt)
    }
}
