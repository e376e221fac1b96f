use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::UnknownVariant;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Shortlisted,
    Interviewing,
    Rejected,
    Offered,
    Hired,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "PENDING",
            ApplicationStatus::Reviewed => "REVIEWED",
            ApplicationStatus::Shortlisted => "SHORTLISTED",
            ApplicationStatus::Interviewing => "INTERVIEWING",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::Offered => "OFFERED",
            ApplicationStatus::Hired => "HIRED",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ApplicationStatus::Pending),
            "REVIEWED" => Ok(ApplicationStatus::Reviewed),
            "SHORTLISTED" => Ok(ApplicationStatus::Shortlisted),
            "INTERVIEWING" => Ok(ApplicationStatus::Interviewing),
            "REJECTED" => Ok(ApplicationStatus::Rejected),
            "OFFERED" => Ok(ApplicationStatus::Offered),
            "HIRED" => Ok(ApplicationStatus::Hired),
            other => Err(UnknownVariant {
                kind: "application status",
                value: other.to_string(),
            }),
        }
    }
}

/// A candidate's application to a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Option<Uuid>,
    pub candidate_name: String,
    pub candidate_email: String,
    /// Text sent to the screener: the entered skills plus any text extracted from the PDF.
    pub resume_text: String,
    /// Object key of the stored resume PDF.
    #[serde(skip_serializing)]
    pub resume_key: Option<String>,
    pub resume_file_name: Option<String>,
    pub skills: Vec<String>,
    pub applied_at: DateTime<Utc>,
    pub status: ApplicationStatus,
    pub ai_score: Option<i32>,
    pub ai_feedback: Option<String>,
    /// When an HR user first listed this application.
    pub viewed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Application {
    pub fn is_scored(&self) -> bool {
        self.ai_score.is_some()
    }
}

/// One screening verdict for an application.
///
/// The hosted model answers in camelCase (`applicationId`), which the alias accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(alias = "applicationId")]
    pub application_id: String,
    pub score: f64,
    pub feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strengths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weaknesses: Option<Vec<String>>,
    #[serde(
        default,
        alias = "recommendedActions",
        skip_serializing_if = "Option::is_none"
    )]
    pub recommended_actions: Option<Vec<String>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Option<Uuid>,
    pub candidate_name: String,
    pub candidate_email: String,
    pub resume_text: String,
    pub resume_key: Option<String>,
    pub resume_file_name: Option<String>,
    pub skills: Vec<String>,
    pub applied_at: DateTime<Utc>,
    pub status: String,
    pub ai_score: Option<i32>,
    pub ai_feedback: Option<String>,
    pub viewed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = UnknownVariant;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(Application {
            id: row.id,
            job_id: row.job_id,
            candidate_id: row.candidate_id,
            candidate_name: row.candidate_name,
            candidate_email: row.candidate_email,
            resume_text: row.resume_text,
            resume_key: row.resume_key,
            resume_file_name: row.resume_file_name,
            skills: row.skills,
            applied_at: row.applied_at,
            status: row.status.parse()?,
            ai_score: row.ai_score,
            ai_feedback: row.ai_feedback,
            viewed_at: row.viewed_at,
            notes: row.notes,
        })
    }
}
