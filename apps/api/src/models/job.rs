use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Remote,
    Hybrid,
}

impl EmploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "Full-time",
            EmploymentType::PartTime => "Part-time",
            EmploymentType::Contract => "Contract",
            EmploymentType::Remote => "Remote",
            EmploymentType::Hybrid => "Hybrid",
        }
    }
}

impl FromStr for EmploymentType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Full-time" => Ok(EmploymentType::FullTime),
            "Part-time" => Ok(EmploymentType::PartTime),
            "Contract" => Ok(EmploymentType::Contract),
            "Remote" => Ok(EmploymentType::Remote),
            "Hybrid" => Ok(EmploymentType::Hybrid),
            other => Err(UnknownVariant {
                kind: "employment type",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Lead,
    Executive,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry",
            ExperienceLevel::Mid => "Mid",
            ExperienceLevel::Senior => "Senior",
            ExperienceLevel::Lead => "Lead",
            ExperienceLevel::Executive => "Executive",
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Entry" => Ok(ExperienceLevel::Entry),
            "Mid" => Ok(ExperienceLevel::Mid),
            "Senior" => Ok(ExperienceLevel::Senior),
            "Lead" => Ok(ExperienceLevel::Lead),
            "Executive" => Ok(ExperienceLevel::Executive),
            other => Err(UnknownVariant {
                kind: "experience level",
                value: other.to_string(),
            }),
        }
    }
}

/// A job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    /// HR user who posted the job. `None` for seeded system postings.
    pub creator_id: Option<Uuid>,
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub location: String,
    pub salary: String,
    pub posted_at: DateTime<Utc>,
    /// Whether the job still accepts applications.
    pub is_active: bool,
    pub employment_type: Option<EmploymentType>,
    pub experience_level: Option<ExperienceLevel>,
}

#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub creator_id: Option<Uuid>,
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub location: String,
    pub salary: String,
    pub posted_at: DateTime<Utc>,
    pub is_active: bool,
    pub employment_type: Option<String>,
    pub experience_level: Option<String>,
}

impl TryFrom<JobRow> for Job {
    type Error = UnknownVariant;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        Ok(Job {
            id: row.id,
            creator_id: row.creator_id,
            title: row.title,
            company: row.company,
            description: row.description,
            requirements: row.requirements,
            location: row.location,
            salary: row.salary,
            posted_at: row.posted_at,
            is_active: row.is_active,
            employment_type: row.employment_type.as_deref().map(str::parse).transpose()?,
            experience_level: row.experience_level.as_deref().map(str::parse).transpose()?,
        })
    }
}
