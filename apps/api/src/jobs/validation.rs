use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{EmploymentType, ExperienceLevel, Job};

/// Requirements arrive either as a JSON array or as the comma-separated text of a form field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RequirementsInput {
    List(Vec<String>),
    Csv(String),
}

impl RequirementsInput {
    fn normalize(self) -> Vec<String> {
        match self {
            RequirementsInput::List(items) => items
                .into_iter()
                .map(|i| i.trim().to_string())
                .filter(|i| !i.is_empty())
                .collect(),
            RequirementsInput::Csv(text) => split_csv(&text),
        }
    }
}

/// Body of POST /jobs and PUT /jobs/:id.
#[derive(Debug, Clone, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: RequirementsInput,
    pub location: String,
    pub salary: String,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub employment_type: Option<EmploymentType>,
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
}

/// A draft whose fields have been trimmed and checked.
#[derive(Debug, Clone)]
pub struct ValidJobDraft {
    title: String,
    company: String,
    description: String,
    requirements: Vec<String>,
    location: String,
    salary: String,
    is_active: Option<bool>,
    employment_type: Option<EmploymentType>,
    experience_level: Option<ExperienceLevel>,
}

/// Splits comma-separated input, trimming entries and dropping empty ones.
pub fn split_csv(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn required(field: &str, value: String) -> Result<String, AppError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(value)
}

pub fn validate_draft(draft: JobDraft) -> Result<ValidJobDraft, AppError> {
    let requirements = draft.requirements.normalize();
    let valid = ValidJobDraft {
        title: required("title", draft.title)?,
        company: required("company", draft.company)?,
        description: required("description", draft.description)?,
        location: required("location", draft.location)?,
        salary: required("salary", draft.salary)?,
        requirements,
        is_active: draft.is_active,
        employment_type: draft.employment_type,
        experience_level: draft.experience_level,
    };
    if valid.requirements.is_empty() {
        return Err(AppError::Validation(
            "at least one requirement is needed".to_string(),
        ));
    }
    Ok(valid)
}

impl ValidJobDraft {
    /// Builds a fresh posting. Jobs are active unless the draft says otherwise.
    pub fn into_job(self, creator_id: Uuid, posted_at: DateTime<Utc>) -> Job {
        Job {
            id: Uuid::new_v4(),
            creator_id: Some(creator_id),
            title: self.title,
            company: self.company,
            description: self.description,
            requirements: self.requirements,
            location: self.location,
            salary: self.salary,
            posted_at,
            is_active: self.is_active.unwrap_or(true),
            employment_type: self.employment_type,
            experience_level: self.experience_level,
        }
    }

    /// Overwrites the editable fields of `job`; id, creator and posting time are kept.
    pub fn apply_to(self, job: &mut Job) {
        job.title = self.title;
        job.company = self.company;
        job.description = self.description;
        job.requirements = self.requirements;
        job.location = self.location;
        job.salary = self.salary;
        if let Some(active) = self.is_active {
            job.is_active = active;
        }
        job.employment_type = self.employment_type;
        job.experience_level = self.experience_level;
    }
}
