//! Talent views over screened applications: per-job ranking, the cross-job
//! pool, and dashboard totals. Everything here is pure over loaded records.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::models::{Application, ApplicationStatus, Job};

pub mod handlers;

/// Scores at or above this count as high-potential matches.
pub const HIGH_MATCH_THRESHOLD: i32 = 70;
const TOP_SKILLS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct TalentReport {
    pub job_id: Uuid,
    pub title: String,
    pub headline: String,
    /// Scored at or above the threshold, best first.
    pub top_matches: Vec<Application>,
    pub primary_recommendation: Option<Application>,
    pub other_matches: Vec<Application>,
    pub pending_analysis: Vec<Application>,
    pub low_matches: Vec<Application>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TalentPoolEntry {
    pub job_id: Uuid,
    pub title: String,
    pub high_match_count: usize,
    pub has_unscreened: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_jobs: usize,
    pub total_applications: usize,
    pub pending_applications: usize,
    pub average_ai_score: f64,
    pub top_skills: Vec<String>,
}

fn is_high_match(app: &Application) -> bool {
    app.ai_score.is_some_and(|s| s >= HIGH_MATCH_THRESHOLD)
}

/// Splits a job's applications into ranked buckets. Applications for other jobs are skipped.
pub fn talent_report(job: &Job, applications: &[Application]) -> TalentReport {
    let mut top_matches = Vec::new();
    let mut pending_analysis = Vec::new();
    let mut low_matches = Vec::new();

    for app in applications.iter().filter(|a| a.job_id == job.id) {
        match app.ai_score {
            None => pending_analysis.push(app.clone()),
            Some(_) if is_high_match(app) => top_matches.push(app.clone()),
            Some(_) => low_matches.push(app.clone()),
        }
    }
    top_matches.sort_by(|a, b| {
        b.ai_score
            .cmp(&a.ai_score)
            .then_with(|| a.applied_at.cmp(&b.applied_at))
    });

    let headline = headline(top_matches.len(), pending_analysis.len(), low_matches.len());
    let primary_recommendation = top_matches.first().cloned();
    let other_matches = top_matches.iter().skip(1).cloned().collect();

    TalentReport {
        job_id: job.id,
        title: job.title.clone(),
        headline,
        top_matches,
        primary_recommendation,
        other_matches,
        pending_analysis,
        low_matches,
    }
}

fn headline(top: usize, pending: usize, low: usize) -> String {
    if top > 0 {
        let noun = if top == 1 { "match" } else { "matches" };
        format!("{top} high-potential {noun}")
    } else if pending > 0 {
        format!("{pending} Candidates Pending Screen")
    } else if low > 0 {
        "No High-Potential Matches".to_string()
    } else {
        "Waiting for Applications".to_string()
    }
}

/// One entry per job, in the order given.
pub fn talent_pool(jobs: &[Job], applications: &[Application]) -> Vec<TalentPoolEntry> {
    jobs.iter()
        .map(|job| {
            let for_job = || applications.iter().filter(|a| a.job_id == job.id);
            TalentPoolEntry {
                job_id: job.id,
                title: job.title.clone(),
                high_match_count: for_job().filter(|a| is_high_match(a)).count(),
                has_unscreened: for_job().any(|a| !a.is_scored()),
            }
        })
        .collect()
}

pub fn dashboard_stats(jobs: &[Job], applications: &[Application]) -> DashboardStats {
    let scores: Vec<i32> = applications.iter().filter_map(|a| a.ai_score).collect();
    let average_ai_score = if scores.is_empty() {
        0.0
    } else {
        let mean = scores.iter().map(|&s| f64::from(s)).sum::<f64>() / scores.len() as f64;
        (mean * 10.0).round() / 10.0
    };

    DashboardStats {
        total_jobs: jobs.len(),
        total_applications: applications.len(),
        pending_applications: applications
            .iter()
            .filter(|a| a.status == ApplicationStatus::Pending)
            .count(),
        average_ai_score,
        top_skills: top_skills(applications),
    }
}

/// Most frequent skills, lower-cased. Ties are broken alphabetically.
fn top_skills(applications: &[Application]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for skill in applications.iter().flat_map(|a| &a.skills) {
        let skill = skill.trim().to_lowercase();
        if !skill.is_empty() {
            *counts.entry(skill).or_default() += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|(a_skill, a_count), (b_skill, b_count)| {
        b_count.cmp(a_count).then_with(|| a_skill.cmp(b_skill))
    });
    ranked
        .into_iter()
        .take(TOP_SKILLS)
        .map(|(skill, _)| skill)
        .collect()
}
