use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Job;
use crate::store::Store;

pub const DEMO_SEED_MARKER: &str = "demo_jobs_v1";

/// The two system postings a fresh board starts with.
pub fn demo_jobs() -> Vec<Job> {
    let now = Utc::now();
    vec![
        Job {
            id: Uuid::new_v4(),
            creator_id: None,
            title: "Senior Frontend Engineer".to_string(),
            company: "TechFlow Solutions".to_string(),
            description: "We are looking for a React expert to build our next-generation cloud dashboard.".to_string(),
            requirements: ["React", "TypeScript", "Tailwind CSS", "5+ years experience"]
                .map(String::from)
                .to_vec(),
            location: "Remote / San Francisco".to_string(),
            salary: "$140k - $180k".to_string(),
            posted_at: now,
            is_active: true,
            employment_type: None,
            experience_level: None,
        },
        Job {
            id: Uuid::new_v4(),
            creator_id: None,
            title: "AI Product Manager".to_string(),
            company: "Neural Labs".to_string(),
            description: "Lead our GenAI product strategy and work closely with engineering teams.".to_string(),
            requirements: ["Product Management", "LLM Knowledge", "Agile", "Strategy"]
                .map(String::from)
                .to_vec(),
            location: "New York".to_string(),
            salary: "$160k - $210k".to_string(),
            posted_at: now,
            is_active: true,
            employment_type: None,
            experience_level: None,
        },
    ]
}

/// Seeds the demo postings unless this store has already been seeded.
pub async fn seed_demo_jobs(store: &dyn Store) -> Result<(), AppError> {
    if store.seed_jobs(DEMO_SEED_MARKER, &demo_jobs()).await? {
        info!("Demo job postings seeded");
    }
    Ok(())
}
