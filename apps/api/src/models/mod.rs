pub mod application;
pub mod job;
pub mod user;

pub use application::{Application, ApplicationStatus, Recommendation};
pub use job::{EmploymentType, ExperienceLevel, Job};
pub use user::{SessionUser, User, UserRole};

/// Error for a stored enum value that no longer maps to a known variant.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
