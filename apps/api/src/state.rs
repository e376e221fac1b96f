use std::sync::Arc;

use crate::applications::storage::ResumeStorage;
use crate::auth::SessionStore;
use crate::screening::CandidateScreener;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Every backend sits behind a trait object so the same router runs against
/// Postgres/Redis/S3 in production and in-process stores locally and in tests.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: Arc<dyn SessionStore>,
    pub resumes: Arc<dyn ResumeStorage>,
    /// Pluggable screener. Default: `LlmScreener`. Swap via SCREENING_BACKEND.
    pub screener: Arc<dyn CandidateScreener>,
}
