mod applications;
mod auth;
mod config;
mod db;
mod errors;
mod jobs;
mod llm_client;
mod models;
mod routes;
mod screening;
mod state;
mod store;
mod talent;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::applications::storage::{MemoryResumeStorage, ResumeStorage, S3ResumeStorage};
use crate::auth::{MemorySessionStore, RedisSessionStore, SessionStore};
use crate::config::{Config, HostedConfig, ScreeningBackend, StorageConfig};
use crate::db::create_pool;
use crate::jobs::seed::seed_demo_jobs;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::screening::{CandidateScreener, KeywordScreener, LlmScreener};
use crate::state::AppState;
use crate::store::{MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HireStream API v{}", env!("CARGO_PKG_VERSION"));

    let (store, sessions, resumes): (Arc<dyn Store>, Arc<dyn SessionStore>, Arc<dyn ResumeStorage>) =
        match &config.storage {
            StorageConfig::Hosted(hosted) => {
                // PostgreSQL
                let pool = create_pool(&hosted.database_url).await?;
                info!("PostgreSQL pool ready, migrations applied");

                // Redis
                let redis = redis::Client::open(hosted.redis_url.clone())?;
                let sessions = RedisSessionStore::connect(&redis, config.session_ttl_secs).await?;
                info!("Redis session store connected");

                // S3 / MinIO
                let s3 = build_s3_client(hosted).await;
                info!("S3 client initialized (bucket: {})", hosted.s3_bucket);

                let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));
                let sessions: Arc<dyn SessionStore> = Arc::new(sessions);
                let resumes: Arc<dyn ResumeStorage> =
                    Arc::new(S3ResumeStorage::new(s3, hosted.s3_bucket.clone()));
                (store, sessions, resumes)
            }
            StorageConfig::Memory => {
                info!("Using in-memory storage; data is lost on restart");
                let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
                let sessions: Arc<dyn SessionStore> =
                    Arc::new(MemorySessionStore::new(config.session_ttl_secs));
                let resumes: Arc<dyn ResumeStorage> = Arc::new(MemoryResumeStorage::new());
                (store, sessions, resumes)
            }
        };

    // Screener (LlmScreener by default, swap via SCREENING_BACKEND)
    let screener: Arc<dyn CandidateScreener> = match config.screening_backend {
        ScreeningBackend::Llm => {
            if config.gemini_api_key.is_none() {
                warn!("GEMINI_API_KEY is not set; screening requests will fail with 503");
            }
            let llm = LlmClient::new(config.gemini_api_key.clone())?;
            info!("LLM screener initialized (model: {})", llm_client::MODEL);
            Arc::new(LlmScreener(llm))
        }
        ScreeningBackend::Keyword => {
            info!("Keyword screener initialized");
            Arc::new(KeywordScreener)
        }
    };

    if config.seed_demo_jobs {
        seed_demo_jobs(store.as_ref()).await?;
    }

    // Build app state
    let state = AppState {
        store,
        sessions,
        resumes,
        screener,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &HostedConfig) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "hirestream-static",
    );

    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // MinIO only serves path-style bucket URLs.
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
