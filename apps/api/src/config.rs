use anyhow::{bail, Context, Result};

/// Where users, jobs, sessions and resumes live.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Everything in-process. Data is lost on restart.
    Memory,
    /// PostgreSQL for records, Redis for sessions, S3 (or MinIO) for resume PDFs.
    Hosted(HostedConfig),
}

#[derive(Debug, Clone)]
pub struct HostedConfig {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
}

/// Which `CandidateScreener` backs the screening endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreeningBackend {
    Llm,
    Keyword,
}

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageConfig,
    pub gemini_api_key: Option<String>,
    pub screening_backend: ScreeningBackend,
    pub session_ttl_secs: u64,
    pub seed_demo_jobs: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let storage = match optional_env("STORAGE_BACKEND").as_deref() {
            None | Some("hosted") => StorageConfig::Hosted(HostedConfig {
                database_url: require_env("DATABASE_URL")?,
                redis_url: require_env("REDIS_URL")?,
                s3_bucket: require_env("S3_BUCKET")?,
                s3_endpoint: require_env("S3_ENDPOINT")?,
                aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
                aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            }),
            Some("memory") => StorageConfig::Memory,
            Some(other) => bail!("STORAGE_BACKEND must be 'hosted' or 'memory', got '{other}'"),
        };

        let screening_backend = match optional_env("SCREENING_BACKEND").as_deref() {
            None | Some("llm") => ScreeningBackend::Llm,
            Some("keyword") => ScreeningBackend::Keyword,
            Some(other) => bail!("SCREENING_BACKEND must be 'llm' or 'keyword', got '{other}'"),
        };

        Ok(Config {
            storage,
            gemini_api_key: optional_env("GEMINI_API_KEY").or_else(|| optional_env("API_KEY")),
            screening_backend,
            session_ttl_secs: optional_env("SESSION_TTL_SECS")
                .unwrap_or_else(|| "604800".to_string())
                .parse::<u64>()
                .context("SESSION_TTL_SECS must be a positive number of seconds")?,
            seed_demo_jobs: parse_bool(optional_env("SEED_DEMO_JOBS").as_deref(), true)
                .context("SEED_DEMO_JOBS must be true or false")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Returns the variable only when it is set to something other than whitespace.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(value: Option<&str>, default: bool) -> Result<bool> {
    match value.map(|v| v.to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(v) => bail!("'{v}' is not a boolean"),
    }
}
