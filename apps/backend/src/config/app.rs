//! Process configuration read from the environment at startup.

use std::env;
use std::path::Path;
use std::time::Duration;

use db_infra::DbKind;

use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;

/// Inference server settings; absent when `LLM_ENDPOINT` is unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub db_kind: DbKind,
    pub security: SecurityConfig,
    pub cors_origins: Vec<String>,
    pub llm: Option<LlmConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("BACKEND_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match env::var("BACKEND_PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::config(format!("BACKEND_PORT is not a valid port: '{raw}'")))?,
            Err(_) => DEFAULT_PORT,
        };
        let db_kind = DbKind::from_env()?;
        let security = SecurityConfig::from_env()?;
        let cors_origins = parse_origins(
            &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
        );
        let llm = llm_from_env()?;

        Ok(Self {
            host,
            port,
            db_kind,
            security,
            cors_origins,
            llm,
        })
    }
}

/// Load `.env` (or `path`) into the environment. Variables already set are
/// kept; a missing file is not an error.
pub fn load_env_file(path: Option<&Path>) -> Result<(), AppError> {
    let result = match path {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(|_| ()),
    };
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(AppError::config(format!("failed to load .env file: {e}"))),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn llm_from_env() -> Result<Option<LlmConfig>, AppError> {
    let endpoint = match env::var("LLM_ENDPOINT") {
        Ok(v) if !v.trim().is_empty() => v.trim().trim_end_matches('/').to_string(),
        _ => return Ok(None),
    };
    let timeout_secs = match env::var("LLM_TIMEOUT_SECS") {
        Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
            AppError::config(format!("LLM_TIMEOUT_SECS must be an integer, got '{raw}'"))
        })?,
        Err(_) => DEFAULT_LLM_TIMEOUT_SECS,
    };
    Ok(Some(LlmConfig {
        endpoint,
        timeout: Duration::from_secs(timeout_secs),
    }))
}
