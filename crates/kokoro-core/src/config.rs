use std::path::PathBuf;

use crate::error::ConfigError;

/// Database name used when `KOKORO_STORE_DB` is unset.
pub const DEFAULT_DATABASE: &str = "appdb";

/// Root configuration, sourced from the environment once at startup.
///
/// There is no config file: the process reads its environment, aborts if a
/// required value is missing, and never re-reads it.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub store: StoreConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub api_base: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Store root directory. Plays the role of a connection string.
    pub path: PathBuf,
    /// Database name, a subdirectory under `path`.
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    /// True when any configured origin is the `*` wildcard.
    pub fn allow_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required: `GOOGLE_API_KEY`, `KOKORO_STORE_PATH`.
    /// Optional: `KOKORO_STORE_DB` (default `appdb`), `CORS_ORIGINS`
    /// (comma-separated, default `*`), `GEMINI_API_BASE`.
    pub fn from_env() -> Result<Config, ConfigError> {
        let api_key = require_env("GOOGLE_API_KEY")?;
        let api_base = optional_env("GEMINI_API_BASE");

        let path = PathBuf::from(require_env("KOKORO_STORE_PATH")?);
        let database =
            optional_env("KOKORO_STORE_DB").unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let allowed_origins = match optional_env("CORS_ORIGINS") {
            Some(raw) => parse_origins(&raw),
            None => vec!["*".to_string()],
        };

        Ok(Config {
            gemini: GeminiConfig { api_key, api_base },
            store: StoreConfig { path, database },
            cors: CorsConfig { allowed_origins },
        })
    }
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::MissingEnv(name)),
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
