use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_STORE_FILE: &str = "profile.json";

/// Application configuration loaded from environment variables.
/// Nothing is required at startup: a missing API key only fails the AI features when used.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: Option<String>,
    pub store_path: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let store_path = match optional_env("JOBSY_STORE_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_store_path().context("Could not determine a profile location")?,
        };

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY").or_else(|| optional_env("API_KEY")),
            gemini_api_base: optional_env("GEMINI_API_BASE"),
            store_path,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// `<local data dir>/jobsy/profile.json`, or `./.jobsy/profile.json` when the
/// platform has no data directory.
fn default_store_path() -> Result<PathBuf> {
    let base = match dirs::data_local_dir() {
        Some(dir) => dir.join("jobsy"),
        None => std::env::current_dir()
            .context("Current directory is not accessible")?
            .join(".jobsy"),
    };
    Ok(base.join(DEFAULT_STORE_FILE))
}

/// Blank values count as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
