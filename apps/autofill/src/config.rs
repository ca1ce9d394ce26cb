use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    /// JSON object file holding stored answers.
    pub answers_path: PathBuf,
    /// Directory for the application outcome ledgers.
    pub data_dir: PathBuf,
    pub cv_path: Option<PathBuf>,
    /// Optional JSON rule table replacing the built-in label rules.
    pub answer_rules_path: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            answers_path: optional_env("ANSWERS_PATH")
                .unwrap_or_else(|| "answers/default.json".to_string())
                .into(),
            data_dir: optional_env("DATA_DIR")
                .unwrap_or_else(|| "data".to_string())
                .into(),
            cv_path: optional_env("CV_PATH").map(PathBuf::from),
            answer_rules_path: optional_env("ANSWER_RULES_PATH").map(PathBuf::from),
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

/// Unset and blank are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
