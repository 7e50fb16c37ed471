//! Configuration module for the DonorTrack client core.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the DonorTrack backend API
    pub api_base_url: String,
    /// Path to the local SQLite session database
    pub session_db_path: PathBuf,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_base_url = env::var("DONORTRACK_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080/api".to_string())
            .trim_end_matches('/')
            .to_string();

        let session_db_path = env::var("DONORTRACK_SESSION_PATH")
            .unwrap_or_else(|_| "./data/session.sqlite".to_string())
            .into();

        let request_timeout_secs = env::var("DONORTRACK_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .expect("Invalid DONORTRACK_TIMEOUT_SECS format");

        let log_level = env::var("DONORTRACK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            api_base_url,
            session_db_path,
            request_timeout_secs,
            log_level,
        }
    }
}
