use crate::config::catalog::Catalog;
use crate::config::constants::{DEFAULT_OPENAI_BASE_URL, REQUEST_TIMEOUT_SECS};
use crate::config::ConfigError;
use std::env;
use std::path::PathBuf;

/// Runtime settings loaded from the environment (and `.env` when present)
#[derive(Debug, Clone)]
pub struct Settings {
    /// Optional at startup; the summarize action fails fast without it
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub request_timeout_secs: u64,
    /// JSON file replacing the built-in endpoint/alias tables
    pub catalog_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            catalog_path: None,
        }
    }
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // * .env is a development convenience; absence is fine
        let _ = dotenvy::dotenv();

        let request_timeout_secs = match env::var("REPORT_DIGEST_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "REPORT_DIGEST_TIMEOUT_SECS",
                value: raw,
            })?,
            Err(_) => REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            openai_api_key: non_empty(env::var("OPENAI_API_KEY").ok()),
            openai_base_url: non_empty(env::var("OPENAI_BASE_URL").ok())
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            request_timeout_secs,
            catalog_path: non_empty(env::var("REPORT_DIGEST_CATALOG").ok()).map(PathBuf::from),
        })
    }

    /// Built-in tables unless a catalog file is configured
    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.catalog_path {
            Some(path) => Catalog::from_json_file(path),
            None => Ok(Catalog::default()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
