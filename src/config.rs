// src/config.rs
// =============================================================================
// Runtime configuration.
//
// Values come from the process environment, optionally seeded from a .env file
// in the working directory:
//
//   RAINDROP_TOKEN                 - API test token (required)
//   RAINDROP_API_URL               - API base URL (default: Raindrop.io v1)
//   RAINDROP_REPORTS_DIR           - where report files go (default: reports)
//   RAINDROP_REQUEST_TIMEOUT_SECS  - timeout for API requests (default: 30)
//
// The CLI can override the reports directory with --reports-dir.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

/// Default Raindrop.io REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.raindrop.io/rest/v1";

/// Default directory for saved reports, relative to the working directory.
pub const DEFAULT_REPORTS_DIR: &str = "reports";

/// Default timeout for a single API request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything the binaries need to build a client and save reports.
#[derive(Clone)]
pub struct Config {
    pub token: String,
    pub api_url: Url,
    pub reports_dir: PathBuf,
    pub request_timeout: Duration,
}

// The token is a credential, keep it out of Debug output and logs
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url.as_str())
            .field("reports_dir", &self.reports_dir)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Config {
    /// Loads `.env` (if present) and reads the configuration from the environment.
    pub fn from_env() -> Result<Self> {
        // A missing .env file is normal, the variables may already be exported
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from any key lookup.
    ///
    /// `from_env` is this with `std::env::var`; tests pass a closure over a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("RAINDROP_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(Error::MissingToken)?;

        let api_url = lookup("RAINDROP_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&api_url).map_err(|e| Error::InvalidConfig {
            key: "RAINDROP_API_URL",
            message: e.to_string(),
        })?;

        let reports_dir = lookup("RAINDROP_REPORTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORTS_DIR));

        let request_timeout = match lookup("RAINDROP_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| Error::InvalidConfig {
                    key: "RAINDROP_REQUEST_TIMEOUT_SECS",
                    message: format!("expected a whole number of seconds, got '{}'", raw),
                })?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Config {
            token,
            api_url,
            reports_dir,
            request_timeout,
        })
    }
}
