//! Prover client configuration.
//!
//! The prover base URL has no sensible default and must be supplied.
//! Override the timeout via environment or explicit construction.

use url::Url;

use crate::error::ConfigError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the external prover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProverConfig {
    /// Base URL; endpoints are joined onto it.
    pub base_url: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ProverConfig {
    /// Configuration for `base_url` with the default timeout.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_url("base_url", base_url)?,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `KINSHIP_PROVER_URL` (required)
    /// - `KINSHIP_PROVER_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("KINSHIP_PROVER_URL").map_err(|_| ConfigError::MissingUrl)?;
        Ok(Self {
            base_url: parse_url("KINSHIP_PROVER_URL", &raw)?,
            timeout_secs: std::env::var("KINSHIP_PROVER_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Full URL for an endpoint path such as `generate-proof`.
    pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path.trim_start_matches('/'))
            .map_err(|e| ConfigError::InvalidUrl(path.to_string(), e.to_string()))
    }
}

fn parse_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}
