//! Client configuration
//!
//! Built either with the `with_*` builder or from `CROPCARE_*` environment
//! variables.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Storage key the access token lives under
pub const DEFAULT_AUTH_KEY: &str = "accessToken";
/// Per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Backend base URL (required)
pub const ENV_BACKEND_URL: &str = "CROPCARE_BACKEND_URL";
/// Override for `DEFAULT_AUTH_KEY`
pub const ENV_AUTH_KEY: &str = "CROPCARE_AUTH_KEY";
/// Override for `DEFAULT_REQUEST_TIMEOUT_SECS`
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "CROPCARE_REQUEST_TIMEOUT_SECS";

/// Backend and session settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL without trailing slash
    backend_url: String,
    /// Key shared by the cookie and local storage entries
    auth_key: String,
    /// Per-request timeout in seconds
    request_timeout_secs: u64,
}

impl ClientConfig {
    /// Create configuration for a backend
    ///
    /// # Errors
    /// The URL must be an absolute `http` or `https` URL.
    pub fn new(backend_url: impl AsRef<str>) -> Result<Self, ConfigError> {
        Ok(Self {
            backend_url: normalize_backend_url(backend_url.as_ref())?,
            auth_key: DEFAULT_AUTH_KEY.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        })
    }

    /// Load from the process environment
    ///
    /// # Errors
    /// Fails if `CROPCARE_BACKEND_URL` is unset or any value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup
    ///
    /// # Errors
    /// Same as `from_env`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(ENV_BACKEND_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar(ENV_BACKEND_URL))?;
        let mut config = Self::new(url)?;

        if let Some(key) = lookup(ENV_AUTH_KEY).filter(|v| !v.trim().is_empty()) {
            config = config.with_auth_key(key.trim());
        }

        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::InvalidTimeout(raw))?;
            config = config.with_request_timeout_secs(secs);
        }

        Ok(config)
    }

    /// With storage key
    #[inline]
    #[must_use]
    pub fn with_auth_key(mut self, key: impl Into<String>) -> Self {
        self.auth_key = key.into();
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Base URL without trailing slash
    #[inline]
    #[must_use]
    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// Storage key for the access token
    #[inline]
    #[must_use]
    pub fn auth_key(&self) -> &str {
        &self.auth_key
    }

    /// Per-request timeout
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Absolute URL for an API path such as `/auth/login`
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.backend_url, path.trim_start_matches('/'))
    }
}

fn normalize_backend_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(trimmed.to_string())
}
