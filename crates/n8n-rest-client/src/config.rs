//! Environment-driven client configuration
//!
//! This is the only place that reads process-wide configuration; the client
//! itself is always built from explicit parameters. A `.env` file in the
//! working directory (or a parent) is read too; variables already set in the
//! process win over the file.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::auth::{ConnectionContext, Credentials};
use crate::client::RestClient;
use crate::error::{RestClientError, RestClientResult};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5678";

pub const ENV_BASE_URL: &str = "N8N_BASE_URL";
pub const ENV_API_KEY: &str = "N8N_API_KEY";
pub const ENV_USERNAME: &str = "N8N_USERNAME";
pub const ENV_PASSWORD: &str = "N8N_PASSWORD";
pub const ENV_TIMEOUT_SECS: &str = "N8N_TIMEOUT_SECS";

/// Everything needed to build a [`RestClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub credentials: Credentials,
    /// Per-request transport timeout; `None` waits for the service indefinitely
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: Credentials::none(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Read `N8N_BASE_URL`, `N8N_API_KEY`, `N8N_USERNAME`, `N8N_PASSWORD`
    /// and `N8N_TIMEOUT_SECS` from the process environment, after loading
    /// `.env` if one is found.
    pub fn from_env() -> RestClientResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded environment file");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`ClientConfig::from_env`] with an explicit environment file.
    ///
    /// The file is parsed without modifying the process environment.
    pub fn from_env_file(path: &Path) -> RestClientResult<Self> {
        let file_error =
            |e: dotenvy::Error| RestClientError::InvalidInput(format!("{}: {e}", path.display()));

        let mut file_vars = HashMap::new();
        for item in dotenvy::from_path_iter(path).map_err(file_error)? {
            let (name, value) = item.map_err(file_error)?;
            file_vars.insert(name, value);
        }

        Self::from_lookup(|name| {
            std::env::var(name)
                .ok()
                .or_else(|| file_vars.get(name).cloned())
        })
    }

    /// Same as [`ClientConfig::from_env`] with an explicit variable source.
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> RestClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let request_timeout = var(ENV_TIMEOUT_SECS)
            .map(|raw| {
                raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|e| {
                    RestClientError::InvalidInput(format!("{ENV_TIMEOUT_SECS}={raw}: {e}"))
                })
            })
            .transpose()?;

        Ok(Self {
            base_url: var(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            credentials: Credentials {
                api_key: var(ENV_API_KEY),
                username: var(ENV_USERNAME),
                password: var(ENV_PASSWORD),
            },
            request_timeout,
        })
    }

    pub fn into_client(self) -> RestClientResult<RestClient> {
        let context = ConnectionContext::new(&self.base_url, self.credentials)?;
        RestClient::with_timeout(context, self.request_timeout)
    }
}
