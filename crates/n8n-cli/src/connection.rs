//! Connection flags shared by every command

use anyhow::Result;
use clap::Args;
use n8n_rest_client::{ClientConfig, RestClient};
use std::time::Duration;

/// Flags override the matching `N8N_*` environment variables
#[derive(Args, Debug, Default, Clone)]
pub struct ConnectionArgs {
    /// Base URL of the n8n instance [env: N8N_BASE_URL]
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// API key sent as X-N8N-API-KEY [env: N8N_API_KEY]
    #[arg(long, global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Basic auth user name [env: N8N_USERNAME]
    #[arg(long, global = true, value_name = "USER")]
    pub username: Option<String>,

    /// Basic auth password [env: N8N_PASSWORD]
    #[arg(long, global = true, value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Per-request timeout in seconds [env: N8N_TIMEOUT_SECS]
    #[arg(long, global = true, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

impl ConnectionArgs {
    /// Layer the flags over a base configuration
    pub fn resolve(self, mut config: ClientConfig) -> ClientConfig {
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(api_key) = self.api_key {
            config.credentials.api_key = Some(api_key);
        }
        if let Some(username) = self.username {
            config.credentials.username = Some(username);
        }
        if let Some(password) = self.password {
            config.credentials.password = Some(password);
        }
        if let Some(secs) = self.timeout {
            config.request_timeout = Some(Duration::from_secs(secs));
        }
        config
    }

    /// Build a client from the environment plus these flags
    pub fn connect(self) -> Result<RestClient> {
        let config = self.resolve(ClientConfig::from_env()?);
        tracing::debug!(base_url = %config.base_url, "connecting");
        Ok(config.into_client()?)
    }
}
