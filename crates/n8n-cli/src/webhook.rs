//! Webhook trigger and health probe

use anyhow::{bail, Result};
use clap::Args;
use n8n_rest_api_contract::TriggerMethod;
use n8n_rest_client::RestClient;
use serde_json::Value;

use crate::{parse_json, pretty};

/// Arguments for calling a webhook
#[derive(Args)]
pub struct TriggerArgs {
    /// Webhook path, relative to /webhook/
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Payload: the JSON body for POST, query parameters for GET
    #[arg(long, value_name = "JSON", value_parser = parse_json)]
    pub data: Option<Value>,

    /// HTTP verb (POST or GET)
    #[arg(short = 'X', long, default_value = "POST")]
    pub method: TriggerMethod,
}

impl TriggerArgs {
    pub async fn run(self, client: &RestClient) -> Result<String> {
        let response = client
            .trigger_webhook(&self.path, self.data.as_ref(), self.method)
            .await?;
        pretty(&response.into_value())
    }
}

/// Print the health report; an unhealthy instance is a command failure
pub async fn health(client: &RestClient) -> Result<String> {
    let report = client.health_check().await;
    let rendered = pretty(&report)?;
    if !report.is_healthy() {
        bail!("{} is unhealthy:\n{rendered}", client.base_url());
    }
    Ok(rendered)
}
