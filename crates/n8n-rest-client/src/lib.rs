//! REST API client for n8n workflow automation instances
//!
//! This crate provides the HTTP transport for the n8n public REST API:
//! authentication setup, workflow and execution endpoints, webhook triggers
//! and the liveness probe. The resource surface is also exposed through
//! [`n8n_client_api::ClientApi`], which layers activation toggles, lookup by
//! name, waiting for executions and import/export on top of it.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;

pub use auth::*;
pub use client::*;
pub use config::*;
pub use error::*;

use async_trait::async_trait;
use n8n_client_api::{ClientApi, ClientApiResult};
use n8n_rest_api_contract::*;
use serde_json::Value;

#[async_trait]
impl ClientApi for client::RestClient {
    async fn list_workflows(&self) -> ClientApiResult<Vec<Workflow>> {
        Ok(RestClient::list_workflows(self).await?)
    }

    async fn get_workflow(&self, workflow_id: &str) -> ClientApiResult<Workflow> {
        Ok(RestClient::get_workflow(self, workflow_id).await?)
    }

    async fn get_workflow_raw(&self, workflow_id: &str) -> ClientApiResult<Value> {
        Ok(RestClient::get_workflow_raw(self, workflow_id).await?)
    }

    async fn create_workflow_raw(&self, body: &Value) -> ClientApiResult<Workflow> {
        Ok(RestClient::create_workflow(self, body).await?)
    }

    async fn update_workflow(
        &self,
        workflow_id: &str,
        workflow: &Workflow,
    ) -> ClientApiResult<Workflow> {
        Ok(RestClient::update_workflow(self, workflow_id, workflow).await?)
    }

    async fn delete_workflow(&self, workflow_id: &str) -> ClientApiResult<()> {
        Ok(RestClient::delete_workflow(self, workflow_id).await?)
    }

    async fn list_executions(
        &self,
        query: &ExecutionListQuery,
    ) -> ClientApiResult<Vec<ExecutionRecord>> {
        Ok(RestClient::list_executions(self, query).await?)
    }

    async fn get_execution(&self, execution_id: &str) -> ClientApiResult<ExecutionRecord> {
        Ok(RestClient::get_execution(self, execution_id).await?)
    }

    async fn delete_execution(&self, execution_id: &str) -> ClientApiResult<()> {
        Ok(RestClient::delete_execution(self, execution_id).await?)
    }

    async fn execute_workflow(
        &self,
        workflow_id: &str,
        input: Option<Value>,
    ) -> ClientApiResult<Value> {
        Ok(RestClient::execute_workflow(self, workflow_id, input).await?)
    }
}
