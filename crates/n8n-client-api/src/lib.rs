//! Client API trait for n8n orchestration
//!
//! [`ClientApi`] is the resource surface every client implements: CRUD over
//! workflows and executions. The composite protocols (activation toggles,
//! lookup by name, waiting for an execution, import and export) are provided
//! methods layered on that surface, so they behave identically for the HTTP
//! client and for test doubles.

pub mod error;
pub mod transfer;
pub mod wait;

pub use error::*;
pub use wait::{WaitOptions, DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT};

use async_trait::async_trait;
use n8n_rest_api_contract::*;
use serde_json::Value;
use std::path::Path;

#[async_trait]
pub trait ClientApi: Send + Sync {
    /// All workflows returned by a single listing call (first page only)
    async fn list_workflows(&self) -> ClientApiResult<Vec<Workflow>>;

    async fn get_workflow(&self, workflow_id: &str) -> ClientApiResult<Workflow>;

    /// The workflow object exactly as the service returned it
    async fn get_workflow_raw(&self, workflow_id: &str) -> ClientApiResult<Value>;

    /// Create a workflow from an arbitrary JSON body, unvalidated
    async fn create_workflow_raw(&self, body: &Value) -> ClientApiResult<Workflow>;

    /// Replace a workflow with the complete given object
    async fn update_workflow(
        &self,
        workflow_id: &str,
        workflow: &Workflow,
    ) -> ClientApiResult<Workflow>;

    async fn delete_workflow(&self, workflow_id: &str) -> ClientApiResult<()>;

    async fn list_executions(
        &self,
        query: &ExecutionListQuery,
    ) -> ClientApiResult<Vec<ExecutionRecord>>;

    async fn get_execution(&self, execution_id: &str) -> ClientApiResult<ExecutionRecord>;

    async fn delete_execution(&self, execution_id: &str) -> ClientApiResult<()>;

    /// Run a workflow through its manual trigger.
    ///
    /// The returned payload is whatever the service answers first and does not
    /// imply the run has completed.
    async fn execute_workflow(
        &self,
        workflow_id: &str,
        input: Option<Value>,
    ) -> ClientApiResult<Value>;

    async fn create_workflow(&self, workflow: &Workflow) -> ClientApiResult<Workflow> {
        let body = serde_json::to_value(workflow)
            .map_err(|e| ClientApiError::InvalidInput(e.to_string()))?;
        self.create_workflow_raw(&body).await
    }

    /// Fetch, set `active`, and write the whole workflow back.
    ///
    /// Two round trips with no version check: a change made by someone else
    /// between the fetch and the update is overwritten.
    async fn set_workflow_active(
        &self,
        workflow_id: &str,
        active: bool,
    ) -> ClientApiResult<Workflow> {
        let mut workflow = self.get_workflow(workflow_id).await?;
        workflow.active = active;
        let updated = self.update_workflow(workflow_id, &workflow).await?;
        tracing::info!(workflow_id, active, "workflow activation changed");
        Ok(updated)
    }

    async fn activate_workflow(&self, workflow_id: &str) -> ClientApiResult<Workflow> {
        self.set_workflow_active(workflow_id, true).await
    }

    async fn deactivate_workflow(&self, workflow_id: &str) -> ClientApiResult<Workflow> {
        self.set_workflow_active(workflow_id, false).await
    }

    /// First workflow whose name matches exactly, fetched in full.
    ///
    /// Absence is `Ok(None)`.
    async fn find_workflow_by_name(&self, name: &str) -> ClientApiResult<Option<Workflow>> {
        let workflows = self.list_workflows().await?;
        let Some(found) = workflows.into_iter().find(|w| w.name == name) else {
            return Ok(None);
        };
        let workflow_id = found.id.ok_or_else(|| {
            ClientApiError::UnexpectedResponse(format!("listed workflow '{name}' has no id"))
        })?;
        self.get_workflow(&workflow_id).await.map(Some)
    }

    /// Block the calling task until the execution reports `finished`.
    ///
    /// Fails with [`ClientApiError::Timeout`] once `options.timeout` has
    /// elapsed without observing completion.
    async fn wait_for_execution(
        &self,
        execution_id: &str,
        options: WaitOptions,
    ) -> ClientApiResult<ExecutionRecord> {
        wait::poll_until_finished(self, execution_id, options).await
    }

    async fn export_workflow(
        &self,
        workflow_id: &str,
        path: Option<&Path>,
    ) -> ClientApiResult<Workflow> {
        transfer::export_workflow(self, workflow_id, path).await
    }

    async fn import_workflow(&self, path: &Path, activate: bool) -> ClientApiResult<Workflow> {
        transfer::import_workflow(self, path, activate).await
    }
}
