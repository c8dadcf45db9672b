//! In-memory n8n client
//!
//! [`MockClient`] keeps workflows and executions in process and answers the
//! [`ClientApi`] surface the way an n8n instance would: ids are assigned on
//! creation, unknown ids are 404s, and a body without a name is rejected with
//! a 400. Executions can be scripted to report `finished` only after a given
//! number of fetches.

use async_trait::async_trait;
use chrono::Utc;
use n8n_client_api::{ClientApi, ClientApiError, ClientApiResult};
use n8n_rest_api_contract::*;
use serde_json::{json, Value};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

struct ScriptedExecution {
    record: ExecutionRecord,
    /// Fetches answered with `finished == false` before completion
    running_polls: usize,
    fetches: usize,
}

#[derive(Default)]
struct MockState {
    workflows: Vec<Workflow>,
    executions: Vec<ScriptedExecution>,
    next_id: u64,
    execution_delay: usize,
}

impl MockState {
    fn next_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    fn workflow_index(&self, workflow_id: &str) -> ClientApiResult<usize> {
        self.workflows
            .iter()
            .position(|w| w.id.as_deref() == Some(workflow_id))
            .ok_or_else(|| not_found("workflows", workflow_id))
    }

    fn execution_index(&self, execution_id: &str) -> ClientApiResult<usize> {
        self.executions
            .iter()
            .position(|e| e.record.id == execution_id)
            .ok_or_else(|| not_found("executions", execution_id))
    }

    fn start_execution(&mut self, workflow_id: &str, running_polls: usize) -> String {
        let id = self.next_id();
        let record = ExecutionRecord {
            id: id.clone(),
            workflow_id: Some(workflow_id.to_string()),
            finished: false,
            started_at: Some(Utc::now()),
            stopped_at: None,
            mode: Some("manual".to_string()),
            status: Some("running".to_string()),
            data: None,
            extra: Default::default(),
        };
        self.executions.push(ScriptedExecution {
            record,
            running_polls,
            fetches: 0,
        });
        id
    }
}

fn not_found(collection: &str, id: &str) -> ClientApiError {
    ClientApiError::request_failed(
        404,
        format!("/api/v1/{collection}/{id}"),
        "Not Found",
    )
}

/// Mock client backed by in-memory collections
#[derive(Default)]
pub struct MockClient {
    state: Mutex<MockState>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock pre-populated with two inactive demo workflows
    pub fn with_demo_workflows() -> Self {
        let client = Self::new();
        for name in ["Demo Workflow 1", "Demo Workflow 2"] {
            client.insert_workflow(Workflow::new(name));
        }
        client
    }

    /// Executions started by `execute_workflow` report `finished` after this
    /// many unfinished fetches
    pub fn with_execution_delay(self, running_polls: usize) -> Self {
        self.state().execution_delay = running_polls;
        self
    }

    /// Store a workflow as if created by the service and return its new id
    pub fn insert_workflow(&self, mut workflow: Workflow) -> String {
        let mut state = self.state();
        let id = state.next_id();
        let now = Utc::now();
        workflow.id = Some(id.clone());
        workflow.created_at = Some(now);
        workflow.updated_at = Some(now);
        state.workflows.push(workflow);
        id
    }

    /// Start an execution that stays unfinished for `running_polls` fetches
    pub fn insert_execution(&self, workflow_id: &str, running_polls: usize) -> String {
        self.state().start_execution(workflow_id, running_polls)
    }

    /// Start an execution that never reports `finished`
    pub fn insert_stuck_execution(&self, workflow_id: &str) -> String {
        self.insert_execution(workflow_id, usize::MAX)
    }

    /// Number of times an execution has been fetched
    pub fn execution_fetches(&self, execution_id: &str) -> usize {
        let state = self.state();
        state
            .executions
            .iter()
            .find(|e| e.record.id == execution_id)
            .map_or(0, |e| e.fetches)
    }

    /// Modify a stored workflow behind the client's back
    pub fn edit_workflow<F>(&self, workflow_id: &str, edit: F) -> ClientApiResult<()>
    where
        F: FnOnce(&mut Workflow),
    {
        let mut state = self.state();
        let index = state.workflow_index(workflow_id)?;
        edit(&mut state.workflows[index]);
        Ok(())
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ClientApi for MockClient {
    async fn list_workflows(&self) -> ClientApiResult<Vec<Workflow>> {
        Ok(self.state().workflows.clone())
    }

    async fn get_workflow(&self, workflow_id: &str) -> ClientApiResult<Workflow> {
        let state = self.state();
        let index = state.workflow_index(workflow_id)?;
        Ok(state.workflows[index].clone())
    }

    async fn get_workflow_raw(&self, workflow_id: &str) -> ClientApiResult<Value> {
        let workflow = self.get_workflow(workflow_id).await?;
        serde_json::to_value(workflow)
            .map_err(|e| ClientApiError::UnexpectedResponse(e.to_string()))
    }

    async fn create_workflow_raw(&self, body: &Value) -> ClientApiResult<Workflow> {
        let has_name = body
            .get("name")
            .and_then(Value::as_str)
            .is_some_and(|name| !name.is_empty());
        if !has_name {
            return Err(ClientApiError::request_failed(
                400,
                "POST /api/v1/workflows",
                "request/body must have required property 'name'",
            ));
        }

        let mut workflow: Workflow = serde_json::from_value(body.clone()).map_err(|e| {
            ClientApiError::request_failed(400, "POST /api/v1/workflows", e.to_string())
        })?;
        workflow.id = None;
        let id = self.insert_workflow(workflow);
        debug!(%id, "mock workflow created");
        self.get_workflow(&id).await
    }

    async fn update_workflow(
        &self,
        workflow_id: &str,
        workflow: &Workflow,
    ) -> ClientApiResult<Workflow> {
        let mut state = self.state();
        let index = state.workflow_index(workflow_id)?;
        let created_at = state.workflows[index].created_at;

        let mut replacement = workflow.clone();
        replacement.id = Some(workflow_id.to_string());
        replacement.created_at = created_at;
        replacement.updated_at = Some(Utc::now());
        state.workflows[index] = replacement.clone();
        Ok(replacement)
    }

    async fn delete_workflow(&self, workflow_id: &str) -> ClientApiResult<()> {
        let mut state = self.state();
        let index = state.workflow_index(workflow_id)?;
        state.workflows.remove(index);
        Ok(())
    }

    async fn list_executions(
        &self,
        query: &ExecutionListQuery,
    ) -> ClientApiResult<Vec<ExecutionRecord>> {
        let state = self.state();
        Ok(state
            .executions
            .iter()
            .rev()
            .filter(|e| match &query.workflow_id {
                Some(id) => e.record.workflow_id.as_deref() == Some(id.as_str()),
                None => true,
            })
            .take(query.limit as usize)
            .map(|e| e.record.clone())
            .collect())
    }

    async fn get_execution(&self, execution_id: &str) -> ClientApiResult<ExecutionRecord> {
        let mut state = self.state();
        let index = state.execution_index(execution_id)?;
        let execution = &mut state.executions[index];

        execution.fetches += 1;
        if !execution.record.finished && execution.fetches > execution.running_polls {
            execution.record.finished = true;
            execution.record.stopped_at = Some(Utc::now());
            execution.record.status = Some("success".to_string());
        }
        Ok(execution.record.clone())
    }

    async fn delete_execution(&self, execution_id: &str) -> ClientApiResult<()> {
        let mut state = self.state();
        let index = state.execution_index(execution_id)?;
        state.executions.remove(index);
        Ok(())
    }

    async fn execute_workflow(
        &self,
        workflow_id: &str,
        input: Option<Value>,
    ) -> ClientApiResult<Value> {
        let mut state = self.state();
        state.workflow_index(workflow_id)?;
        let delay = state.execution_delay;
        let execution_id = state.start_execution(workflow_id, delay);
        Ok(json!({
            "executionId": execution_id,
            "data": ExecuteWorkflowRequest::new(input).data,
        }))
    }
}
