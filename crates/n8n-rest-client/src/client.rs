//! Main REST API client implementation

use n8n_rest_api_contract::*;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::auth::{ConnectionContext, Credentials};
use crate::error::{RestClientError, RestClientResult};

const USER_AGENT: &str = concat!("n8n-rest-client/", env!("CARGO_PKG_VERSION"));

/// REST API client for an n8n instance
#[derive(Debug, Clone)]
pub struct RestClient {
    http_client: HttpClient,
    context: ConnectionContext,
}

impl RestClient {
    /// Create a new REST client over an existing connection context
    pub fn new(context: ConnectionContext) -> RestClientResult<Self> {
        Self::with_timeout(context, None)
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(
        context: ConnectionContext,
        timeout: Option<Duration>,
    ) -> RestClientResult<Self> {
        let mut builder = HttpClient::builder()
            .user_agent(USER_AGENT)
            .default_headers(context.headers().clone());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            context,
        })
    }

    /// Create a client from a base URL string and credential inputs
    pub fn from_url(base_url: &str, credentials: Credentials) -> RestClientResult<Self> {
        Self::new(ConnectionContext::new(base_url, credentials)?)
    }

    /// Get the normalized base URL
    pub fn base_url(&self) -> &str {
        self.context.base_url()
    }

    /// Get the connection context
    pub fn context(&self) -> &ConnectionContext {
        &self.context
    }

    // Workflows

    /// List workflows (first page only)
    pub async fn list_workflows(&self) -> RestClientResult<Vec<Workflow>> {
        let response: ListResponse<Workflow> = self.get("/api/v1/workflows").await?;
        if response.next_cursor.is_some() {
            debug!(
                returned = response.data.len(),
                "workflow listing is paginated; only the first page is returned"
            );
        }
        Ok(response.data)
    }

    pub async fn get_workflow(&self, workflow_id: &str) -> RestClientResult<Workflow> {
        self.get(&self.workflow_path(workflow_id, None)?).await
    }

    /// Fetch a workflow without interpreting it
    pub async fn get_workflow_raw(&self, workflow_id: &str) -> RestClientResult<Value> {
        self.get(&self.workflow_path(workflow_id, None)?).await
    }

    /// Create a workflow from any serializable body; the service assigns the id
    pub async fn create_workflow<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> RestClientResult<Workflow> {
        let created: Workflow = self.post("/api/v1/workflows", body).await?;
        info!(id = created.id.as_deref().unwrap_or_default(), name = %created.name, "workflow created");
        Ok(created)
    }

    /// Replace a workflow; `workflow` must be the complete object
    pub async fn update_workflow(
        &self,
        workflow_id: &str,
        workflow: &Workflow,
    ) -> RestClientResult<Workflow> {
        self.patch(&self.workflow_path(workflow_id, None)?, workflow)
            .await
    }

    pub async fn delete_workflow(&self, workflow_id: &str) -> RestClientResult<()> {
        self.delete(&self.workflow_path(workflow_id, None)?).await?;
        info!(workflow_id, "workflow deleted");
        Ok(())
    }

    /// Run a workflow through its manual trigger
    pub async fn execute_workflow(
        &self,
        workflow_id: &str,
        input: Option<Value>,
    ) -> RestClientResult<Value> {
        let path = self.workflow_path(workflow_id, Some("execute"))?;
        self.post(&path, &ExecuteWorkflowRequest::new(input)).await
    }

    // Executions

    pub async fn list_executions(
        &self,
        query: &ExecutionListQuery,
    ) -> RestClientResult<Vec<ExecutionRecord>> {
        let path = "/api/v1/executions";
        let request = self
            .request_builder(Method::GET, path)
            .query(&query.query_pairs());
        let response: ListResponse<ExecutionRecord> =
            self.send_json(&Method::GET, path, request).await?;
        Ok(response.data)
    }

    pub async fn get_execution(&self, execution_id: &str) -> RestClientResult<ExecutionRecord> {
        self.get(&self.execution_path(execution_id)?).await
    }

    pub async fn delete_execution(&self, execution_id: &str) -> RestClientResult<()> {
        self.delete(&self.execution_path(execution_id)?).await
    }

    // Webhooks

    /// Trigger a webhook with a verb given as text (`"POST"` or `"GET"`).
    ///
    /// Any other verb is rejected before a request is sent.
    pub async fn trigger(
        &self,
        webhook_path: &str,
        input: Option<&Value>,
        method: &str,
    ) -> RestClientResult<TriggerResponse> {
        let method: TriggerMethod = method
            .parse()
            .map_err(|e: ApiContractError| RestClientError::InvalidInput(e.to_string()))?;
        self.trigger_webhook(webhook_path, input, method).await
    }

    /// Call `/webhook/{path}` directly.
    ///
    /// POST sends the input (or `{}`) as a JSON body, GET sends it as query
    /// parameters. The response is decoded per its declared content type.
    pub async fn trigger_webhook(
        &self,
        webhook_path: &str,
        input: Option<&Value>,
        method: TriggerMethod,
    ) -> RestClientResult<TriggerResponse> {
        let path = format!("/webhook/{}", webhook_path.trim_start_matches('/'));
        let empty = json!({});
        let input = input.unwrap_or(&empty);

        let (http_method, request) = match method {
            TriggerMethod::Post => (
                Method::POST,
                self.request_builder(Method::POST, &path).json(input),
            ),
            TriggerMethod::Get => (
                Method::GET,
                self.request_builder(Method::GET, &path)
                    .query(&query_pairs_from_value(input)?),
            ),
        };

        let response = self.send(&http_method, &path, request).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;

        Ok(TriggerResponse::decode(content_type.as_deref(), body)?)
    }

    // Health

    /// Probe `/healthz`; failures are reported, never returned as errors
    pub async fn health_check(&self) -> HealthReport {
        let path = "/healthz";
        let response = match self.request_builder(Method::GET, path).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "health check could not reach the service");
                return HealthReport::unhealthy(UnhealthyReason::Transport, e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "health check returned an error status");
            return HealthReport::unhealthy(
                UnhealthyReason::Status,
                format!("GET {path} returned {status}"),
            );
        }

        match response.json::<Value>().await {
            Ok(details) => HealthReport::Healthy { details },
            Err(e) => {
                warn!(error = %e, "health check body is not valid JSON");
                HealthReport::unhealthy(UnhealthyReason::MalformedBody, e.to_string())
            }
        }
    }

    // Private helper methods

    fn workflow_path(&self, workflow_id: &str, action: Option<&str>) -> RestClientResult<String> {
        let mut segments = vec!["api", "v1", "workflows", workflow_id];
        segments.extend(action);
        self.context.resource_path(&segments)
    }

    fn execution_path(&self, execution_id: &str) -> RestClientResult<String> {
        self.context
            .resource_path(&["api", "v1", "executions", execution_id])
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> RestClientResult<T> {
        let request = self.request_builder(Method::GET, path);
        self.send_json(&Method::GET, path, request).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> RestClientResult<T> {
        let request = self.request_builder(Method::POST, path).json(body);
        self.send_json(&Method::POST, path, request).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> RestClientResult<T> {
        let request = self.request_builder(Method::PATCH, path).json(body);
        self.send_json(&Method::PATCH, path, request).await
    }

    /// Delete a resource; the response body, if any, is discarded
    async fn delete(&self, path: &str) -> RestClientResult<()> {
        let request = self.request_builder(Method::DELETE, path);
        self.send(&Method::DELETE, path, request).await?;
        Ok(())
    }

    fn request_builder(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http_client.request(method, self.context.endpoint(path));
        self.context.auth().apply_to_request(request)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: &Method,
        path: &str,
        request: RequestBuilder,
    ) -> RestClientResult<T> {
        let response = self.send(method, path, request).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(RestClientError::from)
    }

    /// Send a request and turn any non-success status into an error
    async fn send(
        &self,
        method: &Method,
        path: &str,
        request: RequestBuilder,
    ) -> RestClientResult<Response> {
        debug!(%method, path, "sending request");
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(RestClientError::ServerError {
            status,
            endpoint: format!("{method} {path}"),
            message: error_message(&body, status),
        })
    }
}

impl fmt::Display for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RestClient({})", self.context.base_url())
    }
}

/// n8n reports errors as `{ "message": ... }`; fall back to the raw body and
/// then to the status reason.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(Value::String(message)) = map.get("message") {
            return message.clone();
        }
    }
    let body = body.trim();
    if body.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        body.to_string()
    }
}

/// Flatten a JSON object into query pairs: strings stay unquoted, arrays
/// repeat the key, nulls are dropped.
fn query_pairs_from_value(input: &Value) -> RestClientResult<Vec<(String, String)>> {
    let map = match input {
        Value::Object(map) => map,
        Value::Null => return Ok(Vec::new()),
        _ => {
            return Err(RestClientError::InvalidInput(
                "GET trigger input must be a JSON object".to_string(),
            ))
        }
    };

    fn scalar(value: &Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    let mut pairs = Vec::new();
    for (key, value) in map {
        match value {
            Value::Array(items) => {
                pairs.extend(items.iter().filter_map(scalar).map(|v| (key.clone(), v)))
            }
            other => pairs.extend(scalar(other).map(|v| (key.clone(), v))),
        }
    }
    Ok(pairs)
}
