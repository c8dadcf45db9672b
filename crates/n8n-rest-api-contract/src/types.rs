//! API contract types for the n8n public REST service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::ApiContractError;

/// Default number of executions requested by an execution listing
pub const DEFAULT_EXECUTION_LIMIT: u32 = 20;

/// Identifiers arrive as strings on most n8n versions and as numbers on some
/// (executions in particular). The client always exposes them as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_connections() -> Value {
    Value::Object(Map::new())
}

/// A node descriptor inside a workflow.
///
/// Only `name` and `type` are interpreted by the client; every other field
/// (`parameters`, `position`, `typeVersion`, ...) is carried verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Workflow definition as stored by the service
///
/// Updates have full-replace semantics, so fields the client does not model
/// (`settings`, `staticData`, `tags`, `versionId`, ...) are kept in `extra`
/// and sent back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "opt_string_or_number"
    )]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
    #[serde(default = "empty_connections")]
    pub connections: Value,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Workflow {
    /// An empty, inactive workflow with the given name and no id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            active: false,
            nodes: Vec::new(),
            connections: empty_connections(),
            created_at: None,
            updated_at: None,
            extra: Map::new(),
        }
    }

    pub fn with_nodes(mut self, nodes: Vec<WorkflowNode>) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_connections(mut self, connections: Value) -> Self {
        self.connections = connections;
        self
    }
}

/// One run of a workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(
        rename = "workflowId",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "opt_string_or_number"
    )]
    pub workflow_id: Option<String>,
    #[serde(default)]
    pub finished: bool,
    #[serde(rename = "startedAt", default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "stoppedAt", default, skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Per-node output; not interpreted by the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Collection envelope used by list endpoints (`{ "data": [...] }`).
/// A missing or null `data` is an empty page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    pub data: Vec<T>,
    #[serde(rename = "nextCursor", default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Query parameters for execution listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionListQuery {
    #[serde(rename = "workflowId", skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    pub limit: u32,
}

impl Default for ExecutionListQuery {
    fn default() -> Self {
        Self {
            workflow_id: None,
            limit: DEFAULT_EXECUTION_LIMIT,
        }
    }
}

impl ExecutionListQuery {
    pub fn for_workflow(workflow_id: impl Into<String>) -> Self {
        Self {
            workflow_id: Some(workflow_id.into()),
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Query string pairs in wire order (`limit`, then `workflowId`)
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.limit.to_string())];
        if let Some(workflow_id) = &self.workflow_id {
            pairs.push(("workflowId", workflow_id.clone()));
        }
        pairs
    }
}

/// Body of a manual execution request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteWorkflowRequest {
    pub data: Value,
}

impl ExecuteWorkflowRequest {
    pub fn new(input: Option<Value>) -> Self {
        Self {
            data: input.unwrap_or_else(|| json!({})),
        }
    }
}

/// HTTP verbs accepted by webhook triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TriggerMethod {
    #[default]
    Post,
    Get,
}

impl TriggerMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerMethod::Post => "POST",
            TriggerMethod::Get => "GET",
        }
    }
}

impl FromStr for TriggerMethod {
    type Err = ApiContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "POST" => Ok(TriggerMethod::Post),
            "GET" => Ok(TriggerMethod::Get),
            _ => Err(ApiContractError::UnsupportedMethod(s.to_string())),
        }
    }
}

impl fmt::Display for TriggerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a `Content-Type` header value declares a JSON body
pub fn is_json_content_type(content_type: &str) -> bool {
    content_type.contains("application/json")
}

/// Response of a webhook-triggered workflow
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerResponse {
    /// The workflow answered with a JSON body
    Structured(Value),
    /// The workflow answered with any other content type
    RawText(String),
}

impl TriggerResponse {
    /// Decode a response body according to its declared content type.
    ///
    /// A body declared as JSON that fails to parse is an error; anything not
    /// declared as JSON is kept as raw text.
    pub fn decode(content_type: Option<&str>, body: String) -> Result<Self, serde_json::Error> {
        match content_type {
            Some(ct) if is_json_content_type(ct) => {
                serde_json::from_str(&body).map(TriggerResponse::Structured)
            }
            _ => Ok(TriggerResponse::RawText(body)),
        }
    }

    /// Uniform structured form: raw text becomes `{ "response": <text> }`
    pub fn into_value(self) -> Value {
        match self {
            TriggerResponse::Structured(value) => value,
            TriggerResponse::RawText(text) => json!({ "response": text }),
        }
    }
}

/// Why a health probe was classified as unhealthy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnhealthyReason {
    /// The request never produced an HTTP response
    Transport,
    /// The service answered with a non-success status
    Status,
    /// The service answered 2xx with an unreadable body
    MalformedBody,
}

/// Outcome of the liveness probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HealthReport {
    Healthy {
        details: Value,
    },
    Unhealthy {
        reason: UnhealthyReason,
        error: String,
    },
}

impl HealthReport {
    pub fn unhealthy(reason: UnhealthyReason, error: impl Into<String>) -> Self {
        HealthReport::Unhealthy {
            reason,
            error: error.into(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthReport::Healthy { .. })
    }
}
