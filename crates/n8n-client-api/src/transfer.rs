//! Workflow import and export through JSON files

use n8n_rest_api_contract::Workflow;
use serde_json::Value;
use std::path::Path;
use tracing::info;

use crate::error::{ClientApiError, ClientApiResult};
use crate::ClientApi;

/// Fetch a workflow and, if `path` is given, write the service's object
/// unchanged as pretty-printed JSON.
pub async fn export_workflow<C>(
    client: &C,
    workflow_id: &str,
    path: Option<&Path>,
) -> ClientApiResult<Workflow>
where
    C: ClientApi + ?Sized,
{
    let raw = client.get_workflow_raw(workflow_id).await?;
    let workflow: Workflow = serde_json::from_value(raw.clone()).map_err(|e| {
        ClientApiError::UnexpectedResponse(format!("workflow {workflow_id}: {e}"))
    })?;

    if let Some(path) = path {
        write_workflow_file(path, &raw).await?;
        info!(workflow_id, path = %path.display(), "workflow exported");
    }

    Ok(workflow)
}

/// Create a workflow from a JSON file, dropping its `id` and forcing `active`.
///
/// The body is sent as read; the service is the only validator.
pub async fn import_workflow<C>(client: &C, path: &Path, activate: bool) -> ClientApiResult<Workflow>
where
    C: ClientApi + ?Sized,
{
    let body = prepare_import(read_workflow_file(path).await?, activate).map_err(|message| {
        ClientApiError::InvalidInput(format!("{}: {message}", path.display()))
    })?;

    let created = client.create_workflow_raw(&body).await?;
    info!(
        name = %created.name,
        id = created.id.as_deref().unwrap_or_default(),
        "workflow imported"
    );
    Ok(created)
}

fn prepare_import(mut body: Value, activate: bool) -> Result<Value, &'static str> {
    let object = body
        .as_object_mut()
        .ok_or("workflow file must contain a JSON object")?;
    object.remove("id");
    object.insert("active".to_string(), Value::Bool(activate));
    Ok(body)
}

async fn read_workflow_file(path: &Path) -> ClientApiResult<Value> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ClientApiError::File {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&text).map_err(|source| ClientApiError::FileFormat {
        path: path.to_path_buf(),
        source,
    })
}

async fn write_workflow_file(path: &Path, workflow: &Value) -> ClientApiResult<()> {
    let mut text = serde_json::to_string_pretty(workflow).map_err(|source| {
        ClientApiError::FileFormat {
            path: path.to_path_buf(),
            source,
        }
    })?;
    text.push('\n');
    tokio::fs::write(path, text)
        .await
        .map_err(|source| ClientApiError::File {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prepare_import_strips_id_and_sets_active() {
        let body = json!({ "id": "old", "name": "W1", "active": true, "nodes": [] });
        let prepared = prepare_import(body, false).unwrap();
        assert_eq!(prepared, json!({ "name": "W1", "active": false, "nodes": [] }));
    }

    #[test]
    fn test_prepare_import_keeps_nameless_body() {
        let prepared = prepare_import(json!({ "nodes": [] }), true).unwrap();
        assert_eq!(prepared, json!({ "nodes": [], "active": true }));
    }

    #[test]
    fn test_prepare_import_rejects_non_object() {
        assert!(prepare_import(json!([1, 2, 3]), false).is_err());
    }
}
