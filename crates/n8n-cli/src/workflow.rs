//! Workflow commands

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use n8n_client_api::{ClientApi, WaitOptions};
use n8n_rest_api_contract::{Workflow, WorkflowSummary};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::{parse_json, pretty};

/// Workflow-related commands
#[derive(Subcommand)]
pub enum WorkflowCommands {
    /// List workflows on the instance (first page)
    List,
    /// Print a workflow as JSON
    Get {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Print a readable summary of a workflow
    Show {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Create a workflow from a JSON file
    Create {
        #[arg(long, value_name = "FILE")]
        file: PathBuf,
    },
    /// Replace a workflow with the complete definition in FILE
    Update {
        #[arg(value_name = "ID")]
        id: String,
        #[arg(long, value_name = "FILE")]
        file: PathBuf,
    },
    /// Delete a workflow
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Mark a workflow active
    Activate {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Mark a workflow inactive
    Deactivate {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Look up a workflow by its exact name
    Find {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Run a workflow through its manual trigger
    Execute(ExecuteArgs),
    /// Fetch a workflow and optionally save it to a file
    Export {
        #[arg(value_name = "ID")]
        id: String,
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Create a new workflow from an exported file
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Activate the imported workflow
        #[arg(long)]
        activate: bool,
    },
}

/// Arguments for running a workflow
#[derive(Args)]
pub struct ExecuteArgs {
    #[arg(value_name = "ID")]
    pub id: String,

    /// Input data as a JSON value
    #[arg(long, value_name = "JSON", value_parser = parse_json)]
    pub data: Option<Value>,

    /// Wait for the execution to finish and print its record
    #[arg(long)]
    pub wait: bool,

    #[command(flatten)]
    pub wait_options: WaitArgs,
}

/// Polling knobs for commands that wait on an execution
#[derive(Args, Debug, Clone)]
pub struct WaitArgs {
    /// Give up waiting after this many seconds
    #[arg(long = "wait-timeout", value_name = "SECONDS", default_value_t = 300)]
    pub timeout_secs: u64,

    /// Seconds between status checks
    #[arg(long = "poll-interval", value_name = "SECONDS", default_value_t = 2)]
    pub poll_interval_secs: u64,
}

impl WaitArgs {
    pub fn options(&self) -> WaitOptions {
        WaitOptions::default()
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_poll_interval(Duration::from_secs(self.poll_interval_secs))
    }
}

impl WorkflowCommands {
    pub async fn run<C: ClientApi + ?Sized>(self, client: &C) -> Result<String> {
        match self {
            WorkflowCommands::List => {
                let workflows = client.list_workflows().await?;
                Ok(render_listing(&workflows))
            }
            WorkflowCommands::Get { id } => pretty(&client.get_workflow(&id).await?),
            WorkflowCommands::Show { id } => {
                let workflow = client.get_workflow(&id).await?;
                Ok(WorkflowSummary(&workflow).to_string())
            }
            WorkflowCommands::Create { file } => {
                let body = read_json(&file).await?;
                pretty(&client.create_workflow_raw(&body).await?)
            }
            WorkflowCommands::Update { id, file } => {
                let workflow: Workflow = serde_json::from_value(read_json(&file).await?)
                    .with_context(|| format!("{} is not a workflow definition", file.display()))?;
                pretty(&client.update_workflow(&id, &workflow).await?)
            }
            WorkflowCommands::Delete { id } => {
                client.delete_workflow(&id).await?;
                Ok(format!("Deleted workflow {id}"))
            }
            WorkflowCommands::Activate { id } => {
                let workflow = client.activate_workflow(&id).await?;
                Ok(format!("Workflow {id} ({}) is active", workflow.name))
            }
            WorkflowCommands::Deactivate { id } => {
                let workflow = client.deactivate_workflow(&id).await?;
                Ok(format!("Workflow {id} ({}) is inactive", workflow.name))
            }
            WorkflowCommands::Find { name } => match client.find_workflow_by_name(&name).await? {
                Some(workflow) => pretty(&workflow),
                None => bail!("no workflow named {name:?}"),
            },
            WorkflowCommands::Execute(args) => args.run(client).await,
            WorkflowCommands::Export { id, output } => {
                let workflow = client.export_workflow(&id, output.as_deref()).await?;
                match output {
                    Some(path) => Ok(format!("Exported workflow {id} to {}", path.display())),
                    None => pretty(&workflow),
                }
            }
            WorkflowCommands::Import { file, activate } => {
                let workflow = client.import_workflow(&file, activate).await?;
                Ok(format!(
                    "Imported {} as workflow {}",
                    file.display(),
                    workflow.id.as_deref().unwrap_or("N/A")
                ))
            }
        }
    }
}

impl ExecuteArgs {
    pub async fn run<C: ClientApi + ?Sized>(self, client: &C) -> Result<String> {
        let started = client.execute_workflow(&self.id, self.data).await?;
        if !self.wait {
            return pretty(&started);
        }

        let Some(execution_id) = execution_id_of(&started) else {
            bail!("the service did not report an execution id: {started}");
        };
        info!(%execution_id, "waiting for execution");
        let record = client
            .wait_for_execution(&execution_id, self.wait_options.options())
            .await?;
        pretty(&record)
    }
}

/// The id of a started execution, given as a string or a number
pub fn execution_id_of(started: &Value) -> Option<String> {
    match started.get("executionId")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn render_listing(workflows: &[Workflow]) -> String {
    if workflows.is_empty() {
        return "No workflows".to_string();
    }
    workflows
        .iter()
        .map(|w| {
            let state = if w.active { "active" } else { "inactive" };
            format!("{:<10} {:<9} {}", w.id.as_deref().unwrap_or("N/A"), state, w.name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

async fn read_json(path: &Path) -> Result<Value> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_execution_id_forms() {
        assert_eq!(execution_id_of(&json!({ "executionId": "7" })), Some("7".into()));
        assert_eq!(execution_id_of(&json!({ "executionId": 7 })), Some("7".into()));
        assert_eq!(execution_id_of(&json!({ "data": {} })), None);
    }

    #[test]
    fn test_listing_layout() {
        let mut workflow = Workflow::new("Nightly sync");
        workflow.id = Some("12".into());
        workflow.active = true;

        assert_eq!(render_listing(&[]), "No workflows");
        assert_eq!(render_listing(&[workflow]), "12         active    Nightly sync");
    }
}
