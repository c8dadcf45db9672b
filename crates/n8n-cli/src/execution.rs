//! Execution commands

use anyhow::Result;
use clap::Subcommand;
use n8n_client_api::ClientApi;
use n8n_rest_api_contract::{ExecutionListQuery, DEFAULT_EXECUTION_LIMIT};

use crate::pretty;
use crate::workflow::WaitArgs;

/// Execution-related commands
#[derive(Subcommand)]
pub enum ExecutionCommands {
    /// List recent executions
    List {
        /// Only executions of this workflow
        #[arg(long, value_name = "ID")]
        workflow: Option<String>,

        /// Maximum number of records
        #[arg(long, default_value_t = DEFAULT_EXECUTION_LIMIT)]
        limit: u32,
    },
    /// Print an execution record as JSON
    Get {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Delete an execution record
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Poll an execution until it finishes
    Wait {
        #[arg(value_name = "ID")]
        id: String,

        #[command(flatten)]
        wait_options: WaitArgs,
    },
}

impl ExecutionCommands {
    pub async fn run<C: ClientApi + ?Sized>(self, client: &C) -> Result<String> {
        match self {
            ExecutionCommands::List { workflow, limit } => {
                let query = ExecutionListQuery {
                    workflow_id: workflow,
                    limit,
                };
                pretty(&client.list_executions(&query).await?)
            }
            ExecutionCommands::Get { id } => pretty(&client.get_execution(&id).await?),
            ExecutionCommands::Delete { id } => {
                client.delete_execution(&id).await?;
                Ok(format!("Deleted execution {id}"))
            }
            ExecutionCommands::Wait { id, wait_options } => {
                let record = client
                    .wait_for_execution(&id, wait_options.options())
                    .await?;
                pretty(&record)
            }
        }
    }
}
