//! n8n command-line interface library

pub mod connection;
pub mod execution;
pub mod webhook;
pub mod workflow;

// Re-export CLI types for testing
pub use clap::{Parser, Subcommand};

use anyhow::Result;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "n8nctl")]
#[command(about = "Manage workflows and executions on an n8n instance")]
#[command(version, author, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub connection: connection::ConnectionArgs,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe the instance health endpoint
    Health,
    /// Workflow management commands
    Workflow {
        #[command(subcommand)]
        subcommand: workflow::WorkflowCommands,
    },
    /// Execution history commands
    Execution {
        #[command(subcommand)]
        subcommand: execution::ExecutionCommands,
    },
    /// Call a webhook-triggered workflow
    Trigger(webhook::TriggerArgs),
}

impl Cli {
    /// Run the selected command and return what should be printed
    pub async fn run(self) -> Result<String> {
        let client = self.connection.connect()?;

        match self.command {
            Commands::Health => webhook::health(&client).await,
            Commands::Workflow { subcommand } => subcommand.run(&client).await,
            Commands::Execution { subcommand } => subcommand.run(&client).await,
            Commands::Trigger(args) => args.run(&client).await,
        }
    }
}

/// Parse a JSON argument given on the command line
pub fn parse_json(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))
}

pub(crate) fn pretty<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
