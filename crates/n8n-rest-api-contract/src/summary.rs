//! Human-readable workflow summary

use std::fmt;

use crate::types::Workflow;

const RULE_WIDTH: usize = 60;

/// Display adapter printing a workflow's identity, timestamps and node list
pub struct WorkflowSummary<'a>(pub &'a Workflow);

impl fmt::Display for WorkflowSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let workflow = self.0;
        let rule = "=".repeat(RULE_WIDTH);
        let or_na = |value: Option<String>| value.unwrap_or_else(|| "N/A".to_string());

        writeln!(f, "{rule}")?;
        writeln!(f, "Workflow: {}", workflow.name)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "ID: {}", or_na(workflow.id.clone()))?;
        writeln!(f, "Active: {}", workflow.active)?;
        writeln!(f, "Created: {}", or_na(workflow.created_at.map(|t| t.to_rfc3339())))?;
        writeln!(f, "Updated: {}", or_na(workflow.updated_at.map(|t| t.to_rfc3339())))?;
        writeln!(f)?;
        writeln!(f, "Nodes ({}):", workflow.nodes.len())?;
        for (index, node) in workflow.nodes.iter().enumerate() {
            writeln!(f, "  {}. {} ({})", index + 1, node.name, node.node_type)?;
        }
        writeln!(f)?;
        let connections = workflow.connections.as_object().map_or(0, |map| map.len());
        writeln!(f, "Connections: {connections}")?;
        write!(f, "{rule}")
    }
}
