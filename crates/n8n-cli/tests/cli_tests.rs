use n8n_cli::execution::ExecutionCommands;
use n8n_cli::workflow::WorkflowCommands;
use n8n_cli::{Cli, Commands, Parser};
use n8n_client_api::ClientApi;
use n8n_rest_api_contract::TriggerMethod;
use n8n_rest_client_mock::MockClient;
use serde_json::json;

#[test]
fn test_cli_parsing_workflow_list() {
    let cli = Cli::try_parse_from(["n8nctl", "workflow", "list"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Workflow {
            subcommand: WorkflowCommands::List
        }
    ));
    assert_eq!(cli.log_level, "warn");
}

#[test]
fn test_cli_parsing_global_connection_flags() {
    let cli = Cli::try_parse_from([
        "n8nctl",
        "health",
        "--base-url",
        "http://n8n.local:5678",
        "--api-key",
        "key",
        "--timeout",
        "10",
    ])
    .unwrap();

    assert!(matches!(cli.command, Commands::Health));
    assert_eq!(cli.connection.base_url.as_deref(), Some("http://n8n.local:5678"));
    assert_eq!(cli.connection.api_key.as_deref(), Some("key"));
    assert_eq!(cli.connection.timeout, Some(10));
}

#[test]
fn test_cli_parsing_execute_with_wait() {
    let cli = Cli::try_parse_from([
        "n8nctl",
        "workflow",
        "execute",
        "42",
        "--data",
        r#"{"input":"value"}"#,
        "--wait",
        "--poll-interval",
        "1",
    ])
    .unwrap();

    match cli.command {
        Commands::Workflow {
            subcommand: WorkflowCommands::Execute(args),
        } => {
            assert_eq!(args.id, "42");
            assert_eq!(args.data, Some(json!({ "input": "value" })));
            assert!(args.wait);
            assert_eq!(args.wait_options.poll_interval_secs, 1);
            assert_eq!(args.wait_options.timeout_secs, 300);
        }
        _ => panic!("expected workflow execute"),
    }
}

#[test]
fn test_cli_rejects_malformed_json_data() {
    let result = Cli::try_parse_from(["n8nctl", "workflow", "execute", "42", "--data", "{oops"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_parsing_trigger_method() {
    let cli = Cli::try_parse_from(["n8nctl", "trigger", "hook1", "-X", "get", "--data", r#"{"x":1}"#])
        .unwrap();
    match cli.command {
        Commands::Trigger(args) => {
            assert_eq!(args.path, "hook1");
            assert_eq!(args.method, TriggerMethod::Get);
        }
        _ => panic!("expected trigger"),
    }

    let cli = Cli::try_parse_from(["n8nctl", "trigger", "hook1"]).unwrap();
    assert!(matches!(cli.command, Commands::Trigger(args) if args.method == TriggerMethod::Post));

    assert!(Cli::try_parse_from(["n8nctl", "trigger", "hook1", "-X", "PUT"]).is_err());
}

#[test]
fn test_cli_parsing_execution_list_defaults() {
    let cli = Cli::try_parse_from(["n8nctl", "execution", "list", "--workflow", "7"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Execution {
            subcommand: ExecutionCommands::List { workflow: Some(ref id), limit: 20 }
        } if id == "7"
    ));
}

fn workflow_command(args: &[&str]) -> WorkflowCommands {
    let mut argv = vec!["n8nctl", "workflow"];
    argv.extend_from_slice(args);
    match Cli::try_parse_from(argv).unwrap().command {
        Commands::Workflow { subcommand } => subcommand,
        _ => panic!("expected a workflow command"),
    }
}

#[tokio::test]
async fn test_workflow_commands_against_mock() {
    let client = MockClient::with_demo_workflows();

    let listing = workflow_command(&["list"]).run(&client).await.unwrap();
    assert!(listing.contains("Demo Workflow 1"));
    assert!(listing.contains("inactive"));

    let activated = workflow_command(&["activate", "1"]).run(&client).await.unwrap();
    assert_eq!(activated, "Workflow 1 (Demo Workflow 1) is active");
    assert!(client.get_workflow("1").await.unwrap().active);

    let summary = workflow_command(&["show", "2"]).run(&client).await.unwrap();
    assert!(summary.contains("Workflow: Demo Workflow 2"));

    let found = workflow_command(&["find", "Demo Workflow 2"])
        .run(&client)
        .await
        .unwrap();
    assert!(found.contains("\"id\": \"2\""));

    let missing = workflow_command(&["find", "Nope"]).run(&client).await;
    assert!(missing.is_err());
}

#[tokio::test]
async fn test_create_and_import_from_files() {
    let client = MockClient::new();
    let dir = tempfile::tempdir().unwrap();
    let definition = dir.path().join("definition.json");
    std::fs::write(
        &definition,
        r#"{"id":"999","name":"From file","nodes":[],"connections":{},"active":true}"#,
    )
    .unwrap();

    let created = workflow_command(&["create", "--file", definition.to_str().unwrap()])
        .run(&client)
        .await
        .unwrap();
    assert!(created.contains("From file"));

    let imported = workflow_command(&["import", definition.to_str().unwrap()])
        .run(&client)
        .await
        .unwrap();
    assert!(imported.starts_with("Imported"));

    let workflows = client.list_workflows().await.unwrap();
    assert_eq!(workflows.len(), 2);
    assert!(workflows.iter().all(|w| w.id.as_deref() != Some("999")));
    assert!(!workflows[1].active);
}

#[tokio::test]
async fn test_execute_and_wait_against_mock() {
    let client = MockClient::with_demo_workflows().with_execution_delay(1);

    let output = workflow_command(&["execute", "1", "--wait", "--poll-interval", "1"])
        .run(&client)
        .await
        .unwrap();
    let record: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(record["finished"], json!(true));
    assert_eq!(record["workflowId"], json!("1"));

    let started = workflow_command(&["execute", "1"]).run(&client).await.unwrap();
    assert!(started.contains("executionId"));
}
