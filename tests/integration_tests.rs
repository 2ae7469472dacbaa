//! Integration tests for the arXiv MCP server.
//!
//! These exercise the dispatcher with its real handlers against a temporary
//! paper store. Nothing here talks to the network: the network-facing paths
//! are covered by the mockito tests in the arxiv client module.

use std::sync::Arc;

use arxiv_mcp_server::config::Settings;
use arxiv_mcp_server::mcp::{Dispatcher, McpServer};
use serde_json::{json, Value};

/// Settings pointing the paper store at a fresh temp directory
fn test_settings(dir: &tempfile::TempDir) -> Settings {
    let mut settings = Settings::default();
    settings.storage.path = dir.path().join("papers");
    settings
}

#[tokio::test]
async fn test_server_initialization() {
    let dir = tempfile::tempdir().unwrap();
    let server = McpServer::new(&test_settings(&dir));
    assert!(server.is_ok());
}

#[tokio::test]
async fn test_dispatcher_advertises_four_tools() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = Dispatcher::new(&test_settings(&dir)).unwrap();

    let names: Vec<&str> = dispatcher
        .list_tools()
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["search_papers", "download_paper", "list_papers", "read_paper"]
    );
}

#[tokio::test]
async fn test_unknown_tool_with_real_handlers() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = Dispatcher::new(&test_settings(&dir)).unwrap();

    let response = dispatcher.call_tool("bogus_tool", json!({"x": 1})).await;
    assert_eq!(response.len(), 1);
    assert_eq!(response[0].text, "Error: Unknown tool bogus_tool");
}

#[tokio::test]
async fn test_list_papers_on_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = Dispatcher::new(&test_settings(&dir)).unwrap();

    let response = dispatcher.call_tool("list_papers", json!({})).await;
    assert_eq!(response.len(), 1);

    let listing: Value = serde_json::from_str(&response[0].text).unwrap();
    assert_eq!(listing["total_papers"], 0);
}

#[tokio::test]
async fn test_read_paper_missing_is_absorbed() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = Dispatcher::new(&test_settings(&dir)).unwrap();

    let response = dispatcher
        .call_tool("read_paper", json!({"paper_id": "2301.12345"}))
        .await;
    assert_eq!(response.len(), 1);
    assert!(response[0].text.starts_with("Error: "));
    assert!(response[0].text.contains("not found"));
}

#[tokio::test]
async fn test_missing_required_argument_is_absorbed() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = Dispatcher::new(&test_settings(&dir)).unwrap();

    let response = dispatcher.call_tool("read_paper", json!({})).await;
    assert_eq!(
        response[0].text,
        "Error: Missing 'paper_id' parameter"
    );

    let response = dispatcher.call_tool("search_papers", json!({})).await;
    assert_eq!(response[0].text, "Error: Missing 'query' parameter");
}

#[tokio::test]
async fn test_invalid_paper_id_is_absorbed() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = Dispatcher::new(&test_settings(&dir)).unwrap();

    let response = dispatcher
        .call_tool("download_paper", json!({"paper_id": "../../etc/passwd"}))
        .await;
    assert!(response[0].text.starts_with("Error: Invalid arXiv id"));
}

#[tokio::test]
async fn test_prompt_surface() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = Arc::new(Dispatcher::new(&test_settings(&dir)).unwrap());

    let prompts = dispatcher.list_prompts();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].name, "deep-paper-analysis");

    // Prompt failures propagate instead of being absorbed
    assert!(dispatcher.get_prompt("deep-paper-analysis", None).is_err());
    assert!(dispatcher.get_prompt("missing-prompt", None).is_err());

    let mut args = std::collections::HashMap::new();
    args.insert("paper_id".to_string(), "2301.12345".to_string());
    let result = dispatcher
        .get_prompt("deep-paper-analysis", Some(&args))
        .unwrap();
    assert_eq!(result.messages.len(), 1);
}
