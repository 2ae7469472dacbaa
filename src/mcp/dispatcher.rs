//! Tool-call dispatch: the routing table and failure boundary.
//!
//! The dispatcher routes a named request to its handler and converts every
//! failure into an `Error: ...` text response. [`Dispatcher::call_tool`] never
//! fails: the transport loop always receives a well-formed response, and the
//! only difference between an unknown tool and a failing handler is the
//! message text. Prompt operations are passed straight through to the prompt
//! registry and keep their error channel.

use std::collections::HashMap;
use std::sync::Arc;

use pmcp::types::GetPromptResult;
use serde_json::Value;

use crate::arxiv::{ArxivClient, ArxivError};
use crate::config::Settings;
use crate::mcp::handlers::default_tools;
use crate::mcp::tools::{TextContent, Tool, ToolHandler};
use crate::prompts::{self, Prompt, PromptError};
use crate::storage::PaperStore;

/// Routes tool and prompt requests to their handlers
#[derive(Debug)]
pub struct Dispatcher {
    tools: Vec<Tool>,
    routes: HashMap<String, Arc<dyn ToolHandler>>,
}

impl Dispatcher {
    /// Create a dispatcher wired to the real arXiv client and paper store
    pub fn new(settings: &Settings) -> Result<Self, ArxivError> {
        let client = Arc::new(ArxivClient::new(&settings.arxiv)?);
        let store = Arc::new(PaperStore::new(settings.storage.path.clone()));
        Ok(Self::from_tools(default_tools(client, store)))
    }

    /// Create a dispatcher from an explicit tool list.
    ///
    /// The list order is the order `list_tools` advertises.
    pub fn from_tools(tools: Vec<Tool>) -> Self {
        let routes = tools
            .iter()
            .map(|tool| (tool.name.clone(), Arc::clone(&tool.handler)))
            .collect();

        Self { tools, routes }
    }

    /// The static tool descriptors, in fixed order
    pub fn list_tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Execute a tool call.
    ///
    /// Unknown names and handler failures are both reported as a one-element
    /// text response carrying an `Error: ` prefixed message.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Vec<TextContent> {
        tracing::debug!("Calling tool {} with arguments {}", name, arguments);

        let Some(handler) = self.routes.get(name) else {
            return vec![TextContent::new(format!("Error: Unknown tool {}", name))];
        };

        match handler.execute(arguments).await {
            Ok(content) => content,
            Err(message) => {
                tracing::error!("Tool error: {}", message);
                vec![TextContent::new(format!("Error: {}", message))]
            }
        }
    }

    /// List available prompts (passthrough)
    pub fn list_prompts(&self) -> Vec<Prompt> {
        prompts::list_prompts()
    }

    /// Get a specific prompt with arguments (passthrough; errors propagate)
    pub fn get_prompt(
        &self,
        name: &str,
        arguments: Option<&HashMap<String, String>>,
    ) -> Result<GetPromptResult, PromptError> {
        prompts::get_prompt(name, arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    #[derive(Debug)]
    struct StaticHandler(&'static str);

    #[async_trait]
    impl ToolHandler for StaticHandler {
        async fn execute(&self, _args: Value) -> Result<Vec<TextContent>, String> {
            Ok(vec![TextContent::new(self.0)])
        }
    }

    fn single_tool_dispatcher() -> Dispatcher {
        Dispatcher::from_tools(vec![Tool {
            name: "search_papers".to_string(),
            description: "test".to_string(),
            input_schema: json!({"type": "object"}),
            handler: Arc::new(StaticHandler("ok")),
        }])
    }

    #[tokio::test]
    async fn test_unknown_tool_is_a_normal_response() {
        let dispatcher = single_tool_dispatcher();
        let response = dispatcher.call_tool("bogus_tool", json!({"x": 1})).await;

        assert_eq!(
            response,
            vec![TextContent::new("Error: Unknown tool bogus_tool")]
        );
    }

    #[tokio::test]
    async fn test_known_tool_returns_handler_output() {
        let dispatcher = single_tool_dispatcher();
        let response = dispatcher.call_tool("search_papers", json!({})).await;

        assert_eq!(response, vec![TextContent::new("ok")]);
    }

    #[test]
    fn test_prompt_passthrough_propagates_errors() {
        let dispatcher = single_tool_dispatcher();
        assert!(dispatcher.get_prompt("bogus-prompt", None).is_err());
        assert_eq!(dispatcher.list_prompts().len(), 1);
    }
}
