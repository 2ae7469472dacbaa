//! MCP server wiring using pmcp (Pragmatic AI's rust-mcp-sdk).
//!
//! The pmcp crate owns the JSON-RPC wire protocol and the request/response
//! loop; this module only adapts the [`Dispatcher`] to it. Every registered
//! tool forwards into [`Dispatcher::call_tool`], so routing and failure
//! normalization stay in one place.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use pmcp::server::streamable_http_server::StreamableHttpServer;
use pmcp::types::capabilities::{PromptCapabilities, ToolCapabilities};
use pmcp::types::GetPromptResult;
use pmcp::{Error, RequestHandlerExtra, Server, ServerCapabilities, ToolInfo};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::Settings;
use crate::mcp::dispatcher::Dispatcher;

/// The capability announcement: tools and prompts, both as empty flag groups
fn server_capabilities() -> ServerCapabilities {
    let mut capabilities = ServerCapabilities::default();
    capabilities.tools = Some(ToolCapabilities::default());
    capabilities.prompts = Some(PromptCapabilities::default());
    capabilities
}

/// The MCP server for arXiv paper tools
#[derive(Clone)]
pub struct McpServer {
    server: Arc<Mutex<Server>>,
}

impl McpServer {
    /// Create a server from settings, wiring up the dispatcher
    pub fn new(settings: &Settings) -> Result<Self, pmcp::Error> {
        let dispatcher =
            Dispatcher::new(settings).map_err(|e| Error::internal(e.to_string()))?;
        Self::with_dispatcher(settings, Arc::new(dispatcher))
    }

    /// Create a server around an existing dispatcher
    pub fn with_dispatcher(
        settings: &Settings,
        dispatcher: Arc<Dispatcher>,
    ) -> Result<Self, pmcp::Error> {
        let server = Self::build_server_impl(settings, dispatcher)?;
        Ok(Self {
            server: Arc::new(Mutex::new(server)),
        })
    }

    fn build_server_impl(
        settings: &Settings,
        dispatcher: Arc<Dispatcher>,
    ) -> Result<Server, pmcp::Error> {
        let mut builder = Server::builder()
            .name(settings.app_name.as_str())
            .version(settings.app_version())
            .capabilities(server_capabilities());

        for tool in dispatcher.list_tools() {
            let bridge = ToolBridge {
                name: tool.name.clone(),
                description: tool.description.clone(),
                input_schema: tool.input_schema.clone(),
                dispatcher: Arc::clone(&dispatcher),
            };
            builder = builder.tool(bridge.name.clone(), bridge);
        }

        for prompt in dispatcher.list_prompts() {
            let bridge = PromptBridge {
                name: prompt.name.clone(),
                dispatcher: Arc::clone(&dispatcher),
            };
            builder = builder.prompt(prompt.name, bridge);
        }

        builder.build()
    }

    /// Run the server in stdio mode (for Claude Desktop and other MCP clients)
    pub async fn run(&self) -> Result<(), pmcp::Error> {
        tracing::info!("Starting MCP server in stdio mode");

        // run_stdio() takes ownership, so extract the Server out of the Arc
        let server = Arc::try_unwrap(self.server.clone())
            .map_err(|_| Error::internal("Cannot unwrap Arc - multiple references exist"))?
            .into_inner();

        server.run_stdio().await
    }

    /// Run the server in HTTP/SSE mode
    pub async fn run_http(&self, addr: &str) -> Result<(SocketAddr, JoinHandle<()>), pmcp::Error> {
        tracing::info!("Starting MCP server in HTTP/SSE mode on {}", addr);

        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| Error::invalid_params(format!("Invalid address: {}", e)))?;

        let http_server = StreamableHttpServer::new(socket_addr, self.server.clone());
        http_server.start().await
    }
}

/// Adapter forwarding one registered tool into the dispatcher
#[derive(Clone)]
struct ToolBridge {
    name: String,
    description: String,
    input_schema: Value,
    dispatcher: Arc<Dispatcher>,
}

#[async_trait]
impl pmcp::ToolHandler for ToolBridge {
    async fn handle(&self, args: Value, _extra: RequestHandlerExtra) -> Result<Value, Error> {
        // call_tool never fails; unknown tools and handler failures come back
        // as Error: ... text content
        let content = self.dispatcher.call_tool(&self.name, args).await;
        serde_json::to_value(&content).map_err(|e| Error::internal(e.to_string()))
    }

    fn metadata(&self) -> Option<ToolInfo> {
        Some(ToolInfo::new(
            self.name.clone(),
            Some(self.description.clone()),
            self.input_schema.clone(),
        ))
    }
}

/// Adapter forwarding one registered prompt into the dispatcher
#[derive(Clone)]
struct PromptBridge {
    name: String,
    dispatcher: Arc<Dispatcher>,
}

#[async_trait]
impl pmcp::PromptHandler for PromptBridge {
    async fn handle(
        &self,
        args: HashMap<String, String>,
        _extra: RequestHandlerExtra,
    ) -> Result<GetPromptResult, Error> {
        let arguments = if args.is_empty() { None } else { Some(&args) };

        self.dispatcher
            .get_prompt(&self.name, arguments)
            .map_err(|e| Error::invalid_params(e.to_string()))
    }
}
