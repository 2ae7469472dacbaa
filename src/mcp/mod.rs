//! MCP (Model Context Protocol) implementation.

pub mod dispatcher;
mod handlers;
pub mod server;
mod tools;

pub use dispatcher::Dispatcher;
pub use handlers::default_tools;
pub use server::McpServer;
pub use tools::{TextContent, Tool, ToolHandler};
