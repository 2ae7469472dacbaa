//! Prompt templates exposed alongside the paper tools.

mod handlers;

pub use handlers::{get_prompt, list_prompts, PromptError};

/// A prompt exposed to MCP clients
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Prompt name (part of the wire contract)
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// Accepted arguments
    pub arguments: Vec<PromptArgument>,
}

/// A single prompt argument descriptor
#[derive(Debug, Clone)]
pub struct PromptArgument {
    /// Argument name
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// Whether the argument must be supplied
    pub required: bool,
}
