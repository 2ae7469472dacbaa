//! Prompt listing and retrieval.
//!
//! Unlike tool calls, prompt failures are not absorbed into text responses;
//! they propagate to the transport layer's own error handling.

use std::collections::HashMap;

use pmcp::types::{GetPromptResult, MessageContent, PromptMessage, Role};

use crate::prompts::{Prompt, PromptArgument};

/// Errors raised by prompt retrieval
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("Unknown prompt: {0}")]
    UnknownPrompt(String),

    #[error("Prompt {prompt} requires argument {argument}")]
    MissingArgument { prompt: String, argument: String },
}

const DEEP_ANALYSIS: &str = "deep-paper-analysis";

/// List the available prompts
pub fn list_prompts() -> Vec<Prompt> {
    vec![Prompt {
        name: DEEP_ANALYSIS.to_string(),
        description: "Comprehensive analysis workflow for a single arXiv paper".to_string(),
        arguments: vec![PromptArgument {
            name: "paper_id".to_string(),
            description: "arXiv paper id (e.g. 2301.12345)".to_string(),
            required: true,
        }],
    }]
}

/// Retrieve a prompt by name, expanding its arguments into the template
pub fn get_prompt(
    name: &str,
    arguments: Option<&HashMap<String, String>>,
) -> Result<GetPromptResult, PromptError> {
    if name != DEEP_ANALYSIS {
        return Err(PromptError::UnknownPrompt(name.to_string()));
    }

    let paper_id = arguments
        .and_then(|args| args.get("paper_id"))
        .ok_or_else(|| PromptError::MissingArgument {
            prompt: DEEP_ANALYSIS.to_string(),
            argument: "paper_id".to_string(),
        })?;

    let text = format!(
        "Analyze the arXiv paper {paper_id} in depth. Work through the following steps:\n\n\
         1. Call download_paper with paper_id \"{paper_id}\" so the full text is available locally.\n\
         2. Call read_paper with the same id and read the complete text.\n\
         3. Summarize the problem the paper addresses and why it matters.\n\
         4. Describe the key contributions and how they differ from prior work.\n\
         5. Explain the methodology, including assumptions and experimental setup.\n\
         6. Assess the evidence: datasets, baselines, ablations, statistical rigor.\n\
         7. Note limitations the authors acknowledge and any you observe yourself.\n\
         8. Suggest follow-up research directions and related papers worth searching for\n\
            with search_papers.\n\n\
         Present the analysis as structured markdown with a section per step."
    );

    Ok(GetPromptResult::new(
        vec![PromptMessage {
            role: Role::User,
            content: MessageContent::Text { text },
        }],
        Some(format!("Deep analysis of arXiv paper {paper_id}")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_prompts() {
        let prompts = list_prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].name, "deep-paper-analysis");
        assert!(prompts[0].arguments[0].required);
    }

    #[test]
    fn test_get_prompt_expands_paper_id() {
        let mut args = HashMap::new();
        args.insert("paper_id".to_string(), "2301.12345".to_string());

        let result = get_prompt("deep-paper-analysis", Some(&args)).unwrap();
        assert_eq!(result.messages.len(), 1);
        match &result.messages[0].content {
            MessageContent::Text { text } => {
                assert!(text.contains("2301.12345"));
                assert!(text.contains("read_paper"));
            }
            other => panic!("expected text content, got {:?}", other),
        }
    }

    #[test]
    fn test_get_prompt_unknown_name() {
        let result = get_prompt("bogus-prompt", None);
        assert!(matches!(result, Err(PromptError::UnknownPrompt(_))));
    }

    #[test]
    fn test_get_prompt_missing_argument() {
        let result = get_prompt("deep-paper-analysis", None);
        assert!(matches!(result, Err(PromptError::MissingArgument { .. })));
    }
}
