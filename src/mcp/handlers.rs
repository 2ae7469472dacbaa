//! The four paper tool handlers.
//!
//! Each handler owns its argument schema and performs the real work of one
//! tool; the dispatcher only routes to them and normalizes failures.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::arxiv::ArxivClient;
use crate::mcp::tools::{TextContent, Tool, ToolHandler};
use crate::models::SearchQuery;
use crate::storage::PaperStore;

/// Build the four paper tools in their advertised order:
/// search, download, list, read.
pub fn default_tools(client: Arc<ArxivClient>, store: Arc<PaperStore>) -> Vec<Tool> {
    vec![
        Tool {
            name: "search_papers".to_string(),
            description: "Search for papers on arXiv with optional date and category filters"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query string"
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum number of results",
                        "default": 10
                    },
                    "date_from": {
                        "type": "string",
                        "description": "Only include papers submitted on or after this date (YYYY-MM-DD)"
                    },
                    "categories": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Restrict to these arXiv categories (e.g. 'cs.AI')"
                    }
                },
                "required": ["query"]
            }),
            handler: Arc::new(SearchPapersHandler {
                client: Arc::clone(&client),
            }),
        },
        Tool {
            name: "download_paper".to_string(),
            description: "Download a paper from arXiv and convert it to readable text".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "paper_id": {
                        "type": "string",
                        "description": "arXiv paper id (e.g. '2301.12345')"
                    }
                },
                "required": ["paper_id"]
            }),
            handler: Arc::new(DownloadPaperHandler {
                client,
                store: Arc::clone(&store),
            }),
        },
        Tool {
            name: "list_papers".to_string(),
            description: "List all papers that have been downloaded locally".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
            handler: Arc::new(ListPapersHandler {
                store: Arc::clone(&store),
            }),
        },
        Tool {
            name: "read_paper".to_string(),
            description: "Read the full text of a previously downloaded paper".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "paper_id": {
                        "type": "string",
                        "description": "arXiv paper id (e.g. '2301.12345')"
                    }
                },
                "required": ["paper_id"]
            }),
            handler: Arc::new(ReadPaperHandler { store }),
        },
    ]
}

fn require_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("Missing '{}' parameter", key))
}

/// Handler for `search_papers`
#[derive(Debug)]
pub struct SearchPapersHandler {
    client: Arc<ArxivClient>,
}

#[async_trait]
impl ToolHandler for SearchPapersHandler {
    async fn execute(&self, args: Value) -> Result<Vec<TextContent>, String> {
        let query_text = require_str(&args, "query")?;

        let mut query = SearchQuery::new(query_text);
        if let Some(max_results) = args.get("max_results").and_then(|v| v.as_u64()) {
            query.max_results = max_results as usize;
        }
        if let Some(date_from) = args.get("date_from").and_then(|v| v.as_str()) {
            query.date_from = Some(date_from.to_string());
        }
        if let Some(categories) = args.get("categories").and_then(|v| v.as_array()) {
            query.categories = categories
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect();
        }

        let response = self.client.search(&query).await.map_err(|e| e.to_string())?;
        let text =
            serde_json::to_string_pretty(&response).map_err(|e| e.to_string())?;

        Ok(vec![TextContent::new(text)])
    }
}

/// Handler for `download_paper`
#[derive(Debug)]
pub struct DownloadPaperHandler {
    client: Arc<ArxivClient>,
    store: Arc<PaperStore>,
}

#[async_trait]
impl ToolHandler for DownloadPaperHandler {
    async fn execute(&self, args: Value) -> Result<Vec<TextContent>, String> {
        let raw_id = require_str(&args, "paper_id")?;
        let paper_id = ArxivClient::parse_id(raw_id).map_err(|e| e.to_string())?;

        if self.store.has(&paper_id) {
            let status = json!({
                "status": "exists",
                "paper_id": paper_id,
                "message": "Paper already downloaded"
            });
            return Ok(vec![TextContent::new(status.to_string())]);
        }

        let paper = self
            .client
            .get_by_id(&paper_id)
            .await
            .map_err(|e| e.to_string())?;
        let pdf = self
            .client
            .download_pdf(&paper_id)
            .await
            .map_err(|e| e.to_string())?;
        let path = self.store.save(&paper, &pdf).map_err(|e| e.to_string())?;

        let status = json!({
            "status": "success",
            "paper_id": paper.paper_id,
            "title": paper.title,
            "resource": path.display().to_string()
        });

        Ok(vec![TextContent::new(status.to_string())])
    }
}

/// Handler for `list_papers`
#[derive(Debug)]
pub struct ListPapersHandler {
    store: Arc<PaperStore>,
}

#[async_trait]
impl ToolHandler for ListPapersHandler {
    async fn execute(&self, _args: Value) -> Result<Vec<TextContent>, String> {
        let papers = self.store.list().map_err(|e| e.to_string())?;
        let listing = json!({
            "total_papers": papers.len(),
            "papers": papers
        });
        let text = serde_json::to_string_pretty(&listing).map_err(|e| e.to_string())?;

        Ok(vec![TextContent::new(text)])
    }
}

/// Handler for `read_paper`
#[derive(Debug)]
pub struct ReadPaperHandler {
    store: Arc<PaperStore>,
}

#[async_trait]
impl ToolHandler for ReadPaperHandler {
    async fn execute(&self, args: Value) -> Result<Vec<TextContent>, String> {
        let raw_id = require_str(&args, "paper_id")?;
        let paper_id = ArxivClient::parse_id(raw_id).map_err(|e| e.to_string())?;
        let content = self.store.read(&paper_id).map_err(|e| e.to_string())?;

        Ok(vec![TextContent::new(content)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArxivSettings;
    use crate::models::PaperBuilder;

    fn test_fixtures() -> (Arc<ArxivClient>, Arc<PaperStore>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(ArxivClient::new(&ArxivSettings::default()).unwrap());
        let store = Arc::new(PaperStore::new(dir.path()));
        (client, store, dir)
    }

    #[test]
    fn test_default_tools_order() {
        let (client, store, _dir) = test_fixtures();
        let tools = default_tools(client, store);

        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["search_papers", "download_paper", "list_papers", "read_paper"]
        );
    }

    #[test]
    fn test_schemas_declare_required_keys() {
        let (client, store, _dir) = test_fixtures();
        let tools = default_tools(client, store);

        assert_eq!(tools[0].input_schema["required"][0], "query");
        assert_eq!(tools[1].input_schema["required"][0], "paper_id");
        assert!(tools[2].input_schema.get("required").is_none());
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let (client, store, _dir) = test_fixtures();
        let tools = default_tools(client, store);

        let result = tools[0].handler.execute(json!({})).await;
        assert_eq!(result.unwrap_err(), "Missing 'query' parameter");
    }

    #[tokio::test]
    async fn test_read_missing_paper_fails() {
        let (client, store, _dir) = test_fixtures();
        let tools = default_tools(client, store);

        let result = tools[3]
            .handler
            .execute(json!({"paper_id": "2301.12345"}))
            .await;
        assert!(result.unwrap_err().contains("not found"));
    }

    #[tokio::test]
    async fn test_list_papers_reports_store_contents() {
        let (client, store, _dir) = test_fixtures();

        let paper = PaperBuilder::new("2301.12345", "Stored", "https://arxiv.org/abs/2301.12345")
            .build();
        store.initialize().unwrap();
        std::fs::write(
            store.root().join("2301.12345.json"),
            serde_json::to_string(&paper).unwrap(),
        )
        .unwrap();
        std::fs::write(store.root().join("2301.12345.md"), "content").unwrap();

        let tools = default_tools(client, store);
        let content = tools[2].handler.execute(json!({})).await.unwrap();
        assert_eq!(content.len(), 1);

        let parsed: Value = serde_json::from_str(&content[0].text).unwrap();
        assert_eq!(parsed["total_papers"], 1);
        assert_eq!(parsed["papers"][0]["paper_id"], "2301.12345");
    }
}
