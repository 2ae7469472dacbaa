use anyhow::Result;
use arxiv_mcp_server::arxiv::ArxivClient;
use arxiv_mcp_server::config::{find_config_file, get_settings, load_settings, Settings};
use arxiv_mcp_server::mcp::McpServer;
use arxiv_mcp_server::models::SearchQuery;
use arxiv_mcp_server::storage::PaperStore;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// arXiv MCP Server - search, download and read arXiv papers over MCP
#[derive(Parser, Debug)]
#[command(name = "arxiv-mcp-server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search, download and read arXiv papers over MCP", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the MCP server (default; for Claude Desktop and other MCP clients)
    Serve {
        /// Run in HTTP/SSE mode instead of stdio
        #[arg(long)]
        http: bool,

        /// Port for HTTP mode
        #[arg(long, short, default_value_t = 3000)]
        port: u16,

        /// Host to bind to for HTTP mode
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Search arXiv for papers
    #[command(alias = "s")]
    Search {
        /// Search query string
        query: String,

        /// Maximum number of results
        #[arg(long, short, default_value_t = 10)]
        max_results: usize,

        /// Only include papers submitted on or after this date (YYYY-MM-DD)
        #[arg(long)]
        date_from: Option<String>,

        /// Category filter (repeatable, e.g. -c cs.AI -c cs.LG)
        #[arg(long, short)]
        category: Vec<String>,
    },

    /// Download a paper into the local store
    #[command(alias = "d")]
    Download {
        /// arXiv paper id (e.g. "2301.12345")
        paper_id: String,
    },

    /// List locally stored papers
    #[command(alias = "ls")]
    List,

    /// Print the extracted text of a stored paper
    Read {
        /// arXiv paper id (e.g. "2301.12345")
        paper_id: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn resolve_settings(cli: &Cli) -> Result<Settings> {
    if let Some(path) = &cli.config {
        return Ok(load_settings(path)?);
    }

    if let Some(path) = find_config_file() {
        tracing::info!("Using config file: {}", path.display());
        return Ok(load_settings(&path)?);
    }

    Ok(get_settings())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("arxiv_mcp_server={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = resolve_settings(&cli)?;

    match cli.command {
        Some(Commands::Serve { http, port, host }) => {
            let server = McpServer::new(&settings)?;

            if http {
                let addr = format!("{}:{}", host, port);
                let (bound_addr, handle) = server.run_http(&addr).await?;
                tracing::info!("MCP server listening on {}", bound_addr);
                handle
                    .await
                    .map_err(|e| anyhow::anyhow!("Server task failed: {}", e))?;
            } else {
                server.run().await?;
            }
        }

        Some(Commands::Search {
            query,
            max_results,
            date_from,
            category,
        }) => {
            let client = ArxivClient::new(&settings.arxiv)?;
            let mut search_query = SearchQuery::new(query.as_str()).max_results(max_results);
            search_query.date_from = date_from;
            search_query.categories = category;

            let response = client.search(&search_query).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Some(Commands::Download { paper_id }) => {
            let client = ArxivClient::new(&settings.arxiv)?;
            let store = PaperStore::new(settings.storage.path.clone());

            let id = ArxivClient::parse_id(&paper_id)?;
            if store.has(&id) {
                println!("Paper {} already downloaded", id);
                return Ok(());
            }

            let paper = client.get_by_id(&id).await?;
            let pdf = client.download_pdf(&id).await?;
            let path = store.save(&paper, &pdf)?;
            println!("Saved {} to {}", paper.paper_id, path.display());
        }

        Some(Commands::List) => {
            let store = PaperStore::new(settings.storage.path.clone());
            let papers = store.list()?;
            println!("{}", serde_json::to_string_pretty(&papers)?);
        }

        Some(Commands::Read { paper_id }) => {
            let store = PaperStore::new(settings.storage.path.clone());
            let id = ArxivClient::parse_id(&paper_id)?;
            println!("{}", store.read(&id)?);
        }

        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "arxiv-mcp-server", &mut std::io::stdout());
        }

        // No subcommand: serve on stdio, the normal MCP client entry point
        None => {
            let server = McpServer::new(&settings)?;
            server.run().await?;
        }
    }

    Ok(())
}
