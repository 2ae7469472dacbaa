//! Configuration management.
//!
//! Settings are resolved once at process start from three layers: built-in
//! defaults, an optional TOML file, and `ARXIV_MCP_*` environment variable
//! overrides. The resulting [`Settings`] value is read-only for the lifetime
//! of the process and is passed by reference into the dispatcher.
//!
//! # Configuration File Format
//!
//! ```toml
//! app_name = "arxiv-mcp-server"
//!
//! [storage]
//! path = "~/.arxiv-mcp-server/papers"
//!
//! [arxiv]
//! api_url = "http://export.arxiv.org/api/query"
//! pdf_base_url = "https://arxiv.org/pdf"
//! request_timeout_secs = 30
//! rate_limit_secs = 3
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server name announced in the MCP initialization handshake
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Paper store settings
    #[serde(default)]
    pub storage: StorageSettings,

    /// arXiv API settings
    #[serde(default)]
    pub arxiv: ArxivSettings,
}

impl Settings {
    /// Server version announced in the MCP initialization handshake
    pub fn app_version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            storage: StorageSettings::default(),
            arxiv: ArxivSettings::default(),
        }
    }
}

fn default_app_name() -> String {
    "arxiv-mcp-server".to_string()
}

/// Paper store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory where downloaded papers are kept
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".arxiv-mcp-server")
        .join("papers")
}

/// arXiv API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArxivSettings {
    /// Query endpoint for metadata search
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL for PDF downloads
    #[serde(default = "default_pdf_base_url")]
    pub pdf_base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Minimum seconds between API requests (arXiv asks for 3)
    #[serde(default = "default_rate_limit")]
    pub rate_limit_secs: u64,
}

impl Default for ArxivSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            pdf_base_url: default_pdf_base_url(),
            request_timeout_secs: default_request_timeout(),
            rate_limit_secs: default_rate_limit(),
        }
    }
}

fn default_api_url() -> String {
    "http://export.arxiv.org/api/query".to_string()
}

fn default_pdf_base_url() -> String {
    "https://arxiv.org/pdf".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_rate_limit() -> u64 {
    3
}

/// Load settings from a file, with environment overrides applied on top
pub fn load_settings(path: &PathBuf) -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(config::Environment::with_prefix("ARXIV_MCP").separator("__"))
        .build()?;

    settings.try_deserialize()
}

/// Get the default settings (environment overrides only)
pub fn get_settings() -> Settings {
    let built = config::Config::builder()
        .add_source(config::Environment::with_prefix("ARXIV_MCP").separator("__"))
        .build()
        .and_then(|c| c.try_deserialize());

    built.unwrap_or_default()
}

/// Look for a configuration file in the default locations.
///
/// Checked in order: `./arxiv-mcp-server.toml`, then
/// `$XDG_CONFIG_HOME/arxiv-mcp-server/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("arxiv-mcp-server.toml");
    if local.is_file() {
        return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let candidate = config_dir.join("arxiv-mcp-server").join("config.toml");
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    None
}
