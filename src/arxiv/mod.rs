//! arXiv API client.
//!
//! Wraps the arXiv Atom query API for metadata search and the PDF export
//! endpoint for downloads. All network access for the four paper tools goes
//! through [`ArxivClient`].

mod client;

pub use client::ArxivClient;

/// Errors that can occur when talking to arXiv
#[derive(Debug, thiserror::Error)]
pub enum ArxivError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Atom feed or metadata parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Malformed paper identifier
    #[error("Invalid arXiv id: {0}")]
    InvalidId(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimit,

    /// Paper not found
    #[error("Paper not found: {0}")]
    NotFound(String),

    /// API error from arXiv
    #[error("API error: {0}")]
    Api(String),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ArxivError {
    fn from(err: reqwest::Error) -> Self {
        ArxivError::Network(err.to_string())
    }
}
