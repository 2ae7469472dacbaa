//! Utility modules supporting the paper operations.
//!
//! - [`HttpClient`]: shared HTTP client with sensible defaults
//! - [`extract_text`]: extract text content from PDF files
//! - [`PdfExtractError`]: errors that can occur during PDF extraction
//! - [`RetryConfig`]: configuration for retry logic with exponential backoff
//! - [`with_retry`]: execute an operation with automatic retry on transient errors

mod http;
mod pdf;
mod retry;

pub use http::HttpClient;
pub use pdf::{extract_text, PdfExtractError};
pub use retry::{api_retry_config, with_retry, RetryConfig, TransientError};
