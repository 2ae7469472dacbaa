//! arXiv API client implementation.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use feed_rs::parser;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use regex::Regex;

use crate::arxiv::ArxivError;
use crate::config::ArxivSettings;
use crate::models::{Paper, PaperBuilder, SearchQuery, SearchResponse};
use crate::utils::{api_retry_config, with_retry, HttpClient};

type ApiLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

fn version_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"v\d+$").unwrap())
}

fn id_format() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // New-style ids (2301.12345) and old-style ids (math.gt/0104020)
    RE.get_or_init(|| Regex::new(r"^(\d{4}\.\d{4,5}|[a-z][a-z0-9.-]+/\d{7})$").unwrap())
}

/// Client for the arXiv query and PDF export APIs
///
/// Requests to the query endpoint are rate limited (arXiv asks for one
/// request every three seconds) and transient failures are retried with
/// exponential backoff.
pub struct ArxivClient {
    http: HttpClient,
    limiter: Arc<ApiLimiter>,
    api_url: String,
    pdf_base_url: String,
}

impl std::fmt::Debug for ArxivClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArxivClient")
            .field("api_url", &self.api_url)
            .field("pdf_base_url", &self.pdf_base_url)
            .finish()
    }
}

impl ArxivClient {
    /// Create a client from the arXiv settings section
    pub fn new(settings: &ArxivSettings) -> Result<Self, ArxivError> {
        let http = HttpClient::with_timeout(Duration::from_secs(settings.request_timeout_secs))?;
        let quota = Quota::with_period(Duration::from_secs(settings.rate_limit_secs.max(1)))
            .unwrap_or_else(|| Quota::per_second(nonzero!(1u32)));

        Ok(Self {
            http,
            limiter: Arc::new(RateLimiter::direct(quota)),
            api_url: settings.api_url.clone(),
            pdf_base_url: settings.pdf_base_url.clone(),
        })
    }

    /// Parse an arXiv id from various formats.
    ///
    /// Handles forms like:
    /// - "2301.12345"
    /// - "2301.12345v1" (version is stripped)
    /// - "arXiv:2301.12345"
    /// - "https://arxiv.org/abs/2301.12345v1"
    pub fn parse_id(id: &str) -> Result<String, ArxivError> {
        let raw = id.trim().to_lowercase();

        if raw.is_empty() {
            return Err(ArxivError::InvalidId("empty id".to_string()));
        }

        // Strip an abs-page URL down to the id segment
        let raw = match raw.find("/abs/") {
            Some(pos) => raw[pos + 5..].to_string(),
            None => raw,
        };

        // Strip the "arxiv:" prefix and any version suffix
        let raw = raw.strip_prefix("arxiv:").unwrap_or(&raw);
        let id = version_suffix().replace(raw, "").to_string();

        if !id_format().is_match(&id) {
            return Err(ArxivError::InvalidId(id));
        }

        Ok(id)
    }

    /// Build the search_query expression for the arXiv API
    fn build_search_query(query: &SearchQuery) -> String {
        let mut parts = Vec::new();

        if !query.query.is_empty() {
            parts.push(format!("all:{}", query.query));
        }

        for cat in &query.categories {
            parts.push(format!("cat:{}", cat));
        }

        // arXiv expects submittedDate bounds as YYYYMMDDHHMM
        let date_bound = |date: &str, fallback: &str| -> String {
            chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map(|d| d.format("%Y%m%d0000").to_string())
                .unwrap_or_else(|_| fallback.to_string())
        };

        match (&query.date_from, &query.date_to) {
            (Some(from), Some(to)) => parts.push(format!(
                "submittedDate:[{} TO {}]",
                date_bound(from, "*"),
                date_bound(to, "*")
            )),
            (Some(from), None) => {
                parts.push(format!("submittedDate:[{} TO *]", date_bound(from, "*")))
            }
            (None, Some(to)) => {
                parts.push(format!("submittedDate:[* TO {}]", date_bound(to, "*")))
            }
            (None, None) => {}
        }

        if parts.is_empty() {
            "all:*".to_string()
        } else {
            parts.join(" AND ")
        }
    }

    /// Parse an arXiv Atom feed entry into a Paper
    fn parse_entry(&self, entry: &feed_rs::model::Entry) -> Result<Paper, ArxivError> {
        let paper_id = entry
            .id
            .split("/abs/")
            .last()
            .map(|s| version_suffix().replace(s, "").to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ArxivError::Parse("missing paper id".to_string()))?;

        let title = entry
            .title
            .as_ref()
            .map(|t| t.content.trim())
            .unwrap_or("");

        let authors = entry
            .authors
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        let abstract_text = entry
            .summary
            .as_ref()
            .map(|s| s.content.trim())
            .unwrap_or("");

        let categories = entry
            .categories
            .iter()
            .map(|c| c.term.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        let mut builder = PaperBuilder::new(paper_id.clone(), title, entry.id.clone())
            .authors(authors)
            .abstract_text(abstract_text)
            .pdf_url(self.pdf_url(&paper_id))
            .categories(categories);

        if let Some(published) = entry.published {
            builder = builder.published_date(published.to_rfc3339());
        }
        if let Some(updated) = entry.updated {
            builder = builder.updated_date(updated.to_rfc3339());
        }

        Ok(builder.build())
    }

    /// The PDF download URL for a paper id
    pub fn pdf_url(&self, paper_id: &str) -> String {
        format!("{}/{}.pdf", self.pdf_base_url, paper_id)
    }

    async fn fetch_feed(&self, url: &str) -> Result<feed_rs::model::Feed, ArxivError> {
        let http = self.http.clone();
        let limiter = Arc::clone(&self.limiter);
        let url = url.to_string();

        with_retry(api_retry_config(), move || {
            let http = http.clone();
            let limiter = Arc::clone(&limiter);
            let url = url.clone();
            async move {
                limiter.until_ready().await;

                let response = http
                    .get(&url)
                    .header("Accept", "application/atom+xml")
                    .send()
                    .await
                    .map_err(|e| ArxivError::Network(format!("failed to query arXiv: {}", e)))?;

                let status = response.status();
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    return Err(ArxivError::RateLimit);
                }
                if !status.is_success() {
                    return Err(ArxivError::Api(format!(
                        "arXiv API returned status {}",
                        status
                    )));
                }

                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| ArxivError::Network(format!("failed to read response: {}", e)))?;

                parser::parse(bytes.as_ref())
                    .map_err(|e| ArxivError::Parse(format!("invalid Atom feed: {}", e)))
            }
        })
        .await
    }

    /// Search arXiv for papers matching the query
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, ArxivError> {
        let search_query = Self::build_search_query(query);
        let max_results = query.max_results.clamp(1, 100);

        let url = format!(
            "{}?search_query={}&start=0&max_results={}&sortBy=relevance&sortOrder=descending",
            self.api_url,
            urlencoding::encode(&search_query),
            max_results
        );

        tracing::debug!(query = %search_query, max_results, "searching arXiv");

        let feed = self.fetch_feed(&url).await?;
        let papers: Result<Vec<Paper>, ArxivError> = feed
            .entries
            .iter()
            .map(|entry| self.parse_entry(entry))
            .collect();

        Ok(SearchResponse::new(papers?, &query.query))
    }

    /// Fetch metadata for a single paper by id
    pub async fn get_by_id(&self, id: &str) -> Result<Paper, ArxivError> {
        let paper_id = Self::parse_id(id)?;
        let url = format!(
            "{}?id_list={}&max_results=1",
            self.api_url,
            urlencoding::encode(&paper_id)
        );

        let feed = self.fetch_feed(&url).await?;
        let entry = feed
            .entries
            .first()
            .ok_or_else(|| ArxivError::NotFound(paper_id.clone()))?;

        // The API answers id_list misses with an entry that has no usable id
        let paper = self
            .parse_entry(entry)
            .map_err(|_| ArxivError::NotFound(paper_id.clone()))?;

        Ok(paper)
    }

    /// Download the PDF for a paper, returning its raw bytes
    pub async fn download_pdf(&self, id: &str) -> Result<Vec<u8>, ArxivError> {
        let paper_id = Self::parse_id(id)?;
        let url = self.pdf_url(&paper_id);

        tracing::debug!(paper_id = %paper_id, "downloading PDF");

        self.limiter.until_ready().await;

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ArxivError::Network(format!("failed to download PDF: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ArxivError::NotFound(paper_id));
        }
        if !status.is_success() {
            return Err(ArxivError::Api(format!(
                "PDF download returned status {}",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ArxivError::Network(format!("failed to read PDF body: {}", e)))?;

        Ok(bytes.to_vec())
    }
}
