//! Paper model representing an arXiv paper.

use serde::{Deserialize, Serialize};

/// An arXiv paper in normalized form
///
/// The same shape is used for search results and for the metadata sidecar
/// persisted next to downloaded papers, so stored entries round-trip through
/// serde without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    /// arXiv identifier without version suffix (e.g. "2301.12345")
    pub paper_id: String,

    /// Paper title
    pub title: String,

    /// Authors (semicolon-separated)
    pub authors: String,

    /// Abstract text
    pub r#abstract: String,

    /// Digital Object Identifier, when arXiv reports one
    pub doi: Option<String>,

    /// Submission date (RFC 3339)
    pub published_date: Option<String>,

    /// Last updated date (RFC 3339)
    pub updated_date: Option<String>,

    /// Direct PDF URL
    pub pdf_url: Option<String>,

    /// Abstract page URL
    pub url: String,

    /// arXiv categories (semicolon-separated, primary first)
    pub categories: Option<String>,
}

impl Paper {
    /// Create a new paper with required fields
    pub fn new(paper_id: String, title: String, url: String) -> Self {
        Self {
            paper_id,
            title,
            authors: String::new(),
            r#abstract: String::new(),
            doi: None,
            published_date: None,
            updated_date: None,
            pdf_url: None,
            url,
            categories: None,
        }
    }

    /// Returns the primary identifier for this paper (DOI if available, else arXiv id)
    pub fn primary_id(&self) -> &str {
        self.doi.as_deref().unwrap_or(&self.paper_id)
    }

    /// Returns the author names as a vector
    pub fn author_list(&self) -> Vec<&str> {
        self.authors
            .split(';')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Returns the categories as a vector
    pub fn category_list(&self) -> Vec<&str> {
        self.categories
            .as_ref()
            .map(|c| {
                c.split(';')
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Check if the paper has a downloadable PDF
    pub fn has_pdf(&self) -> bool {
        self.pdf_url.is_some()
    }
}

/// Builder for constructing Paper objects
#[derive(Debug, Clone)]
pub struct PaperBuilder {
    paper: Paper,
}

impl PaperBuilder {
    /// Create a new builder with required fields
    pub fn new(
        paper_id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            paper: Paper::new(paper_id.into(), title.into(), url.into()),
        }
    }

    /// Set authors
    pub fn authors(mut self, authors: impl Into<String>) -> Self {
        self.paper.authors = authors.into();
        self
    }

    /// Set abstract
    pub fn abstract_text(mut self, abstract_text: impl Into<String>) -> Self {
        self.paper.r#abstract = abstract_text.into();
        self
    }

    /// Set DOI
    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.paper.doi = Some(doi.into());
        self
    }

    /// Set submission date
    pub fn published_date(mut self, date: impl Into<String>) -> Self {
        self.paper.published_date = Some(date.into());
        self
    }

    /// Set updated date
    pub fn updated_date(mut self, date: impl Into<String>) -> Self {
        self.paper.updated_date = Some(date.into());
        self
    }

    /// Set PDF URL
    pub fn pdf_url(mut self, url: impl Into<String>) -> Self {
        self.paper.pdf_url = Some(url.into());
        self
    }

    /// Set categories
    pub fn categories(mut self, categories: impl Into<String>) -> Self {
        self.paper.categories = Some(categories.into());
        self
    }

    /// Build the Paper
    pub fn build(self) -> Paper {
        self.paper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paper_builder() {
        let paper = PaperBuilder::new("2301.12345", "Test Paper", "https://arxiv.org/abs/2301.12345")
            .authors("John Doe; Jane Smith")
            .abstract_text("This is a test abstract.")
            .doi("10.48550/arXiv.2301.12345")
            .pdf_url("https://arxiv.org/pdf/2301.12345.pdf")
            .build();

        assert_eq!(paper.paper_id, "2301.12345");
        assert_eq!(paper.title, "Test Paper");
        assert_eq!(paper.authors, "John Doe; Jane Smith");
        assert_eq!(paper.doi, Some("10.48550/arXiv.2301.12345".to_string()));
        assert!(paper.has_pdf());
    }

    #[test]
    fn test_author_list() {
        let paper = PaperBuilder::new("2301.12345", "Test", "https://arxiv.org/abs/2301.12345")
            .authors("John Doe; Jane Smith; Bob Jones")
            .build();

        let authors = paper.author_list();
        assert_eq!(authors, vec!["John Doe", "Jane Smith", "Bob Jones"]);
    }

    #[test]
    fn test_primary_id() {
        let with_doi = PaperBuilder::new("2301.12345", "Test", "https://arxiv.org/abs/2301.12345")
            .doi("10.48550/arXiv.2301.12345")
            .build();

        assert_eq!(with_doi.primary_id(), "10.48550/arXiv.2301.12345");

        let without_doi = Paper::new(
            "2301.12345".to_string(),
            "Test".to_string(),
            "https://arxiv.org/abs/2301.12345".to_string(),
        );

        assert_eq!(without_doi.primary_id(), "2301.12345");
    }

    #[test]
    fn test_category_list() {
        let paper = PaperBuilder::new("2301.12345", "Test", "https://arxiv.org/abs/2301.12345")
            .categories("cs.AI; cs.LG")
            .build();

        assert_eq!(paper.category_list(), vec!["cs.AI", "cs.LG"]);
    }

    #[test]
    fn test_sidecar_round_trip() {
        let paper = PaperBuilder::new("2301.12345", "Test", "https://arxiv.org/abs/2301.12345")
            .authors("John Doe")
            .published_date("2023-01-15T10:00:00Z")
            .build();

        let json = serde_json::to_string(&paper).unwrap();
        let parsed: Paper = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, paper);
    }
}
