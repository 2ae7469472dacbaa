//! Local paper store.
//!
//! Downloaded papers live in a flat directory: `{id}.pdf` holds the original
//! PDF, `{id}.md` the extracted text with a small metadata header, and
//! `{id}.json` the [`Paper`] metadata sidecar used by `list_papers`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::models::Paper;
use crate::utils::{extract_text, PdfExtractError};

/// Errors that can occur in the paper store
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Paper not found: {0}")]
    NotFound(String),

    #[error("Text extraction failed: {0}")]
    Extraction(#[from] PdfExtractError),

    #[error("Invalid metadata for {0}: {1}")]
    Metadata(String, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Store for downloaded papers
#[derive(Debug, Clone)]
pub struct PaperStore {
    root: PathBuf,
}

impl PaperStore {
    /// Create a store rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the store directory if it does not exist yet
    pub fn initialize(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    // Old-style ids contain a slash; keep entries flat on disk
    fn file_stem(paper_id: &str) -> String {
        paper_id.replace('/', "_")
    }

    fn path_for(&self, paper_id: &str, ext: &str) -> PathBuf {
        self.root.join(format!("{}.{}", Self::file_stem(paper_id), ext))
    }

    /// Whether a paper has already been downloaded and converted
    pub fn has(&self, paper_id: &str) -> bool {
        self.path_for(paper_id, "md").is_file()
    }

    /// Save a downloaded paper: PDF, extracted markdown and metadata sidecar.
    ///
    /// Returns the path of the markdown document. The PDF is written first via
    /// a temp file so a failed extraction never leaves a half-written entry.
    pub fn save(&self, paper: &Paper, pdf: &[u8]) -> Result<PathBuf, StorageError> {
        self.initialize()?;

        let pdf_path = self.path_for(&paper.paper_id, "pdf");
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(pdf)?;
        tmp.persist(&pdf_path).map_err(|e| e.error)?;

        let text = extract_text(&pdf_path)?;

        let md_path = self.path_for(&paper.paper_id, "md");
        let mut document = format!(
            "# {}\n\n**Authors:** {}\n**arXiv:** {}\n\n",
            paper.title, paper.authors, paper.paper_id
        );
        document.push_str(&text);
        fs::write(&md_path, document)?;

        let sidecar = self.path_for(&paper.paper_id, "json");
        let metadata = serde_json::to_string_pretty(paper)
            .map_err(|e| StorageError::Metadata(paper.paper_id.clone(), e.to_string()))?;
        fs::write(&sidecar, metadata)?;

        tracing::info!(paper_id = %paper.paper_id, path = %md_path.display(), "paper stored");

        Ok(md_path)
    }

    /// List all stored papers, sorted by id
    pub fn list(&self) -> Result<Vec<Paper>, StorageError> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut papers = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let raw = fs::read_to_string(&path)?;
            let paper: Paper = serde_json::from_str(&raw).map_err(|e| {
                StorageError::Metadata(path.display().to_string(), e.to_string())
            })?;
            papers.push(paper);
        }

        papers.sort_by(|a, b| a.paper_id.cmp(&b.paper_id));
        Ok(papers)
    }

    /// Read the extracted text of a stored paper
    pub fn read(&self, paper_id: &str) -> Result<String, StorageError> {
        let md_path = self.path_for(paper_id, "md");
        if !md_path.is_file() {
            return Err(StorageError::NotFound(paper_id.to_string()));
        }

        Ok(fs::read_to_string(&md_path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaperBuilder;

    fn sample_paper(id: &str) -> Paper {
        PaperBuilder::new(id, "Sample Paper", format!("https://arxiv.org/abs/{}", id))
            .authors("Ada Lovelace")
            .abstract_text("An abstract.")
            .build()
    }

    fn store_entry(store: &PaperStore, paper: &Paper, text: &str) {
        // Write md + sidecar directly; save() needs a real PDF and poppler
        store.initialize().unwrap();
        fs::write(store.path_for(&paper.paper_id, "md"), text).unwrap();
        fs::write(
            store.path_for(&paper.paper_id, "json"),
            serde_json::to_string_pretty(paper).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn test_list_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = PaperStore::new(dir.path().join("papers"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_and_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = PaperStore::new(dir.path());

        let paper = sample_paper("2301.12345");
        store_entry(&store, &paper, "# Sample Paper\n\nbody text");

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], paper);

        let content = store.read("2301.12345").unwrap();
        assert!(content.contains("body text"));
        assert!(store.has("2301.12345"));
    }

    #[test]
    fn test_read_missing_paper() {
        let dir = tempfile::tempdir().unwrap();
        let store = PaperStore::new(dir.path());
        let result = store.read("2301.99999");
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_old_style_id_is_flattened() {
        let dir = tempfile::tempdir().unwrap();
        let store = PaperStore::new(dir.path());

        let paper = sample_paper("math.gt/0104020");
        store_entry(&store, &paper, "content");

        assert!(store.has("math.gt/0104020"));
        assert!(dir.path().join("math.gt_0104020.md").is_file());
    }

    #[test]
    fn test_list_sorted_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = PaperStore::new(dir.path());

        store_entry(&store, &sample_paper("2302.00001"), "b");
        store_entry(&store, &sample_paper("2301.00001"), "a");

        let ids: Vec<String> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|p| p.paper_id)
            .collect();
        assert_eq!(ids, vec!["2301.00001", "2302.00001"]);
    }
}
