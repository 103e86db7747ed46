//! PDF text extraction.
//!
//! Pages are read with `lopdf` in page order and joined by newlines. Results
//! are memoized by the digest of the uploaded bytes.

use lopdf::Document;
use thiserror::Error;

use crate::{services::cache::MemoCache, utils::hash::content_digest};

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Failed to load PDF: {0}")]
    Load(String),

    #[error("PDF contains no extractable text")]
    Empty,

    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Extracts the text of every page, in page order, joined by `\n`.
///
/// A page whose text cannot be decoded contributes an empty string.
pub fn extract_text(bytes: &[u8]) -> Result<String, PdfError> {
    let doc = Document::load_mem(bytes).map_err(|e| PdfError::Load(e.to_string()))?;

    let pages: Vec<String> = doc
        .get_pages()
        .into_keys()
        .map(|page_num| match doc.extract_text(&[page_num]) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to extract text from page {}: {}", page_num, e);
                String::new()
            }
        })
        .collect();

    tracing::debug!("Extracted {} pages", pages.len());
    Ok(pages.join("\n"))
}

/// Memoizing front of [`extract_text`] that runs on the blocking pool.
#[derive(Clone, Default)]
pub struct PdfExtractor {
    cache: MemoCache<String>,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: MemoCache::with_capacity(capacity),
        }
    }

    /// Returns the extracted text, or `PdfError::Empty` when it is whitespace-only.
    pub async fn extract(&self, bytes: Vec<u8>) -> Result<String, PdfError> {
        let key = content_digest(&[&bytes]);

        if let Some(text) = self.cache.get(&key) {
            tracing::debug!("PDF extraction cache hit ({})", &key[..12]);
            return Ok(text);
        }

        let text = tokio::task::spawn_blocking(move || extract_text(&bytes))
            .await
            .map_err(|e| PdfError::Task(e.to_string()))??;

        if text.trim().is_empty() {
            return Err(PdfError::Empty);
        }

        self.cache.insert(key, text.clone());
        Ok(text)
    }

    pub fn cached_documents(&self) -> usize {
        self.cache.len()
    }
}
