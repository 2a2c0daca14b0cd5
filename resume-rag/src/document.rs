//! Data types for documents, chunks, and search results.

use serde::{Deserialize, Serialize};

/// A resume's extracted text, keyed by the resume it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    /// Identifier of the source resume.
    pub id: String,
    /// The raw extracted text.
    pub text: String,
}

impl Document {
    /// Create a document from an id and its text.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into() }
    }
}

/// A trimmed, non-empty segment of a [`Document`] and its embedding.
///
/// Chunks are produced in one pass over a document and never edited; ingesting
/// the document again replaces the whole set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The ID of the parent [`Document`].
    pub document_id: String,
    /// Zero-based position among the chunks of the same document.
    pub index: usize,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text. Empty until embedded.
    pub embedding: Vec<f32>,
}

/// A ranked chunk returned for a single query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// Text of the matched chunk.
    pub chunk_text: String,
    /// Index of the matched chunk within its document.
    pub chunk_index: usize,
    /// Cosine similarity to the query, in `[-1, 1]`.
    pub similarity: f32,
}
