//! Error types for the `resume-rag` crate.

use thiserror::Error;

/// Errors that can occur while chunking, embedding, storing or ranking resume text.
#[derive(Debug, Error)]
pub enum RagError {
    /// Two vectors of different length were compared.
    ///
    /// This is a data-integrity error: embeddings from different models (or a
    /// truncated vector) ended up side by side. Callers must fix the input
    /// rather than retry.
    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Length of the reference (query) vector.
        expected: usize,
        /// Length of the offending vector.
        actual: usize,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the chunk store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The document produced no chunks, so there is nothing to embed.
    #[error("Document '{0}' has no text to embed")]
    EmptyDocument(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An error in the ingest or query orchestration.
    #[error("Pipeline error: {0}")]
    PipelineError(String),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
