//! Ingest and query orchestration.
//!
//! The [`RagPipeline`] composes a [`Chunker`], an [`EmbeddingProvider`] and a
//! [`ChunkStore`]. Ingestion runs chunk → embed → store; a query runs
//! embed → fetch → rank → filter, and [`RagPipeline::context`] renders the
//! result for a chat prompt.
//!
//! # Example
//!
//! ```rust,ignore
//! use resume_rag::{Document, InMemoryChunkStore, RagConfig, RagPipeline};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .chunk_store(Arc::new(InMemoryChunkStore::new()))
//!     .build()?;
//!
//! pipeline.ingest(&Document::new("resume-1", raw_text)).await?;
//! let context = pipeline.context("resume-1", "What cloud experience do they have?").await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::chunking::{Chunker, ParagraphChunker};
use crate::config::RagConfig;
use crate::document::{Document, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::retrieval::{format_context, rank};
use crate::vectorstore::ChunkStore;

/// What [`RagPipeline::ingest`] did with a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The document was chunked, embedded and stored.
    Ingested {
        /// Number of chunks stored.
        chunk_count: usize,
    },
    /// The store already held chunks for the document; nothing was embedded.
    AlreadyIngested {
        /// Number of chunks already stored.
        chunk_count: usize,
    },
}

impl IngestOutcome {
    /// Number of chunks stored for the document after the call.
    pub fn chunk_count(&self) -> usize {
        match self {
            Self::Ingested { chunk_count } | Self::AlreadyIngested { chunk_count } => *chunk_count,
        }
    }
}

/// The RAG pipeline orchestrator. Construct one via [`RagPipeline::builder()`].
pub struct RagPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    chunk_store: Arc<dyn ChunkStore>,
    chunker: Arc<dyn Chunker>,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the embedding provider.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    /// Return a reference to the chunk store.
    pub fn chunk_store(&self) -> &Arc<dyn ChunkStore> {
        &self.chunk_store
    }

    /// Ingest a document unless the store already has chunks for it.
    ///
    /// # Errors
    ///
    /// See [`reingest`](Self::reingest).
    pub async fn ingest(&self, document: &Document) -> Result<IngestOutcome> {
        let existing = self.chunk_store.count(&document.id).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "chunk count failed during ingestion");
            RagError::PipelineError(format!(
                "failed to inspect stored chunks for document '{}': {e}",
                document.id
            ))
        })?;

        if existing > 0 {
            info!(document.id = %document.id, chunk_count = existing, "document already ingested");
            return Ok(IngestOutcome::AlreadyIngested { chunk_count: existing });
        }

        self.reingest(document).await
    }

    /// Chunk, embed and store a document, replacing any chunks stored before.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyDocument`] if the text yields no chunks.
    /// - [`RagError::PipelineError`] if embedding or storage fails, or the
    ///   provider returns a different number of vectors than chunks.
    pub async fn reingest(&self, document: &Document) -> Result<IngestOutcome> {
        let mut chunks = self.chunker.chunk(document);
        if chunks.is_empty() {
            return Err(RagError::EmptyDocument(document.id.clone()));
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "embedding failed during ingestion");
            RagError::PipelineError(format!("embedding failed for document '{}': {e}", document.id))
        })?;

        if embeddings.len() != chunks.len() {
            error!(
                document.id = %document.id,
                chunk_count = chunks.len(),
                embedding_count = embeddings.len(),
                "embedding count does not match chunk count"
            );
            return Err(RagError::PipelineError(format!(
                "expected {} embeddings for document '{}', got {}",
                chunks.len(),
                document.id,
                embeddings.len()
            )));
        }

        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        self.chunk_store.replace(&document.id, &chunks).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "store failed during ingestion");
            RagError::PipelineError(format!(
                "failed to store chunks for document '{}': {e}",
                document.id
            ))
        })?;

        let chunk_count = chunks.len();
        info!(document.id = %document.id, chunk_count, "ingested document");

        Ok(IngestOutcome::Ingested { chunk_count })
    }

    /// Return the configured `top_k` chunks of a document most similar to `query`.
    ///
    /// # Errors
    ///
    /// See [`search_with_limit`](Self::search_with_limit).
    pub async fn search(&self, document_id: &str, query: &str) -> Result<Vec<SearchResult>> {
        self.search_with_limit(document_id, query, self.config.top_k).await
    }

    /// Return up to `limit` chunks of a document most similar to `query`.
    ///
    /// Results are ordered by descending similarity. Results below the
    /// configured `similarity_threshold` are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if embedding or fetching fails.
    /// Returns [`RagError::DimensionMismatch`] if stored vectors do not match
    /// the query vector's length.
    pub async fn search_with_limit(
        &self,
        document_id: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedding_provider.embed(query).await.map_err(|e| {
            error!(error = %e, "embedding failed during query");
            RagError::PipelineError(format!("query embedding failed: {e}"))
        })?;

        let candidates = self.chunk_store.chunks(document_id).await.map_err(|e| {
            error!(document.id = document_id, error = %e, "chunk fetch failed during query");
            RagError::PipelineError(format!(
                "failed to load chunks for document '{document_id}': {e}"
            ))
        })?;

        let mut results = rank(&query_embedding, &candidates, limit).inspect_err(|e| {
            error!(document.id = document_id, error = %e, "ranking failed");
        })?;

        if let Some(threshold) = self.config.similarity_threshold {
            results.retain(|r| r.similarity >= threshold);
        }

        info!(document.id = document_id, result_count = results.len(), "search completed");
        Ok(results)
    }

    /// Search a document and render the results as a prompt context block.
    ///
    /// A document with no relevant chunks renders as
    /// [`NO_RELEVANT_INFORMATION`](crate::NO_RELEVANT_INFORMATION).
    pub async fn context(&self, document_id: &str, query: &str) -> Result<String> {
        let results = self.search(document_id, query).await?;
        Ok(format_context(&results))
    }

    /// Remove every stored chunk of a document.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if the store operation fails.
    pub async fn delete(&self, document_id: &str) -> Result<()> {
        self.chunk_store.delete(document_id).await.map_err(|e| {
            error!(document.id = document_id, error = %e, "failed to delete chunks");
            RagError::PipelineError(format!(
                "failed to delete chunks for document '{document_id}': {e}"
            ))
        })
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// `config` defaults to [`RagConfig::default()`] and `chunker` to a
/// [`ParagraphChunker`] built from the config's chunking parameters. The
/// embedding provider and chunk store are required.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    chunk_store: Option<Arc<dyn ChunkStore>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the chunk store backend.
    pub fn chunk_store(mut self, store: Arc<dyn ChunkStore>) -> Self {
        self.chunk_store = Some(store);
        self
    }

    /// Replace the default [`ParagraphChunker`].
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`RagPipeline`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if a required part is missing or the
    /// config is invalid.
    pub fn build(self) -> Result<RagPipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let chunk_store = self
            .chunk_store
            .ok_or_else(|| RagError::ConfigError("chunk_store is required".to_string()))?;
        let chunker = match self.chunker {
            Some(chunker) => chunker,
            None => Arc::new(ParagraphChunker::new(config.chunking)?),
        };

        Ok(RagPipeline { config, embedding_provider, chunk_store, chunker })
    }
}
