//! Retrieval core for resume chat.
//!
//! This crate provides:
//! - Paragraph-aware chunking of extracted resume text ([`chunk_text`], [`ParagraphChunker`])
//! - Cosine similarity ranking of stored chunks against a query ([`rank`])
//! - Rendering of ranked chunks into a prompt context block ([`format_context`])
//! - An ingest/query [`RagPipeline`] over injected [`EmbeddingProvider`] and
//!   [`ChunkStore`] implementations
//!
//! Chunking and ranking are pure functions; the pipeline, stores and
//! providers are `Send + Sync` and meant to be shared behind `Arc`.
//!
//! # Features
//!
//! - `openai` — [`openai::OpenAIEmbeddingProvider`] over the OpenAI embeddings API
//! - `pgvector` — [`pgvector::PgVectorChunkStore`] over PostgreSQL + pgvector

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
pub mod pipeline;
pub mod retrieval;
pub mod similarity;
pub mod vectorstore;

#[cfg(feature = "openai")]
pub mod openai;
#[cfg(feature = "pgvector")]
pub mod pgvector;

pub use chunking::{Chunker, ParagraphChunker, chunk_text, estimate_token_count};
pub use config::{
    ChunkConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_MAX_CHUNK_SIZE, DEFAULT_TOP_K, RagConfig,
    RagConfigBuilder,
};
pub use document::{Chunk, Document, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use inmemory::InMemoryChunkStore;
pub use pipeline::{IngestOutcome, RagPipeline, RagPipelineBuilder};
pub use retrieval::{NO_RELEVANT_INFORMATION, format_context, rank};
pub use similarity::cosine_similarity;
pub use vectorstore::ChunkStore;
