//! Storage trait for embedded chunks.

use async_trait::async_trait;

use crate::document::Chunk;
use crate::error::Result;

/// Persists the embedded chunks of each document.
///
/// A store holds one record per chunk: document reference, index, text and
/// vector. Chunk sets are written whole; [`replace`](ChunkStore::replace)
/// discards whatever the document had before.
///
/// # Example
///
/// ```rust,ignore
/// use resume_rag::{ChunkStore, InMemoryChunkStore};
///
/// let store = InMemoryChunkStore::new();
/// store.replace("resume-1", &chunks).await?;
/// let stored = store.chunks("resume-1").await?;
/// ```
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Replace all chunks of `document_id` with `chunks`.
    ///
    /// Chunks must already carry their embeddings.
    async fn replace(&self, document_id: &str, chunks: &[Chunk]) -> Result<()>;

    /// Return the chunks of `document_id` ordered by index.
    ///
    /// An unknown document yields an empty `Vec`.
    async fn chunks(&self, document_id: &str) -> Result<Vec<Chunk>>;

    /// Return how many chunks are stored for `document_id`.
    async fn count(&self, document_id: &str) -> Result<usize>;

    /// Remove every chunk of `document_id`. No-op for an unknown document.
    async fn delete(&self, document_id: &str) -> Result<()>;
}
