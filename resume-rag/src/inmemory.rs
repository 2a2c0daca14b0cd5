//! In-memory chunk store.
//!
//! [`InMemoryChunkStore`] keeps chunks in a `HashMap` behind a
//! `tokio::sync::RwLock`. It suits development, tests and single-process
//! deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::document::Chunk;
use crate::error::Result;
use crate::vectorstore::ChunkStore;

/// A [`ChunkStore`] holding chunks in process memory.
///
/// Documents map to their chunk list, kept sorted by chunk index.
#[derive(Debug, Default)]
pub struct InMemoryChunkStore {
    documents: RwLock<HashMap<String, Vec<Chunk>>>,
}

impl InMemoryChunkStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents with at least one stored chunk.
    pub async fn document_count(&self) -> usize {
        self.documents.read().await.len()
    }
}

#[async_trait]
impl ChunkStore for InMemoryChunkStore {
    async fn replace(&self, document_id: &str, chunks: &[Chunk]) -> Result<()> {
        let mut sorted = chunks.to_vec();
        sorted.sort_by_key(|c| c.index);

        let mut documents = self.documents.write().await;
        if sorted.is_empty() {
            documents.remove(document_id);
        } else {
            documents.insert(document_id.to_string(), sorted);
        }

        debug!(document.id = document_id, chunk_count = chunks.len(), "replaced chunks in memory");
        Ok(())
    }

    async fn chunks(&self, document_id: &str) -> Result<Vec<Chunk>> {
        let documents = self.documents.read().await;
        Ok(documents.get(document_id).cloned().unwrap_or_default())
    }

    async fn count(&self, document_id: &str) -> Result<usize> {
        let documents = self.documents.read().await;
        Ok(documents.get(document_id).map_or(0, Vec::len))
    }

    async fn delete(&self, document_id: &str) -> Result<()> {
        let mut documents = self.documents.write().await;
        documents.remove(document_id);
        Ok(())
    }
}
