//! Tests for the in-memory chunk store.

use proptest::prelude::*;
use resume_rag::{Chunk, ChunkStore, InMemoryChunkStore};

fn chunk(document_id: &str, index: usize, text: &str) -> Chunk {
    Chunk {
        document_id: document_id.to_string(),
        index,
        text: text.to_string(),
        embedding: vec![index as f32, 1.0],
    }
}

#[tokio::test]
async fn unknown_document_is_empty() {
    let store = InMemoryChunkStore::new();
    assert!(store.chunks("missing").await.unwrap().is_empty());
    assert_eq!(store.count("missing").await.unwrap(), 0);
    store.delete("missing").await.unwrap();
}

#[tokio::test]
async fn replace_swaps_the_whole_chunk_set() {
    let store = InMemoryChunkStore::new();
    store
        .replace("resume-1", &[chunk("resume-1", 0, "old a"), chunk("resume-1", 1, "old b")])
        .await
        .unwrap();
    store.replace("resume-1", &[chunk("resume-1", 0, "new")]).await.unwrap();

    let stored = store.chunks("resume-1").await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].text, "new");
}

#[tokio::test]
async fn documents_are_isolated() {
    let store = InMemoryChunkStore::new();
    store.replace("a", &[chunk("a", 0, "alpha")]).await.unwrap();
    store.replace("b", &[chunk("b", 0, "beta"), chunk("b", 1, "gamma")]).await.unwrap();
    assert_eq!(store.document_count().await, 2);

    store.delete("a").await.unwrap();
    assert_eq!(store.count("a").await.unwrap(), 0);
    assert_eq!(store.count("b").await.unwrap(), 2);
    assert_eq!(store.document_count().await, 1);
}

#[tokio::test]
async fn replacing_with_nothing_removes_the_document() {
    let store = InMemoryChunkStore::new();
    store.replace("a", &[chunk("a", 0, "alpha")]).await.unwrap();
    store.replace("a", &[]).await.unwrap();
    assert_eq!(store.document_count().await, 0);
}

/// **Chunks come back in index order regardless of insertion order.**
mod prop_inmemory_ordering {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn chunks_are_returned_sorted_by_index(
            indices in proptest::collection::hash_set(0usize..1000, 0..30),
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let (stored, count) = rt.block_on(async {
                let store = InMemoryChunkStore::new();
                let chunks: Vec<Chunk> =
                    indices.iter().map(|i| chunk("doc", *i, "text")).collect();
                store.replace("doc", &chunks).await.unwrap();
                (store.chunks("doc").await.unwrap(), store.count("doc").await.unwrap())
            });

            prop_assert_eq!(stored.len(), indices.len());
            prop_assert_eq!(count, indices.len());
            for window in stored.windows(2) {
                prop_assert!(window[0].index < window[1].index);
            }
        }
    }
}
