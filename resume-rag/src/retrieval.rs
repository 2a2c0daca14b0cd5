//! Ranking stored chunks against a query and rendering them as prompt context.

use std::cmp::Ordering;

use tracing::debug;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;
use crate::similarity::cosine_similarity;

/// Context returned when no chunk was retrieved.
pub const NO_RELEVANT_INFORMATION: &str = "No relevant information found.";

/// Rank `candidates` by cosine similarity to `query_embedding`.
///
/// Results are ordered by descending similarity; exact ties keep the order of
/// `candidates`. At most `limit` results are returned, so `limit == 0` yields
/// an empty `Vec`. Candidates whose similarity is undefined (zero-magnitude
/// embedding) are left out of the ranking.
///
/// # Errors
///
/// Returns [`RagError::DimensionMismatch`](crate::RagError::DimensionMismatch)
/// if any candidate's embedding differs in length from the query.
pub fn rank(
    query_embedding: &[f32],
    candidates: &[Chunk],
    limit: usize,
) -> Result<Vec<SearchResult>> {
    let mut results = Vec::with_capacity(candidates.len());

    for chunk in candidates {
        match cosine_similarity(query_embedding, &chunk.embedding)? {
            Some(similarity) => results.push(SearchResult {
                chunk_text: chunk.text.clone(),
                chunk_index: chunk.index,
                similarity,
            }),
            None => {
                debug!(
                    document.id = %chunk.document_id,
                    chunk_index = chunk.index,
                    "skipping chunk with undefined similarity"
                );
            }
        }
    }

    // `sort_by` is stable, which keeps equal scores in candidate order.
    results.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap_or(Ordering::Equal));
    results.truncate(limit);
    Ok(results)
}

/// Render ranked results as a context block for a chat prompt.
///
/// Each result becomes `[Context N] (Relevance: XX.X%)` followed by the chunk
/// text on the next line, where `N` is the 1-based rank. Blocks are separated
/// by a blank line. An empty slice renders as [`NO_RELEVANT_INFORMATION`].
///
/// Percentages are rounded half away from zero, so `0.0625` renders as `6.3%`.
pub fn format_context(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return NO_RELEVANT_INFORMATION.to_string();
    }

    results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            format!(
                "[Context {}] (Relevance: {:.1}%)\n{}",
                i + 1,
                relevance_percent(result.similarity),
                result.chunk_text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Similarity as a percentage rounded to one decimal place.
///
/// `{:.1}` alone rounds exact ties to even; rounding first keeps `6.25` at `6.3`.
fn relevance_percent(similarity: f32) -> f64 {
    (f64::from(similarity) * 1000.0).round() / 10.0
}
