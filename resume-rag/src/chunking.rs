//! Splitting resume text into overlapping chunks for embedding.
//!
//! Text is split on blank lines into paragraphs, which are packed into chunks
//! of at most [`ChunkConfig::max_chunk_size`] characters. When a chunk closes,
//! the next one starts with the trailing [`ChunkConfig::overlap`] characters of
//! the previous chunk so a match near the boundary is not lost. Paragraphs too
//! large for one chunk are force-split at word boundaries.
//!
//! All sizes count `char`s, so multi-byte text is never cut inside a code point.

use tracing::debug;

use crate::config::ChunkConfig;
use crate::document::{Chunk, Document};
use crate::error::Result;

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and index but no embeddings.
/// Embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has no non-whitespace text.
    /// Each returned chunk has an empty embedding vector.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Packs blank-line separated paragraphs into overlapping chunks.
///
/// # Example
///
/// ```rust,ignore
/// use resume_rag::{ChunkConfig, Chunker, Document, ParagraphChunker};
///
/// let chunker = ParagraphChunker::new(ChunkConfig::new(200, 20)?)?;
/// let chunks = chunker.chunk(&Document::new("resume-1", text));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParagraphChunker {
    config: ChunkConfig,
}

impl ParagraphChunker {
    /// Create a chunker, rejecting an inconsistent config.
    pub fn new(config: ChunkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Return the chunking parameters.
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }
}

impl Chunker for ParagraphChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let chunks: Vec<Chunk> = chunk_text(&document.text, &self.config)
            .into_iter()
            .enumerate()
            .map(|(index, text)| Chunk {
                document_id: document.id.clone(),
                index,
                text,
                embedding: Vec::new(),
            })
            .collect();

        debug!(document.id = %document.id, chunk_count = chunks.len(), "chunked document");
        chunks
    }
}

/// Split `text` into trimmed, non-empty, overlapping chunks.
///
/// Empty or whitespace-only input yields an empty `Vec`. Every chunk holds at
/// most `config.max_chunk_size` characters.
///
/// A config that fails [`ChunkConfig::validate`] is clamped rather than
/// rejected: the size becomes at least 1 and the overlap at most `size - 1`.
pub fn chunk_text(text: &str, config: &ChunkConfig) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let max_chunk_size = config.max_chunk_size.max(1);
    let overlap = config.overlap.min(max_chunk_size - 1);
    let mut chunks = Vec::new();
    let mut current = String::new();

    for paragraph in split_paragraphs(text) {
        let current_len = current.chars().count();

        if current_len > 0 && current_len + paragraph.chars().count() > max_chunk_size {
            push_trimmed(&mut chunks, &current);

            let tail = char_tail(&current, overlap);
            current = if tail.is_empty() {
                paragraph.to_string()
            } else {
                format!("{tail} {paragraph}")
            };
        } else {
            if !current.is_empty() {
                current.push_str("\n\n");
            }
            current.push_str(paragraph);
        }

        if current.chars().count() > max_chunk_size {
            let mut slices = force_split(&current, max_chunk_size, overlap);
            current = slices.pop().unwrap_or_default();
            chunks.extend(slices);
        }
    }

    push_trimmed(&mut chunks, &current);
    chunks
}

/// Approximate the number of model tokens in `text` as one token per four characters.
///
/// Only meant for sizing guidance; real tokenizers vary by model and language.
pub fn estimate_token_count(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Split on runs of two or more newlines, dropping blank paragraphs.
fn split_paragraphs(text: &str) -> impl Iterator<Item = &str> {
    // A run of three or more newlines leaves leading newlines or empty pieces,
    // both of which disappear after trimming.
    text.split("\n\n").map(str::trim).filter(|p| !p.is_empty())
}

/// The last `n` characters of `text`.
fn char_tail(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match text.char_indices().rev().nth(n - 1) {
        Some((start, _)) => &text[start..],
        None => text,
    }
}

fn push_trimmed(chunks: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

/// Cut `text` into slices of at most `max_size` characters.
///
/// Each cut backs off to the last space at or before the limit, so words stay
/// whole, as long as the slice stays longer than `overlap`; otherwise the cut
/// is hard. The next slice starts `overlap` characters before the cut, which
/// always lies ahead of the previous start.
fn force_split(text: &str, max_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut slices = Vec::new();
    let mut start = 0;

    while start < len {
        let mut end = start + max_size;

        if end < len {
            let window_start = start + overlap + 1;
            if let Some(offset) = chars[window_start..=end].iter().rposition(|c| *c == ' ') {
                end = window_start + offset;
            }
        }
        let end = end.min(len);

        let slice: String = chars[start..end].iter().collect();
        push_trimmed(&mut slices, &slice);

        if end == len {
            break;
        }
        start = end - overlap;
    }

    slices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_tail_counts_characters_not_bytes() {
        assert_eq!(char_tail("héllo wörld", 5), "wörld");
        assert_eq!(char_tail("abc", 10), "abc");
        assert_eq!(char_tail("abc", 0), "");
    }

    #[test]
    fn force_split_backs_off_to_space() {
        let slices = force_split("alpha beta gamma delta", 12, 2);
        assert_eq!(slices[0], "alpha beta");
        assert!(slices.iter().all(|s| s.chars().count() <= 12));
        assert!(slices.last().unwrap().ends_with("delta"));
    }

    #[test]
    fn force_split_hard_cuts_when_space_is_inside_overlap() {
        // The only space sits inside the overlap window; backing off to it
        // would not move the next slice forward.
        let text = format!("a {}", "x".repeat(30));
        let slices = force_split(&text, 10, 5);
        assert_eq!(slices[0], text.chars().take(10).collect::<String>());
        assert!(slices.len() > 1);
    }
}
