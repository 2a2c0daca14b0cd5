//! Configuration for chunking and retrieval.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Default maximum chunk size in characters.
///
/// 500 characters is roughly 125 tokens, far below the 8191-token input limit
/// of `text-embedding-3-small`, and keeps each chunk about one resume section.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 500;

/// Default overlap between consecutive chunks in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

/// Default number of chunks returned by a search.
pub const DEFAULT_TOP_K: usize = 5;

/// Parameters controlling how text is split into chunks.
///
/// Sizes count characters (Unicode scalar values), not bytes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChunkConfig {
    /// Maximum characters per chunk.
    pub max_chunk_size: usize,
    /// Characters repeated from the end of one chunk at the start of the next.
    pub overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self { max_chunk_size: DEFAULT_MAX_CHUNK_SIZE, overlap: DEFAULT_CHUNK_OVERLAP }
    }
}

impl ChunkConfig {
    /// Create a validated [`ChunkConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `max_chunk_size == 0` or
    /// `overlap >= max_chunk_size`.
    pub fn new(max_chunk_size: usize, overlap: usize) -> Result<Self> {
        let config = Self { max_chunk_size, overlap };
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants a deserialized or hand-built config must satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.max_chunk_size == 0 {
            return Err(RagError::ConfigError(
                "max_chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.overlap >= self.max_chunk_size {
            return Err(RagError::ConfigError(format!(
                "overlap ({}) must be less than max_chunk_size ({})",
                self.overlap, self.max_chunk_size
            )));
        }
        Ok(())
    }
}

/// Configuration parameters for the RAG pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RagConfig {
    /// How resume text is split before embedding.
    pub chunking: ChunkConfig,
    /// Number of top results to return from a search.
    pub top_k: usize,
    /// Minimum similarity a ranked result must reach to be kept.
    ///
    /// `None` keeps every ranked result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_threshold: Option<f32>,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { chunking: ChunkConfig::default(), top_k: DEFAULT_TOP_K, similarity_threshold: None }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }

    /// Validate a config obtained without the builder (e.g. deserialized).
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if the chunking parameters are
    /// inconsistent or the similarity threshold lies outside `[-1, 1]`.
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        if let Some(threshold) = self.similarity_threshold {
            if !(-1.0..=1.0).contains(&threshold) {
                return Err(RagError::ConfigError(format!(
                    "similarity_threshold ({threshold}) must be within [-1, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum chunk size in characters.
    pub fn max_chunk_size(mut self, size: usize) -> Self {
        self.config.chunking.max_chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn overlap(mut self, overlap: usize) -> Self {
        self.config.chunking.overlap = overlap;
        self
    }

    /// Set the number of top results to return from a search.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the minimum similarity threshold for filtering results.
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.config.similarity_threshold = Some(threshold);
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `max_chunk_size == 0`
    /// - `overlap >= max_chunk_size`
    /// - the similarity threshold is outside `[-1, 1]`
    pub fn build(self) -> Result<RagConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_chunk_config_is_valid() {
        let config = ChunkConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.overlap > 0);
        assert!(config.max_chunk_size < 2000);
    }

    #[test]
    fn overlap_must_be_smaller_than_chunk_size() {
        assert!(matches!(ChunkConfig::new(100, 100), Err(RagError::ConfigError(_))));
        assert!(matches!(ChunkConfig::new(0, 0), Err(RagError::ConfigError(_))));
        assert!(ChunkConfig::new(100, 0).is_ok());
    }

    #[test]
    fn builder_rejects_out_of_range_threshold() {
        let err = RagConfig::builder().similarity_threshold(1.5).build().unwrap_err();
        assert!(err.to_string().contains("similarity_threshold"));
    }

    #[test]
    fn deserializes_partial_config_with_defaults() {
        let config: RagConfig =
            serde_json::from_str(r#"{"chunking": {"max_chunk_size": 200}, "top_k": 3}"#).unwrap();
        assert_eq!(config.chunking, ChunkConfig { max_chunk_size: 200, overlap: 50 });
        assert_eq!(config.top_k, 3);
        assert_eq!(config.similarity_threshold, None);
        assert!(config.validate().is_ok());
    }
}
