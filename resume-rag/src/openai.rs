//! OpenAI embedding provider using the OpenAI embeddings API.
//!
//! This module is only available when the `openai` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// The default OpenAI API base URL.
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// The default model for OpenAI embeddings.
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// The default dimensionality for `text-embedding-3-small`.
pub const DEFAULT_DIMENSIONS: usize = 1536;

/// Maximum number of inputs the embeddings endpoint accepts per request.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 2048;

/// An [`EmbeddingProvider`] backed by the OpenAI embeddings API.
///
/// # Configuration
///
/// - `model` – defaults to `text-embedding-3-small`.
/// - `dimensions` – optional Matryoshka dimension override.
/// - `max_batch_size` – inputs per request, defaults to 2048.
/// - `api_key` – from the constructor or the `OPENAI_API_KEY` environment variable.
///
/// # Example
///
/// ```rust,ignore
/// use resume_rag::openai::OpenAIEmbeddingProvider;
///
/// let provider = OpenAIEmbeddingProvider::from_env()?;
/// let vectors = provider.embed_batch(&["Led team of 5", "Built microservices"]).await?;
/// ```
pub struct OpenAIEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    dimensions: usize,
    /// If set, passed to the API for Matryoshka dimension truncation.
    request_dimensions: Option<usize>,
    max_batch_size: usize,
}

impl OpenAIEmbeddingProvider {
    /// Create a new provider with the given API key.
    ///
    /// Uses the default model (`text-embedding-3-small`) and dimensions (1536).
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Self::error("API key must not be empty"));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: OPENAI_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
            request_dimensions: None,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        })
    }

    /// Create a new provider using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| Self::error("OPENAI_API_KEY environment variable not set"))?;
        Self::new(api_key)
    }

    /// Set the model name (e.g. `text-embedding-3-large`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the output dimensions (Matryoshka support).
    ///
    /// When set, the API returns embeddings truncated to this size.
    /// This also updates the value returned by [`dimensions()`](EmbeddingProvider::dimensions).
    pub fn with_dimensions(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self.request_dimensions = Some(dims);
        self
    }

    /// Point the provider at an OpenAI-compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set how many inputs are sent per request. Zero is treated as one.
    pub fn with_max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size.max(1);
        self
    }

    fn error(message: impl Into<String>) -> RagError {
        RagError::EmbeddingError { provider: "OpenAI".into(), message: message.into() }
    }

    async fn request(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let request_body = EmbeddingRequest {
            model: &self.model,
            input: texts,
            dimensions: self.request_dimensions,
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "OpenAI", error = %e, "request failed");
                Self::error(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = "OpenAI", %status, "API error");
            return Err(Self::error(format!("API returned {status}: {detail}")));
        }

        let mut embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(provider = "OpenAI", error = %e, "failed to parse response");
            Self::error(format!("failed to parse response: {e}"))
        })?;

        if embedding_response.data.len() != texts.len() {
            return Err(Self::error(format!(
                "expected {} embeddings, API returned {}",
                texts.len(),
                embedding_response.data.len()
            )));
        }

        embedding_response.data.sort_by_key(|d| d.index);
        Ok(embedding_response.data.into_iter().map(|d| d.embedding).collect())
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = "OpenAI", text_len = text.len(), "embedding single text");

        let results = self.request(&[text]).await?;
        results.into_iter().next().ok_or_else(|| Self::error("API returned empty response"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.max_batch_size) {
            debug!(
                provider = "OpenAI",
                batch_size = batch.len(),
                model = %self.model,
                "embedding batch"
            );
            embeddings.extend(self.request(batch).await?);
        }

        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    use super::*;

    /// Embeds each input `"n"` as `[n]` and answers with `data` in reverse order.
    #[derive(Default)]
    struct FakeApi {
        batch_sizes: Mutex<Vec<usize>>,
        drop_one: bool,
    }

    async fn embeddings(State(api): State<Arc<FakeApi>>, Json(body): Json<Value>) -> Json<Value> {
        let inputs: Vec<&str> = body["input"]
            .as_array()
            .map(|inputs| inputs.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        api.batch_sizes.lock().unwrap().push(inputs.len());

        let mut data: Vec<Value> = inputs
            .iter()
            .enumerate()
            .map(|(index, input)| {
                let value: f32 = input.parse().unwrap_or(-1.0);
                json!({ "index": index, "embedding": [value] })
            })
            .collect();
        data.reverse();
        if api.drop_one {
            data.pop();
        }

        Json(json!({ "data": data }))
    }

    async fn spawn_api(api: Arc<FakeApi>) -> (String, tokio::task::JoinHandle<()>) {
        let app = Router::new().route("/v1/embeddings", post(embeddings)).with_state(api);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/v1/"), handle)
    }

    #[tokio::test]
    async fn batches_are_split_and_returned_in_input_order() {
        let api = Arc::new(FakeApi::default());
        let (base_url, handle) = spawn_api(api.clone()).await;
        let provider = OpenAIEmbeddingProvider::new("test-key")
            .unwrap()
            .with_base_url(base_url)
            .with_max_batch_size(2);

        let vectors = provider.embed_batch(&["0", "1", "2", "3", "4"]).await.unwrap();

        assert_eq!(vectors, vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0], vec![4.0]]);
        assert_eq!(*api.batch_sizes.lock().unwrap(), vec![2, 2, 1]);
        handle.abort();
    }

    #[tokio::test]
    async fn single_text_and_empty_batch() {
        let api = Arc::new(FakeApi::default());
        let (base_url, handle) = spawn_api(api.clone()).await;
        let provider = OpenAIEmbeddingProvider::new("test-key").unwrap().with_base_url(base_url);

        assert_eq!(provider.embed("7").await.unwrap(), vec![7.0]);
        assert!(provider.embed_batch(&[]).await.unwrap().is_empty());
        assert_eq!(*api.batch_sizes.lock().unwrap(), vec![1]);
        handle.abort();
    }

    #[tokio::test]
    async fn response_with_missing_embeddings_is_rejected() {
        let api = Arc::new(FakeApi { drop_one: true, ..FakeApi::default() });
        let (base_url, handle) = spawn_api(api).await;
        let provider = OpenAIEmbeddingProvider::new("test-key").unwrap().with_base_url(base_url);

        let err = provider.embed_batch(&["0", "1"]).await.unwrap_err();
        assert!(matches!(
            err,
            RagError::EmbeddingError { ref message, .. } if message.contains("expected 2 embeddings")
        ));
        handle.abort();
    }

    #[test]
    fn constructor_validates_settings() {
        assert!(OpenAIEmbeddingProvider::new("").is_err());
        let provider = OpenAIEmbeddingProvider::new("k").unwrap().with_max_batch_size(0);
        assert_eq!(provider.max_batch_size, 1);
        assert_eq!(provider.with_dimensions(256).dimensions(), 256);
    }
}
