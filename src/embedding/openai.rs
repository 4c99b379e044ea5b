//! OpenAI-compatible embedding client.
//!
//! Talks to any `/v1/embeddings` endpoint that speaks the OpenAI wire
//! format, including local servers such as LM Studio or vLLM via
//! [`with_endpoint`](OpenAiEmbedder::with_endpoint).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::embedding::embedder::Embedder;
use crate::error::{Result, TamrinError};

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/embeddings";

/// An [`Embedder`] backed by an OpenAI-compatible embeddings API.
#[derive(Debug, Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    dimension: usize,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl OpenAiEmbedder {
    /// Create a client for the given model. The dimension defaults to the
    /// model's published size when known, otherwise 1536.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let model = model.into();
        let dimension = match model.as_str() {
            "text-embedding-3-large" => 3072,
            _ => 1536,
        };
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            dimension,
        }
    }

    /// Override the expected vector dimensionality.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Point the client at a different OpenAI-compatible endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                TamrinError::embedding_unavailable(format!("embedding request failed: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TamrinError::embedding_unavailable(format!(
                "embedding endpoint returned {status}: {body}"
            )));
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|err| {
            TamrinError::embedding_unavailable(format!("malformed embedding response: {err}"))
        })?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .ok_or_else(|| {
                TamrinError::embedding_unavailable("embedding response contained no vectors")
            })
    }
}
