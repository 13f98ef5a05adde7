//! Embedding provider backed by an Ollama server.

use crate::embeddings::EmbeddingProvider;
use crate::error::{Result, VectorStoreError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_EMBED_MODEL: &str = "nomic-embed-text:latest";
pub const DEFAULT_EMBED_TIMEOUT: Duration = Duration::from_secs(30);

/// Calls `POST {host}/api/embeddings` once per text.
#[derive(Clone, Debug)]
pub struct OllamaEmbedder {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(host: &str, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(VectorStoreError::EmbeddingError(
                "missing embedding model name".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VectorStoreError::EmbeddingError(format!("HTTP client: {e}")))?;
        let endpoint = format!("{}/api/embeddings", host.trim_end_matches('/'));
        Ok(Self {
            client,
            endpoint,
            model,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(&self, text: &str) -> std::result::Result<Vec<f32>, reqwest::Error> {
        let request = EmbeddingRequest {
            model: &self.model,
            prompt: text,
        };
        let response: EmbeddingResponse = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.embedding)
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Vec<f32> {
        match self.request(text).await {
            Ok(vector) => vector,
            Err(err) => {
                log::warn!("Embedding request to {} failed: {err}", self.endpoint);
                Vec::new()
            }
        }
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}
