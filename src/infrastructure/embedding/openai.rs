//! OpenAI-compatible embedding endpoint

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::HttpClientTrait;
use crate::domain::{DomainError, Embedder};

pub const DEFAULT_EMBEDDING_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 384;

/// Embedder backed by any server exposing `/v1/embeddings`
#[derive(Debug)]
pub struct OpenAiEmbedder<C: HttpClientTrait> {
    client: C,
    auth_header: Option<String>,
    base_url: String,
    model: String,
    dimension: usize,
}

impl<C: HttpClientTrait> OpenAiEmbedder<C> {
    pub fn new(client: C, model: impl Into<String>, dimension: usize) -> Self {
        Self {
            client,
            auth_header: None,
            base_url: DEFAULT_EMBEDDING_BASE_URL.to_string(),
            model: model.into(),
            dimension,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.auth_header = api_key.map(|key| format!("Bearer {}", key));
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];
        if let Some(ref auth) = self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }
        headers
    }

    fn build_request(&self, text: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "input": text,
        })
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<Vec<f32>, DomainError> {
        let response: EmbeddingResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("embedding", format!("Failed to parse embedding response: {}", e))
        })?;

        let embedding = response
            .data
            .into_iter()
            .min_by_key(|d| d.index)
            .map(|d| d.embedding)
            .ok_or_else(|| DomainError::provider("embedding", "No embedding in response"))?;

        if embedding.len() != self.dimension {
            return Err(DomainError::provider(
                "embedding",
                format!(
                    "Model {} returned {} dimensions, expected {}",
                    self.model,
                    embedding.len(),
                    self.dimension
                ),
            ));
        }

        Ok(embedding)
    }
}

#[async_trait]
impl<C: HttpClientTrait> Embedder for OpenAiEmbedder<C> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let url = self.embeddings_url();
        let body = self.build_request(text);

        debug!(model = %self.model, chars = text.len(), "Requesting embedding");

        let response = self.client.post_json(&url, self.headers(), &body).await?;

        self.parse_response(response)
    }

    fn embedding_dimension(&self) -> usize {
        self.dimension
    }

    fn embedder_name(&self) -> &'static str {
        "openai"
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}
