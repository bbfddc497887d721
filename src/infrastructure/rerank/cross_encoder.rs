//! Cross-encoder reranking over an HTTP rerank endpoint

use std::cmp::Ordering;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::{DomainError, Reranker, Vector};
use crate::infrastructure::llm::HttpClientTrait;

pub const DEFAULT_RERANK_BASE_URL: &str = "http://localhost:8081";
pub const DEFAULT_RERANK_MODEL: &str = "cross-encoder/mmarco-mMiniLMv2-L12-H384-v1";

/// Scores (query, content) pairs with a cross-encoder served at `/v1/rerank`
#[derive(Debug)]
pub struct CrossEncoderReranker<C: HttpClientTrait> {
    client: C,
    auth_header: Option<String>,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> CrossEncoderReranker<C> {
    pub fn new(client: C, model: impl Into<String>) -> Self {
        Self {
            client,
            auth_header: None,
            base_url: DEFAULT_RERANK_BASE_URL.to_string(),
            model: model.into(),
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

    fn rerank_url(&self) -> String {
        format!("{}/v1/rerank", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];
        if let Some(ref auth) = self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }
        headers
    }

    fn build_request(&self, query: &str, vectors: &[Vector]) -> Result<serde_json::Value, DomainError> {
        let documents = vectors
            .iter()
            .map(|v| v.content_text())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(serde_json::json!({
            "model": self.model,
            "query": query,
            "documents": documents,
        }))
    }

    /// Candidate indices ordered by descending score, retrieval order on ties
    fn rank(&self, json: serde_json::Value, candidates: usize) -> Result<Vec<usize>, DomainError> {
        let response: RerankResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("rerank", format!("Failed to parse rerank response: {}", e))
        })?;

        let mut seen = vec![false; candidates];
        let mut scored = Vec::with_capacity(response.results.len());

        for result in response.results {
            match seen.get_mut(result.index) {
                Some(flag) if !*flag => *flag = true,
                Some(_) => {
                    return Err(DomainError::provider(
                        "rerank",
                        format!("Duplicate result index {}", result.index),
                    ))
                }
                None => {
                    return Err(DomainError::provider(
                        "rerank",
                        format!(
                            "Result index {} out of range for {} candidates",
                            result.index, candidates
                        ),
                    ))
                }
            }
            scored.push((result.index, result.relevance_score));
        }

        scored.sort_by_key(|(index, _)| *index);
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        Ok(scored.into_iter().map(|(index, _)| index).collect())
    }
}

#[async_trait]
impl<C: HttpClientTrait> Reranker for CrossEncoderReranker<C> {
    async fn rerank(&self, query: &str, vectors: Vec<Vector>) -> Result<Vec<Vector>, DomainError> {
        if vectors.is_empty() {
            return Ok(vectors);
        }

        let url = self.rerank_url();
        let body = self.build_request(query, &vectors)?;

        let response = self.client.post_json(&url, self.headers(), &body).await?;
        let order = self.rank(response, vectors.len())?;

        debug!(
            model = %self.model,
            candidates = vectors.len(),
            kept = order.len(),
            "Reranked candidates"
        );

        let mut slots: Vec<Option<Vector>> = vectors.into_iter().map(Some).collect();

        Ok(order
            .into_iter()
            .filter_map(|index| slots[index].take())
            .collect())
    }

    fn reranker_name(&self) -> &'static str {
        "cross-encoder"
    }
}

#[derive(Debug, Deserialize)]
struct RerankResponse {
    results: Vec<RerankResult>,
}

#[derive(Debug, Deserialize)]
struct RerankResult {
    index: usize,
    relevance_score: f32,
}
