use async_trait::async_trait;

use crate::domain::{DomainError, Reranker, Vector};

/// A reranker that returns candidates unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReranker;

#[async_trait]
impl Reranker for NoOpReranker {
    async fn rerank(&self, _query: &str, vectors: Vec<Vector>) -> Result<Vec<Vector>, DomainError> {
        Ok(vectors)
    }

    fn reranker_name(&self) -> &'static str {
        "none"
    }
}
