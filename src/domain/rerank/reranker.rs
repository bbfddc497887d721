//! Reranker trait definition

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::vector::Vector;
use crate::domain::DomainError;

/// Reorders retrieved vectors by query-specific relevance
///
/// The result is a permutation of a subset of the input, most relevant first.
/// Candidates with equal scores keep their retrieval order. Implementations
/// may drop candidates but never add new ones.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Reranker: Send + Sync {
    async fn rerank(&self, query: &str, vectors: Vec<Vector>) -> Result<Vec<Vector>, DomainError>;

    /// Get the reranker name
    fn reranker_name(&self) -> &'static str;
}
