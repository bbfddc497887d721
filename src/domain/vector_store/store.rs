//! Vector store trait definition

use async_trait::async_trait;
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use crate::domain::vector::Vector;
use crate::domain::DomainError;

/// Persists vectors in named collections and answers nearest-neighbour queries
///
/// Collections are created on first use with the metric and dimension the
/// store was constructed with. Creation is idempotent: concurrent first
/// writers converge on a single collection per name.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Index a single vector
    async fn index_vector(&self, vector: Vector, collection_name: &str) -> Result<(), DomainError> {
        self.index_vectors(vec![vector], collection_name).await
    }

    /// Upsert vectors, replacing any stored vector with the same id
    async fn index_vectors(
        &self,
        vectors: Vec<Vector>,
        collection_name: &str,
    ) -> Result<(), DomainError>;

    /// Return up to `top_k` vectors ordered by decreasing similarity
    async fn search_similar(
        &self,
        query_vector: &[f32],
        top_k: usize,
        collection_name: &str,
    ) -> Result<Vec<Vector>, DomainError>;

    /// Look up a stored vector by id
    async fn get_vector(
        &self,
        id: Uuid,
        collection_name: &str,
    ) -> Result<Option<Vector>, DomainError>;

    /// Get the store type name
    fn store_type(&self) -> &'static str;
}
