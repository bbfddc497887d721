//! Embedder trait definition

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Trait for embedding backends
///
/// Every vector returned by [`Embedder::embed`] has exactly
/// [`Embedder::embedding_dimension`] components.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Convert the input text into a vector embedding
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Dimension of the embeddings produced by this embedder
    fn embedding_dimension(&self) -> usize;

    /// Get the embedder name
    fn embedder_name(&self) -> &'static str;
}
