//! Vector store factory

use std::sync::Arc;

use crate::config::{resolve_api_key, VectorStoreBackend, VectorStoreConfig};
use crate::domain::{DomainError, VectorStore};

use super::in_memory::InMemoryVectorStore;
use super::qdrant::{qdrant_url, QdrantVectorStore};
use super::qdrant_api::QdrantClient;

/// Factory for creating vector stores
#[derive(Debug)]
pub struct VectorStoreFactory;

impl VectorStoreFactory {
    /// Create the configured store for embeddings of `dimension` components
    pub fn create(
        config: &VectorStoreConfig,
        dimension: usize,
    ) -> Result<Arc<dyn VectorStore>, DomainError> {
        match config.backend {
            VectorStoreBackend::Qdrant => {
                let client = QdrantClient::new(
                    &qdrant_url(&config.host, config.port),
                    resolve_api_key(&config.api_key_env),
                )?;

                Ok(Arc::new(
                    QdrantVectorStore::new(client, dimension).with_distance(config.distance),
                ))
            }
            VectorStoreBackend::Memory => Ok(Arc::new(InMemoryVectorStore::with_distance(
                dimension,
                config.distance,
            ))),
        }
    }
}
