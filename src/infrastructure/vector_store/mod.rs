//! Vector store implementations

mod factory;
mod in_memory;
mod point;
mod qdrant;
mod qdrant_api;

pub use factory::VectorStoreFactory;
pub use in_memory::InMemoryVectorStore;
pub use point::PointPayload;
pub use qdrant::{qdrant_url, QdrantVectorStore, DEFAULT_QDRANT_HOST, DEFAULT_QDRANT_PORT};
pub use qdrant_api::{QdrantApi, QdrantClient};
