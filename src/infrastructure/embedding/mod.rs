//! Embedding provider implementations

mod openai;

pub use openai::{
    OpenAiEmbedder, DEFAULT_EMBEDDING_BASE_URL, DEFAULT_EMBEDDING_DIMENSION,
    DEFAULT_EMBEDDING_MODEL,
};

// Re-export HTTP client for use by embedding providers
pub use super::llm::{HttpClient, HttpClientTrait};
