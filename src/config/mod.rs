//! Application configuration

mod app_config;

pub use app_config::{
    resolve_api_key, AppConfig, EmbeddingConfig, LlmConfig, LogFormat, LoggingConfig,
    RerankerBackend, RerankerConfig, VectorStoreBackend, VectorStoreConfig,
};
