use serde::Deserialize;

use crate::domain::Distance;
use crate::infrastructure::embedding::{
    DEFAULT_EMBEDDING_BASE_URL, DEFAULT_EMBEDDING_DIMENSION, DEFAULT_EMBEDDING_MODEL,
};
use crate::infrastructure::llm::{DEFAULT_CHAT_BASE_URL, DEFAULT_CHAT_MODEL};
use crate::infrastructure::rerank::{DEFAULT_RERANK_BASE_URL, DEFAULT_RERANK_MODEL};
use crate::infrastructure::vector_store::{DEFAULT_QDRANT_HOST, DEFAULT_QDRANT_PORT};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub embedding: EmbeddingConfig,
    pub reranker: RerankerConfig,
    pub llm: LlmConfig,
    pub vector_store: VectorStoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Embedding endpoint settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
    pub base_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub dimension: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RerankerBackend {
    #[default]
    Http,
    None,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RerankerConfig {
    pub backend: RerankerBackend,
    pub model: String,
    pub base_url: String,
    pub api_key_env: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    pub api_key_env: String,
    pub timeout_secs: u64,
    /// Sampling temperature; unset uses the provider default
    pub temperature: Option<f32>,
    /// Cap on generated tokens; unset uses the provider default
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VectorStoreBackend {
    #[default]
    Qdrant,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    pub backend: VectorStoreBackend,
    pub host: String,
    pub port: u16,
    pub api_key_env: String,
    pub distance: Distance,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            base_url: DEFAULT_EMBEDDING_BASE_URL.to_string(),
            api_key_env: "EMBEDDING_API_KEY".to_string(),
            dimension: DEFAULT_EMBEDDING_DIMENSION,
        }
    }
}

impl Default for RerankerConfig {
    fn default() -> Self {
        Self {
            backend: RerankerBackend::default(),
            model: DEFAULT_RERANK_MODEL.to_string(),
            base_url: DEFAULT_RERANK_BASE_URL.to_string(),
            api_key_env: "RERANKER_API_KEY".to_string(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_CHAT_MODEL.to_string(),
            base_url: DEFAULT_CHAT_BASE_URL.to_string(),
            api_key_env: "MISTRAL_API_KEY".to_string(),
            timeout_secs: 120,
            temperature: None,
            max_tokens: None,
        }
    }
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            backend: VectorStoreBackend::default(),
            host: DEFAULT_QDRANT_HOST.to_string(),
            port: DEFAULT_QDRANT_PORT,
            api_key_env: "QDRANT_API_KEY".to_string(),
            distance: Distance::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config = ::config::Config::builder()
            .add_source(::config::File::with_name("config/default").required(false))
            .add_source(::config::File::with_name("config/local").required(false))
            .add_source(
                ::config::Environment::with_prefix("MEMORAG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

/// Read an API key from the named environment variable; empty values count as unset
pub fn resolve_api_key(env_var: &str) -> Option<String> {
    if env_var.is_empty() {
        return None;
    }

    std::env::var(env_var)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
