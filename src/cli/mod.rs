//! CLI module for MemoRAG
//!
//! Provides the two pipeline commands:
//! - `index`: chunk, embed and store a document
//! - `search`: retrieve, rerank and answer a query

pub mod index;
pub mod search;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// MemoRAG - Retrieval-augmented generation over a vector index
#[derive(Parser)]
#[command(name = "memorag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Index a text or a file into the vector store
    Index(index::IndexArgs),

    /// Search the indexed documents and answer a query
    Search(search::SearchArgs),
}

/// Options overriding the loaded configuration
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Embedding model name
    #[arg(long, global = true)]
    pub embedding_model: Option<String>,

    /// Cross-encoder reranking model name
    #[arg(long, global = true)]
    pub rerank_model: Option<String>,

    /// LLM model name (e.g. mistral-tiny)
    #[arg(long, global = true)]
    pub llm_model: Option<String>,

    /// Embedding vector dimension
    #[arg(long, global = true)]
    pub embedding_dim: Option<usize>,

    /// Qdrant host
    #[arg(long, global = true)]
    pub qdrant_host: Option<String>,

    /// Qdrant port
    #[arg(long, global = true)]
    pub qdrant_port: Option<u16>,
}

impl GlobalArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(ref model) = self.embedding_model {
            config.embedding.model = model.clone();
        }
        if let Some(ref model) = self.rerank_model {
            config.reranker.model = model.clone();
        }
        if let Some(ref model) = self.llm_model {
            config.llm.model = model.clone();
        }
        if let Some(dimension) = self.embedding_dim {
            config.embedding.dimension = dimension;
        }
        if let Some(ref host) = self.qdrant_host {
            config.vector_store.host = host.clone();
        }
        if let Some(port) = self.qdrant_port {
            config.vector_store.port = port;
        }
    }
}

/// Load `.env` and layered configuration, apply CLI overrides, start logging
pub fn bootstrap(global: &GlobalArgs) -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load()?;
    global.apply(&mut config);

    logging::init_logging(&config.logging);

    Ok(config)
}
