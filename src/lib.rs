//! MemoRAG
//!
//! Retrieval-augmented generation over a vector index:
//! - Documents are chunked, embedded and stored in a vector collection
//! - Queries are embedded, matched, reranked and answered by an LLM
//! - Every capability (embedder, store, reranker, generator) is swappable

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use crate::config::{resolve_api_key, RerankerBackend};
use domain::{Embedder, Generator, Reranker, VectorStore};
use infrastructure::{
    chunker::WholeDocumentChunker,
    embedding::OpenAiEmbedder,
    generator::LlmGenerator,
    llm::{HttpClient, OpenAiChatProvider},
    rerank::{CrossEncoderReranker, NoOpReranker},
    services::{IndexDocument, SearchDocuments},
    vector_store::VectorStoreFactory,
};
use tracing::info;

/// Build the indexing pipeline from configuration
pub fn create_index_document(config: &AppConfig) -> anyhow::Result<IndexDocument> {
    let embedder = create_embedder(config);
    let vector_store = create_vector_store(config, embedder.embedding_dimension())?;

    Ok(IndexDocument::new(
        Arc::new(WholeDocumentChunker),
        embedder,
        vector_store,
    ))
}

/// Build the retrieval pipeline from configuration
pub fn create_search_documents(config: &AppConfig) -> anyhow::Result<SearchDocuments> {
    let embedder = create_embedder(config);
    let vector_store = create_vector_store(config, embedder.embedding_dimension())?;
    let reranker = create_reranker(config);
    let generator = create_generator(config)?;

    Ok(SearchDocuments::new(embedder, vector_store, reranker, generator))
}

fn create_embedder(config: &AppConfig) -> Arc<dyn Embedder> {
    let embedding = &config.embedding;
    info!(model = %embedding.model, dimension = embedding.dimension, "Using embedding model");

    Arc::new(
        OpenAiEmbedder::new(HttpClient::new(), &embedding.model, embedding.dimension)
            .with_base_url(&embedding.base_url)
            .with_api_key(resolve_api_key(&embedding.api_key_env)),
    )
}

fn create_vector_store(
    config: &AppConfig,
    dimension: usize,
) -> anyhow::Result<Arc<dyn VectorStore>> {
    let store = VectorStoreFactory::create(&config.vector_store, dimension)?;
    info!(store = store.store_type(), "Using vector store");
    Ok(store)
}

fn create_reranker(config: &AppConfig) -> Arc<dyn Reranker> {
    let reranker = &config.reranker;

    match reranker.backend {
        RerankerBackend::Http => {
            info!(model = %reranker.model, "Using cross-encoder reranker");
            Arc::new(
                CrossEncoderReranker::new(HttpClient::new(), &reranker.model)
                    .with_base_url(&reranker.base_url)
                    .with_api_key(resolve_api_key(&reranker.api_key_env)),
            )
        }
        RerankerBackend::None => {
            info!("Reranking disabled");
            Arc::new(NoOpReranker)
        }
    }
}

fn create_generator(config: &AppConfig) -> anyhow::Result<Arc<dyn Generator>> {
    let llm = &config.llm;
    let client = HttpClient::with_timeout(Duration::from_secs(llm.timeout_secs))?;
    let provider = OpenAiChatProvider::with_base_url(
        client,
        resolve_api_key(&llm.api_key_env),
        &llm.base_url,
    );

    info!(model = %llm.model, base_url = %llm.base_url, "Using LLM");

    Ok(Arc::new(
        LlmGenerator::new(Arc::new(provider), &llm.model)
            .with_temperature(llm.temperature)
            .with_max_tokens(llm.max_tokens),
    ))
}
