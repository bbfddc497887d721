//! Infrastructure layer - External service implementations

pub mod chunker;
pub mod embedding;
pub mod generator;
pub mod llm;
pub mod logging;
pub mod rerank;
pub mod services;
pub mod vector_store;
