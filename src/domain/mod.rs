//! Domain layer - Core entities and the capability traits of the RAG pipeline

pub mod document;
pub mod embedding;
pub mod error;
pub mod generator;
pub mod llm;
pub mod pipeline;
pub mod rerank;
pub mod vector;
pub mod vector_store;

pub use document::{Chunker, Document, DocumentChunk, DocumentType};
pub use embedding::Embedder;
pub use error::DomainError;
pub use generator::{AnswerStream, Generator};
pub use llm::{
    FinishReason, LlmProvider, LlmRequest, LlmStream, Message, MessageRole, StreamChunk,
};
pub use pipeline::{Capability, PipelineError};
pub use rerank::Reranker;
pub use vector::{SearchResponse, Vector, DOCUMENT_ID_KEY, DOCUMENT_NAME_KEY};
pub use vector_store::{Distance, VectorStore};
