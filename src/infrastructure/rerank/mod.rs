//! Reranker implementations

mod cross_encoder;
mod noop;

pub use cross_encoder::{CrossEncoderReranker, DEFAULT_RERANK_BASE_URL, DEFAULT_RERANK_MODEL};
pub use noop::NoOpReranker;
