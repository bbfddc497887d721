//! Reranking domain

mod reranker;

pub use reranker::Reranker;

#[cfg(test)]
pub use reranker::MockReranker;
