//! Document domain - source documents and their chunk decomposition

mod chunk;
mod chunker;
mod entity;

pub use chunk::DocumentChunk;
pub use chunker::Chunker;
pub use entity::{Document, DocumentType};

#[cfg(test)]
pub use chunker::MockChunker;
