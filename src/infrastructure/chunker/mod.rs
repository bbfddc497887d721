//! Chunker implementations

mod whole_document;

pub use whole_document::WholeDocumentChunker;
