//! Application services - the indexing and retrieval pipelines

mod index_document;
mod search_documents;

pub use index_document::{IndexDocument, IndexReport};
pub use search_documents::SearchDocuments;

/// Collection every document is indexed into and every query searches
pub const COLLECTION_NAME: &str = "infos";
