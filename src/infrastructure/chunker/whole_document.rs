use crate::domain::{Chunker, Document, DocumentChunk, DomainError};

/// Attaches the whole document as its single chunk
///
/// The chunk reuses the document id, so re-indexing the same document
/// overwrites its previous vector.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeDocumentChunker;

impl Chunker for WholeDocumentChunker {
    fn chunk(&self, document: Document) -> Result<Document, DomainError> {
        let mut chunk = DocumentChunk::new(document.id(), document.content().to_vec());

        if let Some(metadata) = document.metadata() {
            chunk = chunk.with_metadata(metadata.clone());
        }

        Ok(document.with_chunks(vec![chunk]))
    }

    fn name(&self) -> &'static str {
        "whole_document"
    }
}
