//! Indexing pipeline: chunk, embed and store a document

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::COLLECTION_NAME;
use crate::domain::pipeline::CapabilityResultExt;
use crate::domain::{
    Capability, Chunker, Document, DocumentChunk, Embedder, PipelineError, Vector, VectorStore,
    DOCUMENT_ID_KEY, DOCUMENT_NAME_KEY,
};

/// Outcome of indexing one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexReport {
    pub document_id: Uuid,
    pub document_name: String,
    pub vector_count: usize,
}

/// Turns a document into vectors and writes them in a single batch
pub struct IndexDocument {
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
}

impl std::fmt::Debug for IndexDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexDocument")
            .field("chunker", &self.chunker.name())
            .field("embedder", &self.embedder.embedder_name())
            .field("vector_store", &self.vector_store.store_type())
            .finish()
    }
}

impl IndexDocument {
    pub fn new(
        chunker: Arc<dyn Chunker>,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            chunker,
            embedder,
            vector_store,
        }
    }

    #[instrument(skip(self, document), fields(document_id = %document.id(), document_name = %document.name()))]
    pub async fn execute(&self, document: Document) -> Result<IndexReport, PipelineError> {
        let document_id = document.id();
        let document_name = document.name().to_string();
        let document_type = document.document_type();
        let chunked = self.chunker.chunk(document).during(Capability::Chunker)?;

        let changed = if chunked.id() != document_id {
            Some(format!("id {} to {}", document_id, chunked.id()))
        } else if chunked.name() != document_name {
            Some(format!("name '{}' to '{}'", document_name, chunked.name()))
        } else if chunked.document_type() != document_type {
            Some(format!("type {} to {}", document_type, chunked.document_type()))
        } else {
            None
        };

        if let Some(change) = changed {
            return Err(PipelineError::invalid_input(format!(
                "Chunker {} changed document {}",
                self.chunker.name(),
                change
            )));
        }

        debug!(chunks = chunked.chunk_count(), "Document chunked");

        let mut vectors = Vec::with_capacity(chunked.chunk_count());
        for chunk in chunked.chunks() {
            let text = chunk
                .content_text()
                .map_err(|e| PipelineError::invalid_input(e.to_string()))?;

            let embedding = self.embedder.embed(text).await.during(Capability::Embedder)?;

            vectors.push(
                Vector::new(chunk.id(), embedding, chunk.content().to_vec(), Utc::now())
                    .with_metadata(vector_metadata(&chunked, chunk)),
            );
        }

        let vector_count = vectors.len();
        self.vector_store
            .index_vectors(vectors, COLLECTION_NAME)
            .await
            .during(Capability::VectorStore)?;

        info!(vectors = vector_count, collection = COLLECTION_NAME, "Document indexed");

        Ok(IndexReport {
            document_id,
            document_name,
            vector_count,
        })
    }
}

/// Chunk metadata overlaid with the source document's id and name
fn vector_metadata(document: &Document, chunk: &DocumentChunk) -> HashMap<String, String> {
    let mut metadata = chunk.metadata().cloned().unwrap_or_default();

    for (key, value) in [
        (DOCUMENT_ID_KEY, document.id().to_string()),
        (DOCUMENT_NAME_KEY, document.name().to_string()),
    ] {
        if let Some(previous) = metadata.insert(key.to_string(), value) {
            if previous != metadata[key] {
                warn!(
                    chunk_id = %chunk.id(),
                    key = key,
                    overwritten = %previous,
                    "Chunk metadata key replaced by document field"
                );
            }
        }
    }

    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::MockChunker;
    use crate::domain::embedding::MockEmbedder;
    use crate::domain::vector_store::MockVectorStore;
    use crate::domain::{DocumentType, DomainError};
    use std::sync::Mutex;

    fn chunker_with(chunks: fn(&Document) -> Vec<DocumentChunk>) -> MockChunker {
        let mut chunker = MockChunker::new();
        chunker
            .expect_chunk()
            .times(1)
            .returning(move |doc| {
                let chunks = chunks(&doc);
                Ok(doc.with_chunks(chunks))
            });
        chunker.expect_name().return_const("mock");
        chunker
    }

    fn capturing_store(captured: Arc<Mutex<Vec<Vec<Vector>>>>) -> MockVectorStore {
        let mut store = MockVectorStore::new();
        store
            .expect_index_vectors()
            .times(1)
            .returning(move |vectors, collection| {
                assert_eq!(collection, COLLECTION_NAME);
                captured.lock().unwrap().push(vectors);
                Ok(())
            });
        store.expect_store_type().return_const("mock");
        store
    }

    fn document() -> Document {
        Document::new(Uuid::new_v4(), "doc", b"chunk1".to_vec(), DocumentType::Text)
    }

    #[tokio::test]
    async fn test_single_chunk_document() {
        let mut embedder = MockEmbedder::new();
        embedder
            .expect_embed()
            .withf(|text: &str| text == "chunk1")
            .times(1)
            .returning(|_| Ok(vec![0.1, 0.2, 0.3]));

        let captured = Arc::new(Mutex::new(Vec::new()));
        let pipeline = IndexDocument::new(
            Arc::new(chunker_with(|doc| {
                vec![DocumentChunk::new(doc.id(), doc.content().to_vec())]
            })),
            Arc::new(embedder),
            Arc::new(capturing_store(captured.clone())),
        );

        let doc = document();
        let doc_id = doc.id();
        let report = pipeline.execute(doc).await.unwrap();

        assert_eq!(report.document_id, doc_id);
        assert_eq!(report.document_name, "doc");
        assert_eq!(report.vector_count, 1);

        let batches = captured.lock().unwrap();
        assert_eq!(batches.len(), 1);

        let vector = &batches[0][0];
        assert_eq!(vector.id(), doc_id);
        assert_eq!(vector.vector(), &[0.1, 0.2, 0.3]);
        assert_eq!(vector.content(), b"chunk1");
        assert_eq!(vector.metadata()[DOCUMENT_ID_KEY], doc_id.to_string());
        assert_eq!(vector.metadata()[DOCUMENT_NAME_KEY], "doc");
    }

    #[tokio::test]
    async fn test_multi_chunk_document_batches_in_order() {
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let chunk_ids = ids.clone();

        let mut chunker = MockChunker::new();
        chunker.expect_chunk().times(1).returning(move |doc| {
            let chunks = chunk_ids
                .iter()
                .enumerate()
                .map(|(i, id)| DocumentChunk::new(*id, format!("part{}", i).into_bytes()))
                .collect();
            Ok(doc.with_chunks(chunks))
        });
        chunker.expect_name().return_const("mock");

        let mut embedder = MockEmbedder::new();
        embedder
            .expect_embed()
            .times(3)
            .returning(|text| Ok(vec![text.len() as f32]));

        let captured = Arc::new(Mutex::new(Vec::new()));
        let pipeline = IndexDocument::new(
            Arc::new(chunker),
            Arc::new(embedder),
            Arc::new(capturing_store(captured.clone())),
        );

        let report = pipeline.execute(document()).await.unwrap();
        assert_eq!(report.vector_count, 3);

        let batches = captured.lock().unwrap();
        let stored_ids: Vec<Uuid> = batches[0].iter().map(|v| v.id()).collect();
        assert_eq!(stored_ids, ids);
    }

    #[tokio::test]
    async fn test_empty_chunks_store_empty_batch() {
        let mut embedder = MockEmbedder::new();
        embedder.expect_embed().never();

        let captured = Arc::new(Mutex::new(Vec::new()));
        let pipeline = IndexDocument::new(
            Arc::new(chunker_with(|_| Vec::new())),
            Arc::new(embedder),
            Arc::new(capturing_store(captured.clone())),
        );

        let report = pipeline.execute(document()).await.unwrap();

        assert_eq!(report.vector_count, 0);
        let batches = captured.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert!(batches[0].is_empty());
    }

    #[tokio::test]
    async fn test_metadata_merge_injected_keys_win() {
        let mut embedder = MockEmbedder::new();
        embedder.expect_embed().returning(|_| Ok(vec![1.0]));

        let captured = Arc::new(Mutex::new(Vec::new()));
        let pipeline = IndexDocument::new(
            Arc::new(chunker_with(|doc| {
                let mut metadata = HashMap::new();
                metadata.insert("page".to_string(), "3".to_string());
                metadata.insert(DOCUMENT_NAME_KEY.to_string(), "chunk-level".to_string());
                vec![DocumentChunk::new(Uuid::new_v4(), b"text".to_vec()).with_metadata(metadata)]
            })),
            Arc::new(embedder),
            Arc::new(capturing_store(captured.clone())),
        );

        pipeline.execute(document()).await.unwrap();

        let batches = captured.lock().unwrap();
        let metadata = batches[0][0].metadata();
        assert_eq!(metadata["page"], "3");
        assert_eq!(metadata[DOCUMENT_NAME_KEY], "doc");
        assert!(metadata.contains_key(DOCUMENT_ID_KEY));
    }

    #[tokio::test]
    async fn test_embedder_failure_stores_nothing() {
        let mut embedder = MockEmbedder::new();
        embedder
            .expect_embed()
            .returning(|_| Err(DomainError::provider("embedding", "model unavailable")));

        let mut store = MockVectorStore::new();
        store.expect_index_vectors().never();
        store.expect_store_type().return_const("mock");

        let pipeline = IndexDocument::new(
            Arc::new(chunker_with(|doc| {
                vec![DocumentChunk::new(doc.id(), doc.content().to_vec())]
            })),
            Arc::new(embedder),
            Arc::new(store),
        );

        let error = pipeline.execute(document()).await.unwrap_err();

        assert_eq!(error.failed_capability(), Some(Capability::Embedder));
    }

    #[tokio::test]
    async fn test_store_failure_is_tagged() {
        let mut embedder = MockEmbedder::new();
        embedder.expect_embed().returning(|_| Ok(vec![1.0]));

        let mut store = MockVectorStore::new();
        store
            .expect_index_vectors()
            .returning(|_, _| Err(DomainError::storage("qdrant unreachable")));
        store.expect_store_type().return_const("mock");

        let pipeline = IndexDocument::new(
            Arc::new(chunker_with(|doc| {
                vec![DocumentChunk::new(doc.id(), doc.content().to_vec())]
            })),
            Arc::new(embedder),
            Arc::new(store),
        );

        let error = pipeline.execute(document()).await.unwrap_err();

        assert_eq!(error.failed_capability(), Some(Capability::VectorStore));
    }

    #[tokio::test]
    async fn test_chunker_changing_identity_is_rejected() {
        let mut chunker = MockChunker::new();
        chunker.expect_chunk().returning(|doc| {
            Ok(Document::new(Uuid::new_v4(), doc.name(), doc.content().to_vec(), doc.document_type()))
        });
        chunker.expect_name().return_const("mock");

        let mut embedder = MockEmbedder::new();
        embedder.expect_embed().never();
        let mut store = MockVectorStore::new();
        store.expect_index_vectors().never();

        let pipeline = IndexDocument::new(Arc::new(chunker), Arc::new(embedder), Arc::new(store));

        let error = pipeline.execute(document()).await.unwrap_err();

        assert!(matches!(error, PipelineError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_chunker_renaming_document_is_rejected() {
        let mut chunker = MockChunker::new();
        chunker.expect_chunk().returning(|doc| {
            Ok(Document::new(doc.id(), "renamed.txt", doc.content().to_vec(), doc.document_type()))
        });
        chunker.expect_name().return_const("mock");

        let mut embedder = MockEmbedder::new();
        embedder.expect_embed().never();
        let mut store = MockVectorStore::new();
        store.expect_index_vectors().never();

        let pipeline = IndexDocument::new(Arc::new(chunker), Arc::new(embedder), Arc::new(store));

        let error = pipeline.execute(document()).await.unwrap_err();

        assert!(matches!(error, PipelineError::InvalidInput(_)));
        assert!(error.to_string().contains("renamed.txt"));
    }

    #[tokio::test]
    async fn test_chunker_retyping_document_is_rejected() {
        let mut chunker = MockChunker::new();
        chunker.expect_chunk().returning(|doc| {
            Ok(Document::new(doc.id(), doc.name(), doc.content().to_vec(), DocumentType::Pdf))
        });
        chunker.expect_name().return_const("mock");

        let mut embedder = MockEmbedder::new();
        embedder.expect_embed().never();
        let mut store = MockVectorStore::new();
        store.expect_index_vectors().never();

        let pipeline = IndexDocument::new(Arc::new(chunker), Arc::new(embedder), Arc::new(store));

        let error = pipeline.execute(document()).await.unwrap_err();

        assert!(matches!(error, PipelineError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_invalid_utf8_chunk_is_rejected() {
        let mut embedder = MockEmbedder::new();
        embedder.expect_embed().never();
        let mut store = MockVectorStore::new();
        store.expect_index_vectors().never();

        let pipeline = IndexDocument::new(
            Arc::new(chunker_with(|doc| {
                vec![DocumentChunk::new(doc.id(), vec![0xff, 0xfe])]
            })),
            Arc::new(embedder),
            Arc::new(store),
        );

        let error = pipeline.execute(document()).await.unwrap_err();

        assert!(matches!(error, PipelineError::InvalidInput(_)));
    }
}
