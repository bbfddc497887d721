//! Retrieval pipeline: embed, search, rerank and answer

use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::COLLECTION_NAME;
use crate::domain::pipeline::CapabilityResultExt;
use crate::domain::{
    Capability, Embedder, Generator, PipelineError, Reranker, SearchResponse, Vector, VectorStore,
};

const CONTEXT_SEPARATOR: &str = "\n\n";

/// Answers a query from the indexed collection
pub struct SearchDocuments {
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
    reranker: Arc<dyn Reranker>,
    generator: Arc<dyn Generator>,
}

impl std::fmt::Debug for SearchDocuments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchDocuments")
            .field("embedder", &self.embedder.embedder_name())
            .field("vector_store", &self.vector_store.store_type())
            .field("reranker", &self.reranker.reranker_name())
            .field("generator", &self.generator.generator_name())
            .finish()
    }
}

impl SearchDocuments {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
        reranker: Arc<dyn Reranker>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            embedder,
            vector_store,
            reranker,
            generator,
        }
    }

    /// Run the query; in raw mode the answer is the joined source content
    ///
    /// The generated answer is returned as an unconsumed stream.
    #[instrument(skip(self, query), fields(top_k = top_k, raw = raw))]
    pub async fn execute(
        &self,
        query: &str,
        top_k: usize,
        raw: bool,
    ) -> Result<SearchResponse, PipelineError> {
        if top_k == 0 {
            return Err(PipelineError::invalid_input("top_k must be at least 1"));
        }

        let embedding = self.embedder.embed(query).await.during(Capability::Embedder)?;

        let candidates = self
            .vector_store
            .search_similar(&embedding, top_k, COLLECTION_NAME)
            .await
            .during(Capability::VectorStore)?;

        debug!(candidates = candidates.len(), "Retrieved candidates");

        let sources = self
            .reranker
            .rerank(query, candidates)
            .await
            .during(Capability::Reranker)?;

        let context = join_contents(&sources)?;

        info!(sources = sources.len(), "Search completed");

        if raw {
            return Ok(SearchResponse::from_text(context, sources));
        }

        let answer = self
            .generator
            .generate(&context, query)
            .await
            .during(Capability::Generator)?;

        Ok(SearchResponse::new(answer, sources))
    }
}

fn join_contents(vectors: &[Vector]) -> Result<String, PipelineError> {
    let contents = vectors
        .iter()
        .map(|v| v.content_text())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| PipelineError::invalid_input(e.to_string()))?;

    Ok(contents.join(CONTEXT_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbedder;
    use crate::domain::generator::MockGenerator;
    use crate::domain::rerank::MockReranker;
    use crate::domain::vector_store::MockVectorStore;
    use crate::domain::{AnswerStream, DomainError};
    use chrono::Utc;
    use futures::{stream, StreamExt};
    use std::sync::Mutex;
    use uuid::Uuid;

    fn vector(content: &str) -> Vector {
        Vector::new(Uuid::new_v4(), vec![0.1, 0.2, 0.3], content.as_bytes().to_vec(), Utc::now())
    }

    fn embedder() -> MockEmbedder {
        let mut embedder = MockEmbedder::new();
        embedder
            .expect_embed()
            .times(1)
            .returning(|_| Ok(vec![0.1, 0.2, 0.3]));
        embedder
    }

    fn store_returning(vectors: Vec<Vector>) -> MockVectorStore {
        let mut store = MockVectorStore::new();
        store
            .expect_search_similar()
            .times(1)
            .returning(move |_, _, collection| {
                assert_eq!(collection, COLLECTION_NAME);
                Ok(vectors.clone())
            });
        store
    }

    /// Reranker keeping only candidates whose content is in `keep`, in that order
    fn reranker_keeping(keep: &'static [&'static str]) -> MockReranker {
        let mut reranker = MockReranker::new();
        reranker.expect_rerank().times(1).returning(move |_, vectors| {
            Ok(keep
                .iter()
                .filter_map(|k| {
                    vectors
                        .iter()
                        .find(|v| v.content_text().ok() == Some(*k))
                        .cloned()
                })
                .collect())
        });
        reranker
    }

    #[tokio::test]
    async fn test_raw_search_skips_generator() {
        let doc1 = vector("doc1");
        let doc2 = vector("doc2");

        let mut generator = MockGenerator::new();
        generator.expect_generate().never();

        let pipeline = SearchDocuments::new(
            Arc::new(embedder()),
            Arc::new(store_returning(vec![doc1, doc2.clone()])),
            Arc::new(reranker_keeping(&["doc2"])),
            Arc::new(generator),
        );

        let response = pipeline.execute("query", 10, true).await.unwrap();
        let (answer, sources) = response.into_parts();
        let fragments: Vec<String> = answer.map(|f| f.unwrap()).collect().await;

        assert_eq!(fragments, vec!["doc2"]);
        assert_eq!(sources, vec![doc2]);
    }

    #[tokio::test]
    async fn test_raw_answer_joins_with_blank_line() {
        let mut generator = MockGenerator::new();
        generator.expect_generate().never();

        let pipeline = SearchDocuments::new(
            Arc::new(embedder()),
            Arc::new(store_returning(vec![vector("a"), vector("b"), vector("c")])),
            Arc::new(reranker_keeping(&["c", "a", "b"])),
            Arc::new(generator),
        );

        let (answer, _) = pipeline
            .execute("query", 3, true)
            .await
            .unwrap()
            .collect_answer()
            .await
            .unwrap();

        assert_eq!(answer, "c\n\na\n\nb");
    }

    #[tokio::test]
    async fn test_generated_search_streams_generator_output() {
        let doc2 = vector("doc2");
        let seen_context = Arc::new(Mutex::new(None));
        let captured = seen_context.clone();

        let mut generator = MockGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(move |context, query| {
                assert_eq!(query, "query");
                *captured.lock().unwrap() = Some(context.to_string());
                let fragments: Vec<Result<String, DomainError>> =
                    vec![Ok("Generated answer".to_string())];
                let answer: AnswerStream = Box::pin(stream::iter(fragments));
                Ok(answer)
            });

        let pipeline = SearchDocuments::new(
            Arc::new(embedder()),
            Arc::new(store_returning(vec![vector("doc1"), doc2.clone()])),
            Arc::new(reranker_keeping(&["doc2"])),
            Arc::new(generator),
        );

        let response = pipeline.execute("query", 10, false).await.unwrap();
        let (answer, sources) = response.collect_answer().await.unwrap();

        assert_eq!(answer, "Generated answer");
        assert_eq!(sources, vec![doc2]);
        assert_eq!(seen_context.lock().unwrap().as_deref(), Some("doc2"));
    }

    #[tokio::test]
    async fn test_generated_fragments_preserved_in_order() {
        let mut generator = MockGenerator::new();
        generator.expect_generate().returning(|_, _| {
            let fragments: Vec<Result<String, DomainError>> = ["The", " answer", " is", " 42"]
                .iter()
                .map(|f| Ok(f.to_string()))
                .collect();
            let answer: AnswerStream = Box::pin(stream::iter(fragments));
            Ok(answer)
        });

        let pipeline = SearchDocuments::new(
            Arc::new(embedder()),
            Arc::new(store_returning(vec![vector("doc")])),
            Arc::new(reranker_keeping(&["doc"])),
            Arc::new(generator),
        );

        let (answer, _) = pipeline.execute("q", 1, false).await.unwrap().into_parts();
        let fragments: Vec<String> = answer.map(|f| f.unwrap()).collect().await;

        assert_eq!(fragments, vec!["The", " answer", " is", " 42"]);
    }

    #[tokio::test]
    async fn test_empty_collection_is_not_an_error() {
        let mut generator = MockGenerator::new();
        generator.expect_generate().never();

        let pipeline = SearchDocuments::new(
            Arc::new(embedder()),
            Arc::new(store_returning(Vec::new())),
            Arc::new(reranker_keeping(&[])),
            Arc::new(generator),
        );

        let (answer, sources) = pipeline
            .execute("query", 5, true)
            .await
            .unwrap()
            .collect_answer()
            .await
            .unwrap();

        assert_eq!(answer, "");
        assert!(sources.is_empty());
    }

    #[tokio::test]
    async fn test_top_k_forwarded_to_store() {
        let mut store = MockVectorStore::new();
        store
            .expect_search_similar()
            .withf(|query: &[f32], top_k: &usize, _: &str| {
                query == [0.1f32, 0.2, 0.3].as_slice() && *top_k == 7
            })
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));

        let mut generator = MockGenerator::new();
        generator.expect_generate().never();

        let pipeline = SearchDocuments::new(
            Arc::new(embedder()),
            Arc::new(store),
            Arc::new(reranker_keeping(&[])),
            Arc::new(generator),
        );

        pipeline.execute("query", 7, true).await.unwrap();
    }

    #[tokio::test]
    async fn test_zero_top_k_is_rejected() {
        let mut embedder = MockEmbedder::new();
        embedder.expect_embed().never();

        let pipeline = SearchDocuments::new(
            Arc::new(embedder),
            Arc::new(MockVectorStore::new()),
            Arc::new(MockReranker::new()),
            Arc::new(MockGenerator::new()),
        );

        let error = pipeline.execute("query", 0, true).await.unwrap_err();

        assert!(matches!(error, PipelineError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_generator_authentication_failure() {
        let mut generator = MockGenerator::new();
        generator.expect_generate().returning(|_, _| {
            Err(DomainError::authentication(
                "llm",
                "LLM authentication failed. Please check your API key.",
            ))
        });

        let pipeline = SearchDocuments::new(
            Arc::new(embedder()),
            Arc::new(store_returning(vec![vector("doc")])),
            Arc::new(reranker_keeping(&["doc"])),
            Arc::new(generator),
        );

        let error = pipeline.execute("query", 3, false).await.unwrap_err();

        assert!(error.is_authentication());
        assert_eq!(error.failed_capability(), Some(Capability::Generator));
    }

    #[tokio::test]
    async fn test_reranker_failure_is_tagged() {
        let mut reranker = MockReranker::new();
        reranker
            .expect_rerank()
            .returning(|_, _| Err(DomainError::provider("rerank", "timeout")));

        let mut generator = MockGenerator::new();
        generator.expect_generate().never();

        let pipeline = SearchDocuments::new(
            Arc::new(embedder()),
            Arc::new(store_returning(vec![vector("doc")])),
            Arc::new(reranker),
            Arc::new(generator),
        );

        let error = pipeline.execute("query", 3, false).await.unwrap_err();

        assert_eq!(error.failed_capability(), Some(Capability::Reranker));
    }
}
