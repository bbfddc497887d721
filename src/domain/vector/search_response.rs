//! Search response returned by the retrieval pipeline

use futures::{stream, StreamExt};

use super::Vector;
use crate::domain::generator::AnswerStream;
use crate::domain::DomainError;

/// Answer fragments plus the vectors used as sources, in reranked order
pub struct SearchResponse {
    pub answer: AnswerStream,
    pub sources: Vec<Vector>,
}

impl SearchResponse {
    pub fn new(answer: AnswerStream, sources: Vec<Vector>) -> Self {
        Self { answer, sources }
    }

    /// Response whose answer is a single, already known fragment
    pub fn from_text(answer: impl Into<String>, sources: Vec<Vector>) -> Self {
        let fragment: Result<String, DomainError> = Ok(answer.into());
        Self::new(Box::pin(stream::iter(vec![fragment])), sources)
    }

    pub fn into_parts(self) -> (AnswerStream, Vec<Vector>) {
        (self.answer, self.sources)
    }

    /// Drain the answer stream into a single string
    pub async fn collect_answer(self) -> Result<(String, Vec<Vector>), DomainError> {
        let (mut answer, sources) = self.into_parts();
        let mut text = String::new();

        while let Some(fragment) = answer.next().await {
            text.push_str(&fragment?);
        }

        Ok((text, sources))
    }
}

impl std::fmt::Debug for SearchResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchResponse")
            .field("answer", &"<stream>")
            .field("sources", &self.sources)
            .finish()
    }
}
