//! Generator trait definition

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Forward-only stream of answer fragments
///
/// Fragments are produced on demand; dropping the stream early is allowed.
pub type AnswerStream = Pin<Box<dyn Stream<Item = Result<String, DomainError>> + Send>>;

/// Produces a natural language answer from retrieved context
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Generator: Send + Sync {
    /// Start generating an answer for `query` grounded on `context`
    ///
    /// An error returned here happened before any fragment was produced.
    /// Failures after streaming started arrive as `Err` items.
    async fn generate(&self, context: &str, query: &str) -> Result<AnswerStream, DomainError>;

    /// Get the generator name
    fn generator_name(&self) -> &'static str;
}
