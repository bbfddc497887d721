//! Chunker port

#[cfg(test)]
use mockall::automock;

use super::Document;
use crate::domain::DomainError;

/// Splits a document into an ordered chunk sequence
///
/// Implementations receive an unchunked document and return it with chunks
/// attached. They must leave the id, name, type and content untouched.
#[cfg_attr(test, automock)]
pub trait Chunker: Send + Sync {
    fn chunk(&self, document: Document) -> Result<Document, DomainError>;

    /// Get the chunker name
    fn name(&self) -> &'static str;
}
