//! Pipeline error types

use std::fmt;

use thiserror::Error;

use crate::domain::DomainError;

/// Capability a pipeline step delegates to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Chunker,
    Embedder,
    VectorStore,
    Reranker,
    Generator,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Chunker => "chunker",
            Capability::Embedder => "embedder",
            Capability::VectorStore => "vector store",
            Capability::Reranker => "reranker",
            Capability::Generator => "generator",
        };
        f.write_str(name)
    }
}

/// Errors that abort an indexing or search invocation
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{capability} failed: {source}")]
    Capability {
        capability: Capability,
        #[source]
        source: DomainError,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PipelineError {
    pub fn capability(capability: Capability, source: DomainError) -> Self {
        Self::Capability { capability, source }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Capability that raised the error, if any
    pub fn failed_capability(&self) -> Option<Capability> {
        match self {
            Self::Capability { capability, .. } => Some(*capability),
            Self::InvalidInput(_) => None,
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Capability { source, .. } if source.is_authentication())
    }
}

/// Attach the failing capability to a domain result
pub(crate) trait CapabilityResultExt<T> {
    fn during(self, capability: Capability) -> Result<T, PipelineError>;
}

impl<T> CapabilityResultExt<T> for Result<T, DomainError> {
    fn during(self, capability: Capability) -> Result<T, PipelineError> {
        self.map_err(|source| PipelineError::capability(capability, source))
    }
}
