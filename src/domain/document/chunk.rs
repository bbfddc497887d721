//! Document chunk entity

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::DomainError;

/// A contiguous piece of a document, embedded and indexed on its own
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChunk {
    id: Uuid,
    content: Vec<u8>,
    metadata: Option<HashMap<String, String>>,
}

impl DocumentChunk {
    pub fn new(id: Uuid, content: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            content: content.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Content decoded as UTF-8
    pub fn content_text(&self) -> Result<&str, DomainError> {
        std::str::from_utf8(&self.content).map_err(|e| {
            DomainError::validation(format!("Chunk {} is not valid UTF-8: {}", self.id, e))
        })
    }

    pub fn metadata(&self) -> Option<&HashMap<String, String>> {
        self.metadata.as_ref()
    }
}
