//! Vector entity - an embedded chunk as stored in a vector store

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Metadata key holding the stringified id of the source document
pub const DOCUMENT_ID_KEY: &str = "document_id";
/// Metadata key holding the name of the source document
pub const DOCUMENT_NAME_KEY: &str = "document_name";

/// An embedding together with the content it was computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    id: Uuid,
    vector: Vec<f32>,
    inserted_at: DateTime<Utc>,
    content: Vec<u8>,
    metadata: HashMap<String, String>,
}

impl Vector {
    pub fn new(
        id: Uuid,
        vector: Vec<f32>,
        content: impl Into<Vec<u8>>,
        inserted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            vector,
            inserted_at,
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn inserted_at(&self) -> DateTime<Utc> {
        self.inserted_at
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Content decoded as UTF-8
    pub fn content_text(&self) -> Result<&str, DomainError> {
        std::str::from_utf8(&self.content).map_err(|e| {
            DomainError::validation(format!("Vector {} content is not valid UTF-8: {}", self.id, e))
        })
    }

    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    pub fn document_name(&self) -> &str {
        self.metadata
            .get(DOCUMENT_NAME_KEY)
            .map(String::as_str)
            .unwrap_or("unknown")
    }

    pub fn document_id(&self) -> &str {
        self.metadata
            .get(DOCUMENT_ID_KEY)
            .map(String::as_str)
            .unwrap_or("unknown id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_accessors() {
        let mut metadata = HashMap::new();
        metadata.insert(DOCUMENT_ID_KEY.to_string(), "abc".to_string());
        metadata.insert(DOCUMENT_NAME_KEY.to_string(), "doc".to_string());

        let vector = Vector::new(Uuid::new_v4(), vec![0.1, 0.2], b"text".to_vec(), Utc::now())
            .with_metadata(metadata);

        assert_eq!(vector.document_id(), "abc");
        assert_eq!(vector.document_name(), "doc");
        assert_eq!(vector.vector(), &[0.1, 0.2]);
        assert_eq!(vector.content_text().unwrap(), "text");
    }

    #[test]
    fn test_document_accessors_fallback() {
        let vector = Vector::new(Uuid::new_v4(), vec![1.0], b"text".to_vec(), Utc::now());

        assert_eq!(vector.document_id(), "unknown id");
        assert_eq!(vector.document_name(), "unknown");
    }
}
