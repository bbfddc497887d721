//! Document entity

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DocumentChunk;
use crate::domain::DomainError;

/// Kind of source document, used to pick a chunking approach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Text,
    Markdown,
    Word,
    Other,
}

impl DocumentType {
    pub const ALL: [DocumentType; 5] = [
        DocumentType::Pdf,
        DocumentType::Text,
        DocumentType::Markdown,
        DocumentType::Word,
        DocumentType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Pdf => "pdf",
            DocumentType::Text => "text",
            DocumentType::Markdown => "markdown",
            DocumentType::Word => "word",
            DocumentType::Other => "other",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();

        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| {
                let choices = Self::ALL
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                DomainError::validation(format!(
                    "Invalid filetype '{}'. Choose one of: {}",
                    s, choices
                ))
            })
    }
}

/// A source document and, once chunked, its ordered chunks
///
/// Identity (id, name, type) and content are fixed at construction. The chunk
/// sequence is the only part a chunker may change, and it does so by consuming
/// the document through [`Document::with_chunks`].
#[derive(Debug, Clone)]
pub struct Document {
    id: Uuid,
    name: String,
    content: Vec<u8>,
    metadata: Option<HashMap<String, String>>,
    document_type: DocumentType,
    chunks: Vec<DocumentChunk>,
}

impl Document {
    pub fn new(
        id: Uuid,
        name: impl Into<String>,
        content: impl Into<Vec<u8>>,
        document_type: DocumentType,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            content: content.into(),
            metadata: None,
            document_type,
            chunks: Vec::new(),
        }
    }

    /// Create a text document from raw text
    pub fn from_text(text: impl Into<String>) -> Self {
        let text: String = text.into();
        Self::new(
            Uuid::new_v4(),
            "text_document",
            text.into_bytes(),
            DocumentType::Text,
        )
    }

    /// Create a document from a file, named after its final path component
    pub fn from_path(path: impl AsRef<Path>, document_type: DocumentType) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let content = std::fs::read(path).map_err(|e| {
            DomainError::validation(format!("Cannot read file '{}': {}", path.display(), e))
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::new(Uuid::new_v4(), name, content, document_type))
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Attach a chunk sequence, replacing any previous one
    pub fn with_chunks(mut self, chunks: Vec<DocumentChunk>) -> Self {
        self.chunks = chunks;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn metadata(&self) -> Option<&HashMap<String, String>> {
        self.metadata.as_ref()
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    /// Chunks in order from head to tail; empty until a chunker attaches them
    pub fn chunks(&self) -> impl Iterator<Item = &DocumentChunk> {
        self.chunks.iter()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_chunked(&self) -> bool {
        !self.chunks.is_empty()
    }
}
