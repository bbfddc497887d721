//! Persisted form of a vector: id, dense embedding and payload

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DomainError, Vector};

/// Payload stored next to each embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointPayload {
    pub content: String,
    pub inserted_at: String,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
}

impl PointPayload {
    pub fn encode(vector: &Vector) -> Result<Self, DomainError> {
        let content = vector.content_text()?.to_string();

        Ok(Self {
            content,
            inserted_at: vector
                .inserted_at()
                .to_rfc3339_opts(SecondsFormat::Nanos, true),
            metadata: Some(vector.metadata().clone()),
        })
    }

    /// Rebuild the domain vector; a point without an embedding is rejected
    pub fn decode(self, id: Uuid, embedding: Option<Vec<f32>>) -> Result<Vector, DomainError> {
        let embedding = embedding.ok_or_else(|| {
            DomainError::store_invariant(format!("Vector data missing for point {}", id))
        })?;

        let inserted_at = DateTime::parse_from_rfc3339(&self.inserted_at)
            .map_err(|e| {
                DomainError::store_invariant(format!(
                    "Point {} has an unparseable inserted_at '{}': {}",
                    id, self.inserted_at, e
                ))
            })?
            .with_timezone(&Utc);

        Ok(
            Vector::new(id, embedding, self.content.into_bytes(), inserted_at)
                .with_metadata(self.metadata.unwrap_or_default()),
        )
    }
}

/// Reject vectors whose length differs from the collection dimension or that
/// carry NaN or infinite components
pub fn check_dimension(vector: &[f32], dimension: usize) -> Result<(), DomainError> {
    if vector.len() != dimension {
        return Err(DomainError::validation(format!(
            "Vector has {} dimensions, collection expects {}",
            vector.len(),
            dimension
        )));
    }

    if let Some(position) = vector.iter().position(|c| !c.is_finite()) {
        return Err(DomainError::validation(format!(
            "Vector component {} is {}, expected a finite number",
            position, vector[position]
        )));
    }

    Ok(())
}
