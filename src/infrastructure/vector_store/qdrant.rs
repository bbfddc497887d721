//! Qdrant vector store

use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::vectors_output::VectorsOptions;
use qdrant_client::qdrant::{PointId, PointStruct, Value as QdrantValue, VectorsOutput};
use qdrant_client::Payload;
use tracing::{debug, warn};
use uuid::Uuid;

use super::point::{check_dimension, PointPayload};
use super::qdrant_api::QdrantApi;
use crate::domain::{Distance, DomainError, Vector, VectorStore};

pub const DEFAULT_QDRANT_HOST: &str = "localhost";
pub const DEFAULT_QDRANT_PORT: u16 = 6334;

/// Qdrant gRPC endpoint for a host, which may already carry a scheme
pub fn qdrant_url(host: &str, port: u16) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        format!("{}:{}", host, port)
    } else {
        format!("http://{}:{}", host, port)
    }
}

/// Vector store backed by a Qdrant server
///
/// Collections are created lazily on first index or search. Creation tolerates
/// a concurrent creator: a failed create is accepted when the collection
/// exists afterwards.
///
/// Qdrant normalises vectors stored in a `Cosine` collection, so a lookup
/// returns the unit-length embedding rather than the one indexed. Use `Dot`
/// or `Euclid` when stored embeddings must come back unchanged.
#[derive(Debug)]
pub struct QdrantVectorStore<A: QdrantApi> {
    api: A,
    dimension: usize,
    distance: Distance,
}

impl<A: QdrantApi> QdrantVectorStore<A> {
    pub fn new(api: A, dimension: usize) -> Self {
        Self {
            api,
            dimension,
            distance: Distance::default(),
        }
    }

    pub fn with_distance(mut self, distance: Distance) -> Self {
        self.distance = distance;
        self
    }

    async fn ensure_collection(&self, collection_name: &str) -> Result<(), DomainError> {
        if self.api.collection_exists(collection_name).await? {
            return Ok(());
        }

        debug!(
            collection = %collection_name,
            dimension = self.dimension,
            distance = ?self.distance,
            "Creating collection"
        );

        match self
            .api
            .create_collection(collection_name, self.dimension as u64, self.distance)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if e.is_conflict() => {
                warn!(collection = %collection_name, "Collection created concurrently");
                Ok(())
            }
            Err(e) => {
                if self.api.collection_exists(collection_name).await? {
                    warn!(
                        collection = %collection_name,
                        error = %e,
                        "Create failed but collection exists"
                    );
                    Ok(())
                } else {
                    Err(e)
                }
            }
        }
    }
}

fn encode_point(vector: &Vector) -> Result<PointStruct, DomainError> {
    let payload = serde_json::to_value(PointPayload::encode(vector)?).map_err(|e| {
        DomainError::validation(format!("Cannot encode payload of {}: {}", vector.id(), e))
    })?;
    let payload = Payload::try_from(payload).map_err(|e| {
        DomainError::validation(format!("Cannot encode payload of {}: {}", vector.id(), e))
    })?;

    Ok(PointStruct::new(
        vector.id().to_string(),
        vector.vector().to_vec(),
        payload,
    ))
}

fn decode_point(
    id: Option<PointId>,
    vectors: Option<VectorsOutput>,
    payload: HashMap<String, QdrantValue>,
) -> Result<Vector, DomainError> {
    let id = match id.and_then(|id| id.point_id_options) {
        Some(PointIdOptions::Uuid(id)) => Uuid::parse_str(&id).map_err(|e| {
            DomainError::store_invariant(format!("Point id {} is not a UUID: {}", id, e))
        })?,
        Some(PointIdOptions::Num(id)) => {
            return Err(DomainError::store_invariant(format!(
                "Point id {} is not a UUID",
                id
            )));
        }
        None => return Err(DomainError::store_invariant("Point returned without an id")),
    };

    let payload = decode_payload(id, &payload)?;
    payload.decode(id, dense_vector(vectors))
}

#[allow(deprecated)]
fn dense_vector(vectors: Option<VectorsOutput>) -> Option<Vec<f32>> {
    match vectors?.vectors_options? {
        VectorsOptions::Vector(vector) => Some(vector.data).filter(|data| !data.is_empty()),
        VectorsOptions::Vectors(_) => None,
    }
}

fn string_value(value: &QdrantValue) -> Option<&str> {
    match &value.kind {
        Some(Kind::StringValue(s)) => Some(s),
        _ => None,
    }
}

fn decode_payload(
    id: Uuid,
    payload: &HashMap<String, QdrantValue>,
) -> Result<PointPayload, DomainError> {
    let field = |key: &str| {
        payload
            .get(key)
            .and_then(string_value)
            .map(str::to_string)
            .ok_or_else(|| {
                DomainError::store_invariant(format!("Point {} has no string '{}' payload", id, key))
            })
    };

    let metadata = match payload.get("metadata").and_then(|v| v.kind.as_ref()) {
        Some(Kind::StructValue(fields)) => Some(
            fields
                .fields
                .iter()
                .filter_map(|(k, v)| string_value(v).map(|s| (k.clone(), s.to_string())))
                .collect(),
        ),
        _ => None,
    };

    Ok(PointPayload {
        content: field("content")?,
        inserted_at: field("inserted_at")?,
        metadata,
    })
}

#[async_trait]
impl<A: QdrantApi> VectorStore for QdrantVectorStore<A> {
    async fn index_vectors(
        &self,
        vectors: Vec<Vector>,
        collection_name: &str,
    ) -> Result<(), DomainError> {
        let points = vectors
            .iter()
            .map(|v| {
                check_dimension(v.vector(), self.dimension)?;
                encode_point(v)
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        self.ensure_collection(collection_name).await?;

        if points.is_empty() {
            return Ok(());
        }

        let count = points.len();
        self.api.upsert_points(collection_name, points).await?;

        debug!(collection = %collection_name, count, "Upserted points");

        Ok(())
    }

    async fn search_similar(
        &self,
        query_vector: &[f32],
        top_k: usize,
        collection_name: &str,
    ) -> Result<Vec<Vector>, DomainError> {
        check_dimension(query_vector, self.dimension)?;
        self.ensure_collection(collection_name).await?;

        if top_k == 0 {
            return Ok(Vec::new());
        }

        let points = self
            .api
            .query(collection_name, query_vector.to_vec(), top_k as u64)
            .await?;

        debug!(collection = %collection_name, hits = points.len(), "Query completed");

        points
            .into_iter()
            .map(|p| decode_point(p.id, p.vectors, p.payload))
            .collect()
    }

    async fn get_vector(
        &self,
        id: Uuid,
        collection_name: &str,
    ) -> Result<Option<Vector>, DomainError> {
        if !self.api.collection_exists(collection_name).await? {
            return Ok(None);
        }

        self.api
            .get_points(collection_name, vec![id])
            .await?
            .into_iter()
            .next()
            .map(|p| decode_point(p.id, p.vectors, p.payload))
            .transpose()
    }

    fn store_type(&self) -> &'static str {
        "qdrant"
    }
}
