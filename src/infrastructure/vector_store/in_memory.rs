//! In-memory vector store for development and testing

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::point::{check_dimension, PointPayload};
use crate::domain::{Distance, DomainError, Vector, VectorStore};

#[derive(Debug, Clone)]
struct StoredPoint {
    id: Uuid,
    vector: Vec<f32>,
    payload: PointPayload,
}

impl StoredPoint {
    fn decode(&self) -> Result<Vector, DomainError> {
        self.payload
            .clone()
            .decode(self.id, Some(self.vector.clone()))
    }
}

/// Process-local vector store keeping points in insertion order per collection
#[derive(Debug)]
pub struct InMemoryVectorStore {
    distance: Distance,
    dimension: usize,
    collections: Arc<RwLock<HashMap<String, Vec<StoredPoint>>>>,
}

impl InMemoryVectorStore {
    pub fn new(dimension: usize) -> Self {
        Self::with_distance(dimension, Distance::default())
    }

    pub fn with_distance(dimension: usize, distance: Distance) -> Self {
        Self {
            distance,
            dimension,
            collections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn collection_exists(&self, collection_name: &str) -> bool {
        self.collections.read().await.contains_key(collection_name)
    }

    pub async fn collection_count(&self) -> usize {
        self.collections.read().await.len()
    }

    pub async fn point_count(&self, collection_name: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection_name)
            .map_or(0, Vec::len)
    }

    async fn ensure_collection(&self, collection_name: &str) {
        if self.collection_exists(collection_name).await {
            return;
        }

        let mut collections = self.collections.write().await;
        if !collections.contains_key(collection_name) {
            debug!(collection = %collection_name, dimension = self.dimension, "Creating collection");
            collections.insert(collection_name.to_string(), Vec::new());
        }
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn index_vectors(
        &self,
        vectors: Vec<Vector>,
        collection_name: &str,
    ) -> Result<(), DomainError> {
        let points = vectors
            .iter()
            .map(|v| {
                check_dimension(v.vector(), self.dimension)?;
                Ok(StoredPoint {
                    id: v.id(),
                    vector: v.vector().to_vec(),
                    payload: PointPayload::encode(v)?,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        let mut collections = self.collections.write().await;
        let stored = collections.entry(collection_name.to_string()).or_default();

        for point in points {
            match stored.iter_mut().find(|p| p.id == point.id) {
                Some(existing) => *existing = point,
                None => stored.push(point),
            }
        }

        debug!(collection = %collection_name, count = vectors.len(), "Upserted vectors");

        Ok(())
    }

    async fn search_similar(
        &self,
        query_vector: &[f32],
        top_k: usize,
        collection_name: &str,
    ) -> Result<Vec<Vector>, DomainError> {
        check_dimension(query_vector, self.dimension)?;
        self.ensure_collection(collection_name).await;

        let collections = self.collections.read().await;
        let stored = match collections.get(collection_name) {
            Some(stored) => stored,
            None => return Ok(Vec::new()),
        };

        // overflow can still yield NaN (inf - inf); it ranks last
        let mut scored: Vec<(f32, &StoredPoint)> = stored
            .iter()
            .map(|p| {
                let score = self.distance.score(query_vector, &p.vector);
                (if score.is_nan() { f32::NEG_INFINITY } else { score }, p)
            })
            .collect();

        // stable sort: equal scores keep insertion order
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        scored
            .into_iter()
            .take(top_k)
            .map(|(_, p)| p.decode())
            .collect()
    }

    async fn get_vector(
        &self,
        id: Uuid,
        collection_name: &str,
    ) -> Result<Option<Vector>, DomainError> {
        let collections = self.collections.read().await;

        collections
            .get(collection_name)
            .and_then(|stored| stored.iter().find(|p| p.id == id))
            .map(StoredPoint::decode)
            .transpose()
    }

    fn store_type(&self) -> &'static str {
        "memory"
    }
}
