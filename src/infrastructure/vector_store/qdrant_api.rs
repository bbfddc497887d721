//! Narrow view of the Qdrant client used by the vector store

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance as QdrantDistance, GetPointsBuilder, PointId, PointStruct,
    Query, QueryPointsBuilder, RetrievedPoint, ScoredPoint, UpsertPointsBuilder,
    VectorParamsBuilder,
};
use qdrant_client::{Qdrant, QdrantError};
use uuid::Uuid;

use crate::domain::{Distance, DomainError};

/// Collection and point operations the store needs from Qdrant
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QdrantApi: Send + Sync {
    async fn collection_exists(&self, collection_name: &str) -> Result<bool, DomainError>;

    /// Create a collection; an existing collection is reported as a conflict
    async fn create_collection(
        &self,
        collection_name: &str,
        dimension: u64,
        distance: Distance,
    ) -> Result<(), DomainError>;

    async fn upsert_points(
        &self,
        collection_name: &str,
        points: Vec<PointStruct>,
    ) -> Result<(), DomainError>;

    /// Nearest points to `query`, with vectors and payloads
    async fn query(
        &self,
        collection_name: &str,
        query: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<ScoredPoint>, DomainError>;

    async fn get_points(
        &self,
        collection_name: &str,
        ids: Vec<Uuid>,
    ) -> Result<Vec<RetrievedPoint>, DomainError>;
}

/// [`QdrantApi`] over the gRPC client
pub struct QdrantClient {
    client: Qdrant,
}

impl QdrantClient {
    pub fn new(url: &str, api_key: Option<String>) -> Result<Self, DomainError> {
        let client = Qdrant::from_url(url)
            .api_key(api_key)
            .build()
            .map_err(|e| DomainError::configuration(format!("Invalid Qdrant client: {}", e)))?;

        Ok(Self { client })
    }
}

impl std::fmt::Debug for QdrantClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantClient").finish_non_exhaustive()
    }
}

fn map_err(e: QdrantError) -> DomainError {
    DomainError::provider("qdrant", e.to_string())
}

fn qdrant_distance(distance: Distance) -> QdrantDistance {
    match distance {
        Distance::Cosine => QdrantDistance::Cosine,
        Distance::Dot => QdrantDistance::Dot,
        Distance::Euclid => QdrantDistance::Euclid,
    }
}

#[async_trait]
impl QdrantApi for QdrantClient {
    async fn collection_exists(&self, collection_name: &str) -> Result<bool, DomainError> {
        self.client
            .collection_exists(collection_name)
            .await
            .map_err(map_err)
    }

    async fn create_collection(
        &self,
        collection_name: &str,
        dimension: u64,
        distance: Distance,
    ) -> Result<(), DomainError> {
        self.client
            .create_collection(
                CreateCollectionBuilder::new(collection_name)
                    .vectors_config(VectorParamsBuilder::new(dimension, qdrant_distance(distance))),
            )
            .await
            .map_err(|e| {
                let message = e.to_string();
                if message.contains("already exists") {
                    DomainError::conflict(message)
                } else {
                    map_err(e)
                }
            })?;

        Ok(())
    }

    async fn upsert_points(
        &self,
        collection_name: &str,
        points: Vec<PointStruct>,
    ) -> Result<(), DomainError> {
        self.client
            .upsert_points(UpsertPointsBuilder::new(collection_name, points).wait(true))
            .await
            .map_err(map_err)?;

        Ok(())
    }

    async fn query(
        &self,
        collection_name: &str,
        query: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<ScoredPoint>, DomainError> {
        let response = self
            .client
            .query(
                QueryPointsBuilder::new(collection_name)
                    .query(Query::new_nearest(query))
                    .limit(limit)
                    .with_vectors(true)
                    .with_payload(true),
            )
            .await
            .map_err(map_err)?;

        Ok(response.result)
    }

    async fn get_points(
        &self,
        collection_name: &str,
        ids: Vec<Uuid>,
    ) -> Result<Vec<RetrievedPoint>, DomainError> {
        let ids: Vec<PointId> = ids.iter().map(|id| id.to_string().into()).collect();

        let response = self
            .client
            .get_points(
                GetPointsBuilder::new(collection_name, ids)
                    .with_vectors(true)
                    .with_payload(true),
            )
            .await
            .map_err(map_err)?;

        Ok(response.result)
    }
}
