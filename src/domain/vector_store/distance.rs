//! Similarity metric of a collection

use serde::{Deserialize, Serialize};

use crate::domain::embedding::{cosine_similarity, dot_product, euclidean_distance};

/// Metric a collection is created with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Distance {
    #[default]
    #[serde(alias = "cosine")]
    Cosine,
    #[serde(alias = "dot")]
    Dot,
    #[serde(alias = "euclid")]
    Euclid,
}

impl Distance {
    /// Score two vectors so that a higher score always means more similar
    pub fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Distance::Cosine => cosine_similarity(a, b),
            Distance::Dot => dot_product(a, b),
            Distance::Euclid => -euclidean_distance(a, b),
        }
    }
}
