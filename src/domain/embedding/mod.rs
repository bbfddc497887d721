//! Embedding domain - text to vector conversion and similarity measures

mod provider;
mod similarity;

pub use provider::Embedder;
pub use similarity::{cosine_similarity, dot_product, euclidean_distance};

#[cfg(test)]
pub use provider::MockEmbedder;
