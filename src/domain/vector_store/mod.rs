//! Vector store domain - collections of vectors and similarity queries

mod distance;
mod store;

pub use distance::Distance;
pub use store::VectorStore;

#[cfg(test)]
pub use store::MockVectorStore;
