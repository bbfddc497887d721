//! Pipeline-level types shared by the indexing and retrieval flows

mod error;

pub(crate) use error::CapabilityResultExt;

pub use error::{Capability, PipelineError};
