//! Vector domain - embedded chunks and search responses

mod entity;
mod search_response;

pub use entity::{Vector, DOCUMENT_ID_KEY, DOCUMENT_NAME_KEY};
pub use search_response::SearchResponse;
