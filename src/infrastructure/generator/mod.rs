//! Generator implementations

mod llm_generator;

pub use llm_generator::{LlmGenerator, SYSTEM_PROMPT};
