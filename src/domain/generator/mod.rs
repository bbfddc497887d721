//! Answer generation domain

mod provider;

pub use provider::{AnswerStream, Generator};

#[cfg(test)]
pub use provider::MockGenerator;
