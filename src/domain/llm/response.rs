//! Streamed chat completion output

/// Reason why the generation finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Error,
}

impl FinishReason {
    pub fn parse(reason: &str) -> Self {
        match reason {
            "length" => FinishReason::Length,
            "content_filter" => FinishReason::ContentFilter,
            "error" => FinishReason::Error,
            _ => FinishReason::Stop,
        }
    }
}

/// Streaming chunk from an LLM provider
#[derive(Debug, Clone, PartialEq)]
pub struct StreamChunk {
    pub id: String,
    pub model: String,
    pub delta: Option<String>,
    pub finish_reason: Option<FinishReason>,
}

impl StreamChunk {
    pub fn new(id: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            delta: None,
            finish_reason: None,
        }
    }

    pub fn with_delta(mut self, delta: impl Into<String>) -> Self {
        self.delta = Some(delta.into());
        self
    }

    pub fn with_finish_reason(mut self, reason: FinishReason) -> Self {
        self.finish_reason = Some(reason);
        self
    }

    /// Non-empty text carried by this chunk
    pub fn text(&self) -> Option<&str> {
        self.delta.as_deref().filter(|d| !d.is_empty())
    }
}
