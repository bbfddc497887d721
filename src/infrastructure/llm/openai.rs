use async_trait::async_trait;
use bytes::Bytes;
use futures::{future, stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http_client::HttpClientTrait;
use crate::domain::{
    DomainError, FinishReason, LlmProvider, LlmRequest, LlmStream, Message, StreamChunk,
};

pub const DEFAULT_CHAT_BASE_URL: &str = "https://api.mistral.ai";
pub const DEFAULT_CHAT_MODEL: &str = "mistral-tiny";

/// OpenAI-compatible chat completions provider
#[derive(Debug)]
pub struct OpenAiChatProvider<C: HttpClientTrait> {
    client: C,
    auth_header: Option<String>,
    base_url: String,
}

impl<C: HttpClientTrait> OpenAiChatProvider<C> {
    pub fn new(client: C, api_key: Option<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_CHAT_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_header = api_key.map(|key| format!("Bearer {}", key));
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
        }
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request(&self, model: &str, request: &LlmRequest) -> serde_json::Value {
        let messages: Vec<OpenAiMessage> =
            request.messages.iter().map(OpenAiMessage::from_domain).collect();

        let mut body = serde_json::json!({
            "model": model,
            "messages": messages,
            "stream": true,
        });

        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        body
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];
        if let Some(ref auth) = self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }
        headers
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OpenAiChatProvider<C> {
    async fn chat_stream(
        &self,
        model: &str,
        request: LlmRequest,
    ) -> Result<LlmStream, DomainError> {
        let url = self.chat_completions_url();
        let body = self.build_request(model, &request);

        debug!(model = %model, url = %url, "Starting chat completion stream");

        let byte_stream = self
            .client
            .post_json_stream(&url, self.headers(), &body)
            .await?;

        let stream = byte_stream
            .scan(SseDecoder::new(model), |decoder, result: Result<Bytes, DomainError>| {
                if decoder.is_done() {
                    return future::ready(None);
                }

                let items = match result {
                    Ok(bytes) => decoder.push(&bytes),
                    Err(e) => vec![Err(e)],
                };

                future::ready(Some(stream::iter(items)))
            })
            .flatten();

        Ok(Box::pin(stream))
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

/// Incremental server-sent events decoder
///
/// Network chunks may split an event line, or a multi-byte character, anywhere.
/// Bytes are buffered until a full line is available.
#[derive(Debug)]
struct SseDecoder {
    model: String,
    buffer: Vec<u8>,
    done: bool,
}

impl SseDecoder {
    fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            buffer: Vec::new(),
            done: false,
        }
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn push(&mut self, bytes: &[u8]) -> Vec<Result<StreamChunk, DomainError>> {
        self.buffer.extend_from_slice(bytes);

        let mut chunks = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();

            if self.done {
                continue;
            }

            let line = String::from_utf8_lossy(&line);
            if let Some(chunk) = self.parse_line(line.trim_end_matches(['\r', '\n'])) {
                chunks.push(chunk);
            }
        }

        chunks
    }

    fn parse_line(&mut self, line: &str) -> Option<Result<StreamChunk, DomainError>> {
        let data = line.strip_prefix("data:")?.trim_start();

        if data.trim() == "[DONE]" {
            self.done = true;
            return Some(Ok(StreamChunk::new("", self.model.clone())
                .with_finish_reason(FinishReason::Stop)));
        }

        let chunk = match serde_json::from_str::<OpenAiStreamChunk>(data) {
            Ok(chunk) => chunk,
            Err(e) => {
                return Some(Err(DomainError::provider(
                    "openai",
                    format!("Failed to parse stream chunk: {}", e),
                )))
            }
        };

        let choice = chunk.choices.into_iter().next()?;
        let mut stream_chunk = StreamChunk::new(
            chunk.id.unwrap_or_default(),
            chunk.model.unwrap_or_else(|| self.model.clone()),
        );

        if let Some(delta) = choice.delta.content {
            stream_chunk = stream_chunk.with_delta(delta);
        }

        if let Some(reason) = choice.finish_reason {
            stream_chunk = stream_chunk.with_finish_reason(FinishReason::parse(&reason));
        }

        Some(Ok(stream_chunk))
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: &'static str,
    content: String,
}

impl OpenAiMessage {
    fn from_domain(message: &Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiStreamChunk {
    id: Option<String>,
    model: Option<String>,
    choices: Vec<OpenAiStreamChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiStreamChoice {
    delta: OpenAiDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiDelta {
    content: Option<String>,
}
