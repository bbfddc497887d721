//! Generator backed by a streaming chat completion provider

use std::sync::Arc;

use async_trait::async_trait;
use futures::{future, StreamExt};
use tracing::{debug, instrument};

use crate::domain::{AnswerStream, DomainError, Generator, LlmProvider, LlmRequest};

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant. Use the provided context to answer \
the user's question. If the answer is not in the context, say so gracefully.";

const AUTHENTICATION_MESSAGE: &str = "LLM authentication failed. Please check your API key.";

/// Answers a query from retrieved context using an LLM
#[derive(Debug)]
pub struct LlmGenerator {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl LlmGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn build_user_prompt(context: &str, query: &str) -> String {
        format!(
            "\nContext:\n{}\n\nQuestion: \n{}\n\nAnswer:\n",
            context, query
        )
    }

    fn build_request(&self, context: &str, query: &str) -> LlmRequest {
        LlmRequest::chat(SYSTEM_PROMPT, Self::build_user_prompt(context, query))
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
    }
}

fn translate_error(error: DomainError) -> DomainError {
    if error.is_authentication() {
        DomainError::authentication("llm", AUTHENTICATION_MESSAGE)
    } else {
        error
    }
}

#[async_trait]
impl Generator for LlmGenerator {
    #[instrument(skip(self, context, query), fields(model = %self.model, provider = self.provider.provider_name()))]
    async fn generate(&self, context: &str, query: &str) -> Result<AnswerStream, DomainError> {
        let request = self.build_request(context, query);

        debug!(context_chars = context.len(), "Starting answer generation");

        let stream = self
            .provider
            .chat_stream(&self.model, request)
            .await
            .map_err(translate_error)?;

        let answer = stream.filter_map(|chunk| {
            future::ready(match chunk {
                Ok(chunk) => chunk.text().map(|text| Ok(text.to_string())),
                Err(e) => Some(Err(translate_error(e))),
            })
        });

        Ok(Box::pin(answer))
    }

    fn generator_name(&self) -> &'static str {
        "llm"
    }
}
