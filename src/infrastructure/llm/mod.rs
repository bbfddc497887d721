//! LLM provider implementations

mod http_client;
mod openai;

pub use http_client::{status_error, ByteStream, HttpClient, HttpClientTrait};
pub use openai::{OpenAiChatProvider, DEFAULT_CHAT_BASE_URL, DEFAULT_CHAT_MODEL};

#[cfg(test)]
pub use http_client::mock::{MockHttpClient, RecordedRequest};
