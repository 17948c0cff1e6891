mod error;
mod openai;

pub use error::AiError;
pub use openai::OpenAiClient;

use async_trait::async_trait;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedImage {
    Url(Url),
    Bytes(Vec<u8>),
}

/// Hosted text and image generation.
#[async_trait]
pub trait AiProvider: Send + Sync {
    async fn chat(&self, prompt: &str) -> Result<String, AiError>;
    async fn image(&self, prompt: &str) -> Result<GeneratedImage, AiError>;
}
