use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

use super::{AiError, AiProvider, GeneratedImage};
use crate::config::AiConfig;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    n: u8,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
    b64_json: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

pub struct OpenAiClient {
    client: Client,
    config: AiConfig,
}

impl OpenAiClient {
    pub fn new(client: Client, config: AiConfig) -> Self {
        info!(
            "Initializing OpenAI client (chat: {}, image: {})",
            config.chat_model, config.image_model
        );
        Self { client, config }
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, AiError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("OpenAI {} returned {}", path, status);
            return Err(api_error(status.as_u16(), &text));
        }

        Ok(response.json::<R>().await?)
    }
}

#[async_trait]
impl AiProvider for OpenAiClient {
    async fn chat(&self, prompt: &str) -> Result<String, AiError> {
        let request = ChatCompletionRequest {
            model: &self.config.chat_model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response: ChatCompletionResponse = self.post("chat/completions", &request).await?;
        first_answer(response)
    }

    async fn image(&self, prompt: &str) -> Result<GeneratedImage, AiError> {
        let request = ImageGenerationRequest {
            model: &self.config.image_model,
            prompt,
            size: &self.config.image_size,
            n: 1,
        };

        let response: ImageGenerationResponse = self.post("images/generations", &request).await?;
        first_image(response)
    }
}

fn first_answer(response: ChatCompletionResponse) -> Result<String, AiError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(AiError::EmptyResponse)
}

fn first_image(response: ImageGenerationResponse) -> Result<GeneratedImage, AiError> {
    let data = response.data.into_iter().next().ok_or(AiError::EmptyResponse)?;

    if let Some(url) = data.url {
        let url = Url::parse(&url).map_err(|e| AiError::Decode(format!("image url {:?}: {}", url, e)))?;
        return Ok(GeneratedImage::Url(url));
    }

    if let Some(b64) = data.b64_json {
        let bytes = BASE64_STANDARD
            .decode(b64.as_bytes())
            .map_err(|e| AiError::Decode(format!("image payload: {}", e)))?;
        return Ok(GeneratedImage::Bytes(bytes));
    }

    Err(AiError::EmptyResponse)
}

fn api_error(status: u16, body: &str) -> AiError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect());

    AiError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_answer() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"id":"c1","choices":[{"index":0,"message":{"role":"assistant","content":"Salom!"},"finish_reason":"stop"}]}"#,
        )
        .unwrap();
        assert_eq!(first_answer(response).unwrap(), "Salom!");

        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(first_answer(empty), Err(AiError::EmptyResponse)));

        let null_content: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#).unwrap();
        assert!(matches!(first_answer(null_content), Err(AiError::EmptyResponse)));
    }

    #[test]
    fn test_first_image_url() {
        let response: ImageGenerationResponse =
            serde_json::from_str(r#"{"created":1,"data":[{"url":"https://img.example.com/a.png"}]}"#).unwrap();

        assert_eq!(
            first_image(response).unwrap(),
            GeneratedImage::Url(Url::parse("https://img.example.com/a.png").unwrap())
        );
    }

    #[test]
    fn test_first_image_base64() {
        let response: ImageGenerationResponse =
            serde_json::from_str(r#"{"created":1,"data":[{"b64_json":"iVBORw0K"}]}"#).unwrap();

        assert_eq!(
            first_image(response).unwrap(),
            GeneratedImage::Bytes(vec![0x89, b'P', b'N', b'G', b'\r', b'\n'])
        );
    }

    #[test]
    fn test_first_image_rejects_garbage() {
        let bad_url: ImageGenerationResponse = serde_json::from_str(r#"{"data":[{"url":"not a url"}]}"#).unwrap();
        assert!(matches!(first_image(bad_url), Err(AiError::Decode(_))));

        let nothing: ImageGenerationResponse = serde_json::from_str(r#"{"data":[{}]}"#).unwrap();
        assert!(matches!(first_image(nothing), Err(AiError::EmptyResponse)));
    }

    #[test]
    fn test_api_error_message() {
        let err = api_error(401, r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#);
        assert!(matches!(err, AiError::Api { status: 401, ref message } if message == "Incorrect API key provided"));

        let err = api_error(502, "Bad Gateway");
        assert!(matches!(err, AiError::Api { status: 502, ref message } if message == "Bad Gateway"));
    }
}
