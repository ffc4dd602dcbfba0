//! Generative Content Provider
//!
//! Client seam for the external generative content service (prompt in; text, image
//! or video out). The service itself is out of scope: this module provides the
//! [`ContentGenerator`] trait, an OpenAI-compatible HTTP implementation and a static
//! implementation for local runs and tests.

use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Kind of content requested from a generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Text,
    Image,
    Video,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Image => "image",
            ContentKind::Video => "video",
        }
    }
}

impl std::str::FromStr for ContentKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ContentKind::Text),
            "image" => Ok(ContentKind::Image),
            "video" => Ok(ContentKind::Video),
            other => Err(ApiError::ProviderError(format!(
                "Unknown content kind: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub kind: ContentKind,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Text,
            prompt: prompt.into(),
            max_tokens: None,
        }
    }

    pub fn image(prompt: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Image,
            prompt: prompt.into(),
            max_tokens: None,
        }
    }
}

/// Output of a generator. `body` is the text for text requests and a URL (or data
/// URL) for media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub kind: ContentKind,
    pub body: String,
    pub provider: String,
    pub model: String,
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedContent, ApiError>;

    fn provider_name(&self) -> &str;

    fn model_name(&self) -> &str;
}

/// Provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    /// Any server speaking the OpenAI chat-completions and images API
    OpenAiCompatible,
    /// Canned output, no network
    Static,
}

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider_type: ProviderType,

    /// Text model name
    #[serde(default)]
    pub model: String,

    /// Image model; image requests are rejected when unset
    #[serde(default)]
    pub image_model: Option<String>,

    #[serde(default)]
    pub base_url: Option<String>,

    /// Inline API key. Prefer `api_key_env`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Environment variable holding the API key
    #[serde(default)]
    pub api_key_env: Option<String>,
}

impl ProviderConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.provider_type == ProviderType::OpenAiCompatible && self.model.trim().is_empty() {
            return Err("model is required for openai_compatible providers".to_string());
        }
        if let Some(url) = &self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!("base_url must be an http(s) URL: {}", url));
            }
        }
        Ok(())
    }

    /// API key from the inline value or the named environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key.clone().or_else(|| {
            self.api_key_env
                .as_ref()
                .and_then(|var| std::env::var(var).ok())
        })
    }
}

/// Build the generator described by `config`.
pub fn build_generator(
    name: &str,
    config: &ProviderConfig,
) -> Result<Arc<dyn ContentGenerator>, ApiError> {
    config
        .validate()
        .map_err(|e| ApiError::ConfigError(format!("Provider '{}': {}", name, e)))?;

    match config.provider_type {
        ProviderType::Static => Ok(Arc::new(StaticGenerator::default())),
        ProviderType::OpenAiCompatible => {
            let api_key = config.resolve_api_key().ok_or_else(|| {
                ApiError::ProviderNotConfigured(format!("Provider '{}' has no API key", name))
            })?;
            Ok(Arc::new(OpenAiCompatibleGenerator::new(
                config.model.clone(),
                config.image_model.clone(),
                api_key,
                config.base_url.clone(),
            )?))
        }
    }
}

// Helper function to map HTTP errors to ApiError
fn map_http_error(error: reqwest::Error) -> ApiError {
    if let Some(status) = error.status() {
        map_status(status.as_u16(), &error.to_string())
    } else if error.is_timeout() {
        ApiError::ProviderRequestFailed(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        ApiError::ProviderRequestFailed(format!("Connection error: {}", error))
    } else {
        ApiError::ProviderError(format!("HTTP error: {}", error))
    }
}

fn map_status(status: u16, detail: &str) -> ApiError {
    match status {
        401 | 403 => ApiError::ProviderAuthFailed(format!("Authentication failed: {}", detail)),
        429 => ApiError::ProviderRateLimit(format!("Rate limit exceeded: {}", detail)),
        _ => ApiError::ProviderRequestFailed(format!(
            "Request failed with status {}: {}",
            status, detail
        )),
    }
}

const PROVIDER_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const PROVIDER_HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

fn build_provider_http_client() -> Result<Client, ApiError> {
    Client::builder()
        .connect_timeout(PROVIDER_HTTP_CONNECT_TIMEOUT)
        .timeout(PROVIDER_HTTP_REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ApiError::ProviderError(format!("Failed to create HTTP client: {}", e)))
}

// OpenAI-compatible API request/response structures
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    model: String,
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    url: Option<String>,
    b64_json: Option<String>,
}

const STOREFRONT_SYSTEM_PROMPT: &str =
    "You write concise, friendly copy for an online storefront. Answer with the copy only.";

/// Generator for servers implementing the OpenAI chat-completions and images API.
pub struct OpenAiCompatibleGenerator {
    client: Client,
    model: String,
    image_model: Option<String>,
    api_key: String,
    base_url: String,
}

impl OpenAiCompatibleGenerator {
    pub fn new(
        model: String,
        image_model: Option<String>,
        api_key: String,
        base_url: Option<String>,
    ) -> Result<Self, ApiError> {
        let client = build_provider_http_client()?;
        let base_url = base_url
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            model,
            image_model,
            api_key,
            base_url,
        })
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "Provider request");
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body)
            .send()
            .await
            .map_err(map_http_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(map_status(status, &error_text));
        }
        Ok(response)
    }

    async fn generate_text(&self, request: &GenerationRequest) -> Result<GeneratedContent, ApiError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: STOREFRONT_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.prompt.clone(),
                },
            ],
            max_tokens: request.max_tokens,
        };

        let completion: ChatCompletionResponse = self
            .post("chat/completions", &body)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::ProviderError(format!("Failed to parse response: {}", e)))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::ProviderError("No choices in response".to_string()))?;

        Ok(GeneratedContent {
            kind: ContentKind::Text,
            body: choice.message.content.trim().to_string(),
            provider: self.provider_name().to_string(),
            model: completion.model,
        })
    }

    async fn generate_image(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedContent, ApiError> {
        let model = self.image_model.as_deref().ok_or_else(|| ApiError::UnsupportedContent {
            provider: self.provider_name().to_string(),
            kind: ContentKind::Image.as_str().to_string(),
        })?;

        let body = ImageRequest {
            model,
            prompt: &request.prompt,
            n: 1,
        };
        let images: ImageResponse = self
            .post("images/generations", &body)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::ProviderError(format!("Failed to parse response: {}", e)))?;

        let image = images
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::ProviderError("No images in response".to_string()))?;
        let body = match (image.url, image.b64_json) {
            (Some(url), _) => url,
            (None, Some(data)) => format!("data:image/png;base64,{}", data),
            (None, None) => {
                return Err(ApiError::ProviderError(
                    "Image response has neither url nor data".to_string(),
                ))
            }
        };

        Ok(GeneratedContent {
            kind: ContentKind::Image,
            body,
            provider: self.provider_name().to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl ContentGenerator for OpenAiCompatibleGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedContent, ApiError> {
        match request.kind {
            ContentKind::Text => self.generate_text(&request).await,
            ContentKind::Image => self.generate_image(&request).await,
            ContentKind::Video => Err(ApiError::UnsupportedContent {
                provider: self.provider_name().to_string(),
                kind: request.kind.as_str().to_string(),
            }),
        }
    }

    fn provider_name(&self) -> &str {
        "openai_compatible"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Generator returning canned output.
#[derive(Debug, Clone)]
pub struct StaticGenerator {
    responses: HashMap<ContentKind, String>,
    failure: Option<String>,
}

impl Default for StaticGenerator {
    fn default() -> Self {
        let mut responses = HashMap::new();
        responses.insert(ContentKind::Image, "https://placehold.co/600x400".to_string());
        responses.insert(ContentKind::Video, "https://placehold.co/video.mp4".to_string());
        Self {
            responses,
            failure: None,
        }
    }
}

impl StaticGenerator {
    /// Answer requests of `kind` with `body`. Text requests without a configured
    /// answer echo the prompt.
    pub fn with_response(mut self, kind: ContentKind, body: impl Into<String>) -> Self {
        self.responses.insert(kind, body.into());
        self
    }

    /// A generator whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            responses: HashMap::new(),
            failure: Some(message.into()),
        }
    }
}

#[async_trait]
impl ContentGenerator for StaticGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedContent, ApiError> {
        if let Some(message) = &self.failure {
            return Err(ApiError::ProviderRequestFailed(message.clone()));
        }
        let body = match (self.responses.get(&request.kind), request.kind) {
            (Some(body), _) => body.clone(),
            (None, ContentKind::Text) => format!("Generated: {}", request.prompt),
            (None, kind) => {
                return Err(ApiError::UnsupportedContent {
                    provider: self.provider_name().to_string(),
                    kind: kind.as_str().to_string(),
                })
            }
        };
        Ok(GeneratedContent {
            kind: request.kind,
            body,
            provider: self.provider_name().to_string(),
            model: self.model_name().to_string(),
        })
    }

    fn provider_name(&self) -> &str {
        "static"
    }

    fn model_name(&self) -> &str {
        "canned"
    }
}
