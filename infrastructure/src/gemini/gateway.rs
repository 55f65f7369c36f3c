//! Gemini LLM Gateway implementation.
//!
//! Provides [`GeminiGateway`] which implements [`LlmGateway`] by calling the
//! `generateContent` REST endpoint with `reqwest`. Each call is a single
//! round trip; no retries.

use super::error::{GeminiError, Result};
use super::protocol::{
    ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    SafetySetting,
};
use async_trait::async_trait;
use mindcare_application::{GatewayError, LlmGateway};
use mindcare_domain::util::{preview, truncate_str};
use mindcare_domain::{Model, OutboundRequest};
use std::fmt;
use tracing::{debug, info};

/// Default public endpoint of the Generative Language API
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Connection settings for [`GeminiGateway`]
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: Model,
    pub generation: GenerationConfig,
    /// Threshold applied to every harm category; `None` leaves the API defaults.
    pub safety_threshold: Option<String>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>, model: Model) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
            generation: GenerationConfig::default(),
            safety_threshold: Some("BLOCK_ONLY_HIGH".to_string()),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("generation", &self.generation)
            .field("safety_threshold", &self.safety_threshold)
            .finish()
    }
}

/// Gateway to the Gemini `generateContent` API.
pub struct GeminiGateway {
    client: reqwest::Client,
    config: GeminiConfig,
    endpoint: String,
}

impl GeminiGateway {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("mindcare/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        info!("Gemini gateway ready: model {}", config.model);

        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self, request: &OutboundRequest) -> GenerateContentRequest {
        let safety = self
            .config
            .safety_threshold
            .as_deref()
            .map(SafetySetting::uniform)
            .unwrap_or_default();
        GenerateContentRequest::from_outbound(request, self.config.generation, safety)
    }

    /// Send one request and extract the first candidate's text.
    pub async fn generate_content(&self, body: &GenerateContentRequest) -> Result<String> {
        debug!(
            "POST {} ({} contents)",
            self.endpoint,
            body.contents.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&raw)
                .map(|e| match e.error.status {
                    Some(code) => format!("{} ({})", e.error.message, code),
                    None => e.error.message,
                })
                .unwrap_or_else(|_| preview(&raw, 200).into_owned());
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&raw).map_err(|e| GeminiError::ParseError {
                error: e.to_string(),
                raw: truncate_str(&raw, 500).to_string(),
            })?;

        parsed.into_text()
    }
}

#[async_trait]
impl LlmGateway for GeminiGateway {
    fn model(&self) -> &Model {
        &self.config.model
    }

    async fn generate(&self, request: &OutboundRequest) -> std::result::Result<String, GatewayError> {
        let body = self.build_request(request);
        self.generate_content(&body).await.map_err(GatewayError::from)
    }
}
