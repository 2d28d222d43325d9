//! Content-draft gateway.
//!
//! Forwards a prompt, framed by a fixed brand-voice instruction, to an
//! external text-generation provider and relays the text it returns. One
//! request per call: no retries, caching or streaming.

use anyhow::{Context, bail};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::metrics;
use crate::model::{ContentGenerateRequest, GeneratedContent, Tone};

/// Brand tagline woven into every system instruction.
const TAGLINE: &str = "Luxury Revisited, Made Personal";

/// Upper bound on provider error bodies echoed into error messages.
const MAX_ERROR_BODY: usize = 512;

/// One chat-style completion request.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub system: &'a str,
    pub user: &'a str,
}

/// Client for a text-generation provider.
#[async_trait]
pub trait CompletionClient: Send + Sync + 'static {
    /// Sends one completion request and returns the generated text verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error on network, authentication, rate-limit or decoding
    /// failures.
    async fn complete(&self, api_key: &str, request: CompletionRequest<'_>)
    -> anyhow::Result<String>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Client for OpenAI-compatible `chat/completions` endpoints.
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ChatCompletionsClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build provider HTTP client")?;
        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionsClient {
    async fn complete(
        &self,
        api_key: &str,
        request: CompletionRequest<'_>,
    ) -> anyhow::Result<String> {
        let body = ChatRequest {
            model: request.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: request.user,
                },
            ],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to reach text-generation provider")?;

        let status = response.status();
        if !status.is_success() {
            let mut detail = response.text().await.unwrap_or_default();
            if detail.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !detail.is_char_boundary(cut) {
                    cut -= 1;
                }
                detail.truncate(cut);
            }
            bail!("Provider returned {status}: {detail}");
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("Malformed provider response")?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .context("Provider response contained no content")
    }
}

/// Stateless pass-through to the configured provider.
#[derive(Clone)]
pub struct ContentGateway {
    client: Arc<dyn CompletionClient>,
    api_key: Option<String>,
    provider: String,
    model: String,
    timeout: Duration,
    brand: String,
}

impl ContentGateway {
    /// Builds a gateway talking to the configured provider endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if no endpoint is known for the provider or the HTTP
    /// client cannot be built.
    pub fn from_config(provider: &ProviderConfig, brand: &str) -> anyhow::Result<Self> {
        let endpoint = provider.endpoint().with_context(|| {
            format!(
                "No base URL known for provider '{}'. Set provider.base_url",
                provider.name
            )
        })?;
        let client = ChatCompletionsClient::new(&endpoint, provider.timeout())?;
        Ok(Self::with_client(Arc::new(client), provider, brand))
    }

    /// Builds a gateway over any completion client.
    pub fn with_client(
        client: Arc<dyn CompletionClient>,
        provider: &ProviderConfig,
        brand: &str,
    ) -> Self {
        Self {
            client,
            api_key: provider
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
            provider: provider.name.clone(),
            model: provider.model.clone(),
            timeout: provider.timeout(),
            brand: brand.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Brand-voice instruction for the requested tone.
    pub fn system_message(&self, tone: &Tone) -> String {
        format!(
            "You are a luxury fragrance brand content creator for {brand}. \
             Create elegant, sophisticated captions that embody '{TAGLINE}'. \
             Tone: {tone}. Keep it poetic yet authentic.",
            brand = self.brand,
        )
    }

    /// Drafts copy for `request`.
    ///
    /// # Errors
    ///
    /// `Configuration` if no API key is set (the provider is not contacted),
    /// `Upstream` if the provider call fails or exceeds the timeout.
    pub async fn generate(&self, request: ContentGenerateRequest) -> Result<GeneratedContent> {
        let Some(api_key) = self.api_key.as_deref() else {
            metrics::record_generation("unconfigured");
            error!(provider = %self.provider, "Content generation requested but no API key is configured");
            return Err(Error::Configuration("API key not configured".to_string()));
        };

        let system = self.system_message(&request.tone);
        let call = self.client.complete(api_key, CompletionRequest {
            model: &self.model,
            system: &system,
            user: &request.prompt,
        });

        let outcome = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!(
                "Provider did not respond within {}s",
                self.timeout.as_secs_f64()
            )),
        };

        match outcome {
            Ok(content) => {
                metrics::record_generation("success");
                info!(
                    provider = %self.provider,
                    model = %self.model,
                    platform = %request.platform,
                    tone = %request.tone,
                    "Content generated"
                );
                Ok(GeneratedContent {
                    content,
                    platform: request.platform,
                    generated_at: Utc::now(),
                })
            },
            Err(err) => {
                let cause = format!("{err:#}");
                metrics::record_generation("upstream_error");
                error!(
                    provider = %self.provider,
                    model = %self.model,
                    error = %cause,
                    "Content generation error"
                );
                Err(Error::Upstream(cause))
            },
        }
    }
}
