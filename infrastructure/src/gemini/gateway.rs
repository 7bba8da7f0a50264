//! Gemini LLM Gateway implementation

use super::error::{GeminiError, Result};
use super::session::{Endpoint, GeminiSession};
use crate::config::FileProviderConfig;
use async_trait::async_trait;
use codemax_application::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use codemax_domain::Model;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// LLM Gateway implementation for the Gemini REST API
pub struct GeminiLlmGateway {
    endpoint: Arc<Endpoint>,
}

impl GeminiLlmGateway {
    /// Create a gateway with an explicit key and endpoint
    ///
    /// `read_timeout` bounds the silence between reads, not the whole call:
    /// a long generation that keeps streaming is never cut off.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        read_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .read_timeout(read_timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self {
            endpoint: Arc::new(Endpoint {
                client,
                base_url: base_url.into(),
                api_key: api_key.into(),
            }),
        })
    }

    /// Create a gateway from the `[provider]` config section.
    ///
    /// Fails with [`GeminiError::MissingApiKey`] when neither
    /// `provider.api_key` nor the configured environment variable is set.
    pub fn from_config(config: &FileProviderConfig) -> Result<Self> {
        let api_key = config
            .resolve_api_key()
            .ok_or_else(|| GeminiError::MissingApiKey(config.api_key_env.clone()))?;

        let gateway = Self::new(
            api_key,
            config.base_url.clone(),
            Duration::from_secs(config.timeout_seconds),
            Duration::from_secs(config.connect_timeout_seconds),
        )?;

        info!(base_url = %config.base_url, "GeminiLlmGateway initialized");
        Ok(gateway)
    }

    pub fn base_url(&self) -> &str {
        &self.endpoint.base_url
    }
}

#[async_trait]
impl LlmGateway for GeminiLlmGateway {
    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> std::result::Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(GeminiSession::new(
            Arc::clone(&self.endpoint),
            model.clone(),
            system_prompt.to_string(),
        )))
    }

    async fn available_models(&self) -> std::result::Result<Vec<Model>, GatewayError> {
        // No listing call: the CodeMax variants are a fixed set.
        Ok(Model::known_models())
    }
}
