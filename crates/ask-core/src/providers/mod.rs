//! Answer providers.
//!
//! The transcript only needs one capability from the outside world: turn a
//! prompt into answer text, asynchronously, possibly failing. Everything about
//! wire protocol, credentials and model selection stays behind
//! [`AnswerProvider`].

pub mod gemini;
pub mod shared;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

pub use gemini::{GeminiClient, GeminiConfig};
pub use shared::{
    ProviderError, ProviderErrorKind, ProviderResult, classify_reqwest_error, resolve_api_key,
    resolve_base_url,
};

use crate::config::Config;

/// Something that can answer a single prompt.
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Generates answer text for `prompt`.
    async fn generate(&self, prompt: &str) -> ProviderResult<String>;

    /// Model identifier, for display and logs.
    fn model(&self) -> &str;
}

/// Logging wrapper around any provider.
///
/// Records duration and outcome of every call. The raw error is logged here so
/// callers are free to show a generic message instead.
pub struct LoggingProvider {
    inner: Arc<dyn AnswerProvider>,
}

impl LoggingProvider {
    pub fn new(inner: Arc<dyn AnswerProvider>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl AnswerProvider for LoggingProvider {
    async fn generate(&self, prompt: &str) -> ProviderResult<String> {
        let start = Instant::now();
        let result = self.inner.generate(prompt).await;
        let duration_ms = start.elapsed().as_millis();

        match &result {
            Ok(text) => {
                tracing::info!(
                    model = %self.inner.model(),
                    duration_ms,
                    prompt_chars = prompt.chars().count(),
                    answer_chars = text.chars().count(),
                    "answer received"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.inner.model(),
                    duration_ms,
                    kind = %e.kind,
                    error = %e.message,
                    details = e.details.as_deref().unwrap_or(""),
                    "answer request failed"
                );
            }
        }

        result
    }

    fn model(&self) -> &str {
        self.inner.model()
    }
}

/// Builds the configured provider, wrapped for logging.
///
/// # Errors
/// Returns an error if credentials or the base URL cannot be resolved.
pub fn from_config(config: &Config) -> anyhow::Result<Arc<dyn AnswerProvider>> {
    let gemini = &config.providers.gemini;
    let gemini_config = GeminiConfig::from_env(
        config.model.clone(),
        config.max_output_tokens,
        gemini.effective_base_url(),
        gemini.effective_api_key(),
    )?;
    let client: Arc<dyn AnswerProvider> = Arc::new(GeminiClient::new(gemini_config));
    Ok(Arc::new(LoggingProvider::new(client)))
}
