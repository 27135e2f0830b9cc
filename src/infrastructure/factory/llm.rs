//! LLM client factory.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::llm::anthropic::Anthropic;
use crate::adapter::outbound::llm::openai::OpenAi;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::llm::LlmProvider;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::llm::Llm;

/// Environment variable holding the API key of `provider`.
#[must_use]
pub const fn api_key_var(provider: LlmProvider) -> &'static str {
    match provider {
        LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
        LlmProvider::OpenAi => "OPENAI_API_KEY",
    }
}

/// Build the configured LLM client.
///
/// # Errors
///
/// Returns [`ConfigError::MissingField`] when the provider's API key is not
/// set, or an error if the HTTP client cannot be built.
pub fn build_llm_client(config: &Config) -> Result<Arc<dyn Llm>> {
    let provider = config.llm.provider;
    let var = api_key_var(provider);
    let api_key = std::env::var(var)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or(ConfigError::MissingField { field: var })?;

    let settings = config.llm.active();
    let client: Arc<dyn Llm> = match provider {
        LlmProvider::Anthropic => Arc::new(Anthropic::from_config(api_key, settings)?),
        LlmProvider::OpenAi => Arc::new(OpenAi::from_config(api_key, settings)?),
    };

    info!(provider = client.name(), model = %settings.model, "LLM client initialized");
    Ok(client)
}
