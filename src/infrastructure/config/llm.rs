//! LLM provider configuration.
//!
//! Provides configuration for the Large Language Model used for ticker
//! resolution and stock analysis.

use serde::{Deserialize, Serialize};

/// LLM provider configuration.
///
/// Configures which LLM provider to use and provider-specific settings.
/// API keys are read from environment variables (`ANTHROPIC_API_KEY` or
/// `OPENAI_API_KEY`) at runtime.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// LLM provider to use. Defaults to Anthropic.
    #[serde(default)]
    pub provider: LlmProvider,

    /// Anthropic-specific settings.
    #[serde(default)]
    pub anthropic: ProviderConfig,

    /// OpenAI-specific settings.
    #[serde(default = "ProviderConfig::openai")]
    pub openai: ProviderConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            anthropic: ProviderConfig::default(),
            openai: ProviderConfig::openai(),
        }
    }
}

impl LlmConfig {
    /// Settings of the selected provider.
    #[must_use]
    pub fn active(&self) -> &ProviderConfig {
        match self.provider {
            LlmProvider::Anthropic => &self.anthropic,
            LlmProvider::OpenAi => &self.openai,
        }
    }
}

/// LLM provider selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Anthropic Claude models.
    #[default]
    Anthropic,
    /// OpenAI GPT models.
    OpenAi,
}

/// Per-provider settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Model identifier.
    pub model: String,

    /// Sampling temperature. Lower values produce more deterministic output.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum tokens in the response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// API base URL override (proxies, gateways, tests).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl ProviderConfig {
    fn openai() -> Self {
        Self {
            model: "gpt-4o".into(),
            ..Self::default()
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: "claude-3-5-sonnet-20241022".into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            base_url: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_temperature() -> f64 {
    0.2
}

const fn default_max_tokens() -> usize {
    4096
}

const fn default_timeout_ms() -> u64 {
    120_000
}
