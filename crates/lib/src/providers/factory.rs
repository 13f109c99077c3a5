//! # Completion Provider Factory
//!
//! Creates a boxed `CompletionProvider` from configuration values, so the CLI
//! and tests share one construction path.

use crate::{
    constants::{GEMINI_API_BASE_URL, OPENAI_CHAT_COMPLETIONS_URL},
    errors::ProviderError,
    providers::ai::{gemini::GeminiProvider, openai::OpenAiProvider, CompletionProvider},
};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// The supported completion provider families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
}

impl ProviderKind {
    /// Guesses the provider family from a model name.
    pub fn infer_from_model(model: &str) -> Self {
        if model.starts_with("gemini") {
            ProviderKind::Gemini
        } else {
            ProviderKind::OpenAi
        }
    }

    /// The endpoint used when no URL is configured.
    pub fn default_api_url(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => OPENAI_CHAT_COMPLETIONS_URL,
            ProviderKind::Gemini => GEMINI_API_BASE_URL,
        }
    }

    /// The environment variable conventionally holding this provider's key.
    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::OpenAi => f.write_str("openai"),
            ProviderKind::Gemini => f.write_str("gemini"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "local" => Ok(ProviderKind::OpenAi),
            "gemini" => Ok(ProviderKind::Gemini),
            other => Err(ProviderError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Creates a provider of the given kind. `api_url` falls back to the kind's
/// default endpoint when `None`.
pub fn create_provider(
    kind: ProviderKind,
    api_url: Option<&str>,
    timeout: Duration,
) -> Result<Box<dyn CompletionProvider>, ProviderError> {
    let api_url = api_url
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| kind.default_api_url())
        .to_string();
    info!("Configuring {kind} completion provider with URL: {api_url}");

    let provider: Box<dyn CompletionProvider> = match kind {
        ProviderKind::OpenAi => Box::new(OpenAiProvider::new(api_url, timeout)?),
        ProviderKind::Gemini => Box::new(GeminiProvider::new(api_url, timeout)?),
    };
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!("local".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!("gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert!(matches!(
            "claude".parse::<ProviderKind>(),
            Err(ProviderError::UnsupportedProvider(name)) if name == "claude"
        ));
    }

    #[test]
    fn test_provider_kind_inferred_from_model() {
        assert_eq!(
            ProviderKind::infer_from_model("gemini-2.0-flash"),
            ProviderKind::Gemini
        );
        assert_eq!(
            ProviderKind::infer_from_model("gpt-4o-mini"),
            ProviderKind::OpenAi
        );
    }

    #[test]
    fn test_create_provider_with_defaults() {
        let provider = create_provider(ProviderKind::OpenAi, None, Duration::from_secs(5));
        assert!(provider.is_ok());
        let provider = create_provider(ProviderKind::Gemini, Some(""), Duration::from_secs(5));
        assert!(provider.is_ok());
    }
}
