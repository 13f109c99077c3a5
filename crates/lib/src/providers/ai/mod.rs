pub mod gemini;
pub mod openai;

use crate::{errors::ProviderError, types::ChatMessage};
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// Everything a provider needs for one completion call.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub api_key: &'a str,
    pub messages: &'a [ChatMessage],
}

/// A trait for interacting with a chat-completion provider.
///
/// Implementations send an ordered list of role-tagged messages to a model and
/// return the text of the single generated message, unmodified.
#[async_trait]
pub trait CompletionProvider: Send + Sync + Debug + DynClone {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError>;
}

dyn_clone::clone_trait_object!(CompletionProvider);
