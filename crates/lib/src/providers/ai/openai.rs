use crate::{
    errors::ProviderError,
    providers::ai::{CompletionProvider, CompletionRequest},
    types::ChatMessage,
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize, Debug)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
}

impl ChatCompletionResponse {
    /// The content of the first returned message.
    pub(crate) fn into_content(self) -> Result<String, ProviderError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ProviderError::MissingContent)
    }
}

#[derive(Deserialize, Debug)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

// --- OpenAI Provider implementation ---

/// A provider for the OpenAI chat completions API or any compatible server.
#[derive(Clone, Debug)]
pub struct OpenAiProvider {
    client: ReqwestClient,
    api_url: String,
}

impl OpenAiProvider {
    /// Creates a new `OpenAiProvider` posting to `api_url`.
    pub fn new(api_url: String, timeout: Duration) -> Result<Self, ProviderError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(ProviderError::ClientBuild)?;
        Ok(Self { client, api_url })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let request_body = ChatCompletionRequest {
            model: request.model,
            messages: request.messages,
        };

        debug!(url = %self.api_url, model = request.model, "--> Sending chat completion request");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(request.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Chat completion request was rejected");
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Deserialization(e.without_url()))?;

        completion.into_content()
    }
}
