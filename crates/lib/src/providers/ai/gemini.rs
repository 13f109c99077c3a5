use crate::{
    errors::ProviderError,
    providers::ai::{CompletionProvider, CompletionRequest},
    types::Role,
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Gemini reads the key from this header, which keeps it out of request URLs.
const API_KEY_HEADER: &str = "x-goog-api-key";

// --- Gemini-specific request and response structures ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize, Debug)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize, Debug)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize, Debug)]
struct PartResponse {
    #[serde(default)]
    text: Option<String>,
}

// --- Gemini Provider implementation ---

/// A provider for interacting with the Google Gemini API.
#[derive(Clone, Debug)]
pub struct GeminiProvider {
    client: ReqwestClient,
    base_url: String,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider`. `base_url` is the API root, e.g.
    /// `https://generativelanguage.googleapis.com/v1beta`.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, ProviderError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(ProviderError::ClientBuild)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();
        for message in request.messages {
            let part = Part {
                text: message.content.clone(),
            };
            match message.role {
                Role::System => system_parts.push(part),
                Role::User => contents.push(Content {
                    role: Some("user"),
                    parts: vec![part],
                }),
            }
        }

        let request_body = GeminiRequest {
            system_instruction: (!system_parts.is_empty()).then(|| Content {
                role: None,
                parts: system_parts,
            }),
            contents,
        };

        let url = self.endpoint(request.model);
        debug!(url = %url, "--> Sending Gemini generateContent request");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, request.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Gemini request was rejected");
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Deserialization(e.without_url()))?;

        let text: String = gemini_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .concat()
            })
            .ok_or(ProviderError::MissingContent)?;

        if text.is_empty() {
            return Err(ProviderError::MissingContent);
        }
        Ok(text)
    }
}
