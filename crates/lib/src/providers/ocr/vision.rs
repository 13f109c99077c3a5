use crate::{
    errors::{OcrError, ProviderError},
    prompts::ocr::OCR_TRANSCRIPTION_PROMPT,
    providers::{
        ai::openai::ChatCompletionResponse,
        ocr::{encode_png, OcrEngine},
    },
    types::ApiKey,
};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use image::DynamicImage;
use reqwest::Client as ReqwestClient;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

// --- OpenAI-compatible multimodal request structures ---

#[derive(Serialize)]
struct VisionRequest<'a> {
    model: &'a str,
    messages: Vec<VisionMessage>,
}

#[derive(Serialize)]
struct VisionMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

/// Transcribes images with a vision-capable chat model instead of a local
/// OCR program.
#[derive(Clone, Debug)]
pub struct VisionOcrEngine {
    client: ReqwestClient,
    api_url: String,
    api_key: ApiKey,
    model: String,
}

impl VisionOcrEngine {
    pub fn new(
        api_url: String,
        api_key: ApiKey,
        model: String,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(ProviderError::ClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl OcrEngine for VisionOcrEngine {
    async fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let png = encode_png(image)?;
        let data_url = format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(png)
        );

        let request_body = VisionRequest {
            model: &self.model,
            messages: vec![VisionMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: OCR_TRANSCRIPTION_PROMPT.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ],
            }],
        };

        debug!(url = %self.api_url, model = %self.model, "--> Sending image for transcription");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(self.api_key.expose())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                OcrError::Engine(ProviderError::Request(e.without_url()).to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Engine(
                ProviderError::Api {
                    status: status.as_u16(),
                    body,
                }
                .to_string(),
            ));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| {
                OcrError::Engine(ProviderError::Deserialization(e.without_url()).to_string())
            })?;

        completion
            .into_content()
            .map_err(|e| OcrError::Engine(e.to_string()))
    }
}
