use async_trait::async_trait;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use std::collections::VecDeque;
use std::fmt::Debug;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use studytutor::errors::{OcrError, ProviderError};
use studytutor::providers::ai::{CompletionProvider, CompletionRequest};
use studytutor::providers::ocr::OcrEngine;
use studytutor::types::ChatMessage;

// --- Mock Completion Provider ---

/// A call recorded by `MockCompletionProvider`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub model: String,
    pub api_key: String,
    pub messages: Vec<ChatMessage>,
}

impl RecordedCall {
    /// The content of the user message, or an empty string.
    pub fn user_prompt(&self) -> &str {
        self.messages
            .iter()
            .find(|m| m.role == studytutor::types::Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug)]
enum Behavior {
    /// Returns queued responses in order, then a default.
    Scripted(Arc<Mutex<VecDeque<String>>>),
    /// Returns the same answer on every call.
    Fixed(String),
    /// Fails every call with an API error.
    Failing { status: u16, body: String },
    /// Answers only if the user prompt contains the given text.
    Requiring { needle: String, answer: String },
}

/// A completion provider that records every call and answers from a script.
#[derive(Clone, Debug)]
pub struct MockCompletionProvider {
    behavior: Behavior,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockCompletionProvider {
    /// Answers with `responses` in order, then with "Default mock response".
    pub fn new(responses: Vec<String>) -> Self {
        Self::with_behavior(Behavior::Scripted(Arc::new(Mutex::new(
            responses.into_iter().collect(),
        ))))
    }

    /// Always answers with `answer`.
    pub fn answering(answer: &str) -> Self {
        Self::with_behavior(Behavior::Fixed(answer.to_string()))
    }

    /// Fails every call with `ProviderError::Api`.
    pub fn failing(status: u16, body: &str) -> Self {
        Self::with_behavior(Behavior::Failing {
            status,
            body: body.to_string(),
        })
    }

    /// Answers with `answer` only when the user prompt contains `needle`;
    /// otherwise fails with a 400 error.
    pub fn requiring(needle: &str, answer: &str) -> Self {
        Self::with_behavior(Behavior::Requiring {
            needle: needle.to_string(),
            answer: answer.to_string(),
        })
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Retrieves the recorded calls for assertion.
    pub fn get_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let call = RecordedCall {
            model: request.model.to_string(),
            api_key: request.api_key.to_string(),
            messages: request.messages.to_vec(),
        };
        let user_prompt = call.user_prompt().to_string();
        self.calls.lock().unwrap().push(call);

        match &self.behavior {
            Behavior::Scripted(responses) => Ok(responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| "Default mock response".to_string())),
            Behavior::Fixed(answer) => Ok(answer.clone()),
            Behavior::Failing { status, body } => Err(ProviderError::Api {
                status: *status,
                body: body.clone(),
            }),
            Behavior::Requiring { needle, answer } => {
                if user_prompt.contains(needle.as_str()) {
                    Ok(answer.clone())
                } else {
                    Err(ProviderError::Api {
                        status: 400,
                        body: format!("prompt did not contain '{needle}'"),
                    })
                }
            }
        }
    }
}

// --- Stub OCR Engine ---

/// An OCR engine that returns fixed text (or a fixed failure) and counts calls.
#[derive(Clone, Debug)]
pub struct StubOcrEngine {
    result: Result<String, String>,
    calls: Arc<AtomicUsize>,
}

impl StubOcrEngine {
    /// Recognizes every image as `text`.
    pub fn returning(text: &str) -> Self {
        Self {
            result: Ok(text.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fails every recognition with `OcrError::Engine(message)`.
    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OcrEngine for StubOcrEngine {
    async fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone().map_err(OcrError::Engine)
    }
}

// --- Image Fixtures ---

fn sample_image() -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_fn(8, 8, |x, y| {
        if (x + y) % 2 == 0 {
            Luma([0])
        } else {
            Luma([255])
        }
    }))
}

fn encode(format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    sample_image()
        .write_to(&mut buffer, format)
        .expect("encoding an in-memory fixture cannot fail");
    buffer.into_inner()
}

/// A small, valid PNG image.
pub fn tiny_png() -> Vec<u8> {
    encode(ImageFormat::Png)
}

/// A small, valid JPEG image.
pub fn tiny_jpeg() -> Vec<u8> {
    encode(ImageFormat::Jpeg)
}
