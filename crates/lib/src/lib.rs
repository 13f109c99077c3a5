//! # Homework Tutor
//!
//! This crate turns a student's homework question, typed or photographed, into
//! a tutoring answer from a chat-completion provider. The pipeline is linear:
//! optional OCR, text normalization, prompt building, then a single dispatch.

pub mod constants;
pub mod dispatch;
pub mod errors;
pub mod extract;
pub mod normalize;
pub mod prompts;
pub mod providers;
pub mod types;

pub use errors::{
    DispatchError, ExtractionError, OcrError, ProviderError, TutorError, ValidationError,
};
pub use types::{
    ExtractionResult, PromptMessages, StudentLevel, TutorAnswer, TutorClient, TutorClientBuilder,
    TutorRequest,
};

use crate::prompts::tutor::build_prompt_with;
use tracing::info;

impl TutorClient {
    /// Returns a builder for configuring a client.
    pub fn builder() -> TutorClientBuilder {
        TutorClientBuilder::new()
    }

    /// Checks that a credential is configured.
    ///
    /// Meant to be called once at start: without a credential no request can
    /// succeed, so callers should stop before collecting any input.
    pub fn ensure_ready(&self) -> Result<(), TutorError> {
        self.dispatcher.ensure_credential()?;
        Ok(())
    }

    /// The model answers are requested from.
    pub fn model(&self) -> &str {
        self.dispatcher.model()
    }

    /// Runs OCR on an uploaded image and returns the suggested question text.
    pub async fn extract_text(&self, image_bytes: &[u8]) -> Result<ExtractionResult, TutorError> {
        let engine = self
            .ocr_engine
            .as_deref()
            .ok_or(TutorError::MissingOcrEngine)?;
        Ok(extract::extract_text(engine, image_bytes).await?)
    }

    /// Builds the conversation for a question using this client's templates.
    pub fn build_prompt(
        &self,
        level: StudentLevel,
        question: &str,
    ) -> Result<PromptMessages, ValidationError> {
        build_prompt_with(&self.templates, level, question)
    }

    /// Asks for an answer to a validated request.
    pub async fn ask(&self, request: &TutorRequest) -> Result<TutorAnswer, TutorError> {
        info!(level = %request.level(), "[ask] Building tutoring prompt");
        let messages = self.build_prompt(request.level(), request.question())?;
        Ok(self.dispatcher.dispatch(&messages).await?)
    }

    /// Asks for an answer to freeform question text.
    pub async fn ask_text(
        &self,
        level: StudentLevel,
        question: &str,
    ) -> Result<TutorAnswer, TutorError> {
        let request = TutorRequest::new(level, question)?;
        self.ask(&request).await
    }

    /// Extracts the question from an image and asks for an answer to it
    /// without a manual review step.
    pub async fn ask_image(
        &self,
        level: StudentLevel,
        image_bytes: &[u8],
    ) -> Result<TutorAnswer, TutorError> {
        let extraction = self.extract_text(image_bytes).await?;
        info!("[ask_image] Submitting extracted text");
        self.ask_text(level, &extraction.raw_text).await
    }
}
