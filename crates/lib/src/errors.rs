use thiserror::Error;

/// Errors raised when local input checks fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Question text is empty or only whitespace")]
    EmptyQuestion,
}

/// Errors raised by an OCR engine while recognizing a decoded image.
#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Failed to launch OCR engine: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("Failed to stage image for OCR engine: {0}")]
    Stage(String),
    #[error("OCR engine exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },
    #[error("OCR engine error: {0}")]
    Engine(String),
}

/// Errors raised by the OCR adapter.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Unsupported or undecodable image data: {0}")]
    UnsupportedFormat(String),
    #[error("OCR engine failed: {0}")]
    EngineFailure(#[from] OcrError),
}

/// Errors raised by a completion provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to build Reqwest client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Failed to send request to completion provider: {0}")]
    Request(reqwest::Error),
    #[error("Failed to deserialize completion provider response: {0}")]
    Deserialization(reqwest::Error),
    #[error("Completion provider returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Completion provider response contained no message content")]
    MissingContent,
    #[error("Unsupported completion provider: {0}")]
    UnsupportedProvider(String),
}

/// Errors raised by the tutor request dispatcher.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("API key is missing")]
    AuthMissing,
    #[error("Answer generation failed: {0}")]
    Provider(#[from] ProviderError),
}

/// The umbrella error returned by `TutorClient` operations.
#[derive(Error, Debug)]
pub enum TutorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("No completion provider was configured")]
    MissingProvider,
    #[error("No OCR engine was configured")]
    MissingOcrEngine,
}

impl TutorError {
    /// A short, human-readable description suitable for showing to a student.
    ///
    /// The underlying cause stays available through `Display` and `source()`
    /// for diagnostics.
    pub fn user_message(&self) -> &'static str {
        match self {
            TutorError::Validation(ValidationError::EmptyQuestion) => "Please enter a question",
            TutorError::Extraction(_) | TutorError::MissingOcrEngine => "Could not read the image",
            TutorError::Dispatch(DispatchError::AuthMissing) => "API key missing",
            TutorError::Dispatch(DispatchError::Provider(_)) | TutorError::MissingProvider => {
                "Answer generation failed"
            }
        }
    }

    /// Whether the error blocks every request rather than just this one.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TutorError::Dispatch(DispatchError::AuthMissing) | TutorError::MissingProvider
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_follow_error_category() {
        let empty: TutorError = ValidationError::EmptyQuestion.into();
        assert_eq!(empty.user_message(), "Please enter a question");
        assert!(!empty.is_fatal());

        let unreadable: TutorError =
            ExtractionError::UnsupportedFormat("not an image".to_string()).into();
        assert_eq!(unreadable.user_message(), "Could not read the image");

        let auth: TutorError = DispatchError::AuthMissing.into();
        assert_eq!(auth.user_message(), "API key missing");
        assert!(auth.is_fatal());

        let provider: TutorError = DispatchError::from(ProviderError::MissingContent).into();
        assert_eq!(provider.user_message(), "Answer generation failed");
        assert!(!provider.is_fatal());
    }

    #[test]
    fn provider_cause_is_kept_in_display() {
        let err: TutorError = DispatchError::from(ProviderError::Api {
            status: 429,
            body: "rate limited".to_string(),
        })
        .into();
        let rendered = err.to_string();
        assert!(rendered.contains("429"));
        assert!(rendered.contains("rate limited"));
    }
}
