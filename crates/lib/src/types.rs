use crate::{
    constants::DEFAULT_MODEL,
    dispatch::Dispatcher,
    errors::{TutorError, ValidationError},
    normalize::normalize,
    prompts::tutor::PromptTemplates,
    providers::{ai::CompletionProvider, ocr::OcrEngine},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How advanced the student is. Only used to adjust the tone of the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentLevel {
    #[default]
    School,
    University,
}

impl StudentLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentLevel::School => "School",
            StudentLevel::University => "University",
        }
    }
}

impl fmt::Display for StudentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudentLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "school" => Ok(StudentLevel::School),
            "university" => Ok(StudentLevel::University),
            other => Err(format!(
                "unknown student level '{other}', expected 'school' or 'university'"
            )),
        }
    }
}

/// A validated tutoring request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorRequest {
    level: StudentLevel,
    question: String,
}

impl TutorRequest {
    /// Normalizes `question` and rejects it if nothing is left.
    pub fn new(level: StudentLevel, question: &str) -> Result<Self, ValidationError> {
        let question = normalize(question);
        if question.is_empty() {
            return Err(ValidationError::EmptyQuestion);
        }
        Ok(Self { level, question })
    }

    pub fn level(&self) -> StudentLevel {
        self.level
    }

    pub fn question(&self) -> &str {
        &self.question
    }
}

/// The generated answer for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TutorAnswer {
    pub text: String,
}

/// Text suggested by the OCR adapter. Callers may edit it before asking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub raw_text: String,
}

/// The author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// The fixed two-message conversation sent for every tutoring request:
/// the system persona first, then the user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessages {
    messages: [ChatMessage; 2],
}

impl PromptMessages {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: [ChatMessage::system(system), ChatMessage::user(user)],
        }
    }

    pub fn system(&self) -> &ChatMessage {
        &self.messages[0]
    }

    pub fn user(&self) -> &ChatMessage {
        &self.messages[1]
    }

    pub fn as_slice(&self) -> &[ChatMessage] {
        &self.messages
    }
}

/// An API credential. Its `Debug` output never shows the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for absent or blank keys.
    pub fn new(raw: Option<String>) -> Option<Self> {
        raw.map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .map(Self)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Runs the full tutoring pipeline: OCR, prompt building and dispatch.
pub struct TutorClient {
    pub(crate) dispatcher: Dispatcher,
    pub(crate) ocr_engine: Option<Box<dyn OcrEngine>>,
    pub(crate) templates: PromptTemplates,
}

impl fmt::Debug for TutorClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TutorClient")
            .field("dispatcher", &self.dispatcher)
            .field("ocr_engine", &self.ocr_engine)
            .finish_non_exhaustive()
    }
}

/// A builder for creating `TutorClient` instances.
#[derive(Default)]
pub struct TutorClientBuilder {
    completion_provider: Option<Box<dyn CompletionProvider>>,
    api_key: Option<String>,
    model: Option<String>,
    ocr_engine: Option<Box<dyn OcrEngine>>,
    templates: Option<PromptTemplates>,
}

impl TutorClientBuilder {
    /// Creates a new `TutorClientBuilder`.
    ///
    /// # Examples
    ///
    /// ```
    /// use studytutor::TutorClientBuilder;
    ///
    /// let builder = TutorClientBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the completion provider used to generate answers.
    pub fn completion_provider(mut self, provider: Box<dyn CompletionProvider>) -> Self {
        self.completion_provider = Some(provider);
        self
    }

    /// Sets the API credential. `None` or a blank key leaves the client
    /// without a credential, and every dispatch fails with `AuthMissing`.
    pub fn api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Sets the model identifier. Defaults to `DEFAULT_MODEL`.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the OCR engine used for image questions.
    pub fn ocr_engine(mut self, engine: Box<dyn OcrEngine>) -> Self {
        self.ocr_engine = Some(engine);
        self
    }

    /// Overrides the default prompt templates.
    pub fn templates(mut self, templates: PromptTemplates) -> Self {
        self.templates = Some(templates);
        self
    }

    /// Builds the `TutorClient`.
    ///
    /// Fails only when no completion provider was set. A missing credential
    /// is not a build error; it is reported by `TutorClient::ensure_ready`
    /// and by every dispatch.
    pub fn build(self) -> Result<TutorClient, TutorError> {
        let provider = self
            .completion_provider
            .ok_or(TutorError::MissingProvider)?;
        let model = self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(TutorClient {
            dispatcher: Dispatcher::new(provider, self.api_key, model),
            ocr_engine: self.ocr_engine,
            templates: self.templates.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_level_parse_and_display() {
        assert_eq!("School".parse::<StudentLevel>(), Ok(StudentLevel::School));
        assert_eq!(
            " university ".parse::<StudentLevel>(),
            Ok(StudentLevel::University)
        );
        assert!("college".parse::<StudentLevel>().is_err());
        assert_eq!(StudentLevel::University.to_string(), "University");
    }

    #[test]
    fn test_tutor_request_rejects_blank_question() {
        assert_eq!(
            TutorRequest::new(StudentLevel::School, " \n\t "),
            Err(ValidationError::EmptyQuestion)
        );
    }

    #[test]
    fn test_tutor_request_normalizes_question() {
        let request = TutorRequest::new(StudentLevel::University, "  What is 7*8?\n").unwrap();
        assert_eq!(request.question(), "What is 7*8?");
        assert_eq!(request.level(), StudentLevel::University);
    }

    #[test]
    fn test_prompt_messages_order() {
        let messages = PromptMessages::new("persona", "question");
        let roles: Vec<Role> = messages.as_slice().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User]);
        assert_eq!(messages.user().content, "question");
    }

    #[test]
    fn test_api_key_blank_is_absent_and_debug_is_redacted() {
        assert!(ApiKey::new(None).is_none());
        assert!(ApiKey::new(Some("   ".to_string())).is_none());

        let key = ApiKey::new(Some(" sk-secret ".to_string())).unwrap();
        assert_eq!(key.expose(), "sk-secret");
        assert!(!format!("{key:?}").contains("sk-secret"));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::system("hi")).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"hi"}"#);
    }

    #[test]
    fn test_builder_without_provider_fails() {
        let result = TutorClientBuilder::new()
            .api_key(Some("key".to_string()))
            .build();
        assert!(matches!(result, Err(TutorError::MissingProvider)));
    }
}
