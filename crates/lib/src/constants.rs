//! # Shared Constants
//!
//! Defaults shared by the library and the `studytutor` CLI.

/// The model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// The OpenAI chat completions endpoint.
pub const OPENAI_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// The base URL of the Gemini REST API. Model-specific paths are appended.
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The Tesseract executable looked up on `PATH` by default.
pub const DEFAULT_TESSERACT_BINARY: &str = "tesseract";

/// The Tesseract language pack used by default.
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";

/// Seconds to wait for an external call before giving up.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
