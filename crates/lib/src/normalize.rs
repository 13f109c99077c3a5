//! # Text Normalizer
//!
//! Cleans freeform question text, whether typed by a student or produced by
//! an OCR engine, before it reaches the prompt builder.

/// Trims leading and trailing whitespace.
///
/// Whitespace-only input yields an empty string. OCR engines commonly end
/// their output with newlines and a form feed; both are removed here.
pub fn normalize(input: &str) -> String {
    input.trim().to_string()
}

/// Like [`normalize`], treating absent input as empty.
pub fn normalize_opt(input: Option<&str>) -> String {
    input.map(normalize).unwrap_or_default()
}
