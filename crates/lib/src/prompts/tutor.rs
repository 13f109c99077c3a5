//! # Tutoring Prompt Templates
//!
//! The default system and user templates used to ask a completion provider for
//! a homework explanation, plus the functions that fill them in. Both templates
//! can be replaced at runtime through `PromptTemplates`.

use crate::{
    errors::ValidationError,
    types::{PromptMessages, StudentLevel},
};

/// The default system prompt. Fixes the tutoring persona.
pub const TUTOR_SYSTEM_PROMPT: &str = "You are an AI tutor. You help students understand homework. Explain simply, step by step when appropriate.";

/// The default user prompt.
///
/// Placeholders: `{level}`, `{level_guidance}`, `{question}`
pub const TUTOR_USER_PROMPT: &str = r#"Student level: {level}

Rules:
- Use very simple language
- Be clear and short
- Explain step by step if needed
- {level_guidance}

Question:
{question}"#;

/// Returns a one-line hint that adjusts the answer to the student's level.
pub fn get_level_guidance(level: StudentLevel) -> &'static str {
    match level {
        StudentLevel::School => {
            "Avoid technical terms and use everyday examples a school student knows"
        }
        StudentLevel::University => {
            "Use correct technical terms, but define any that are not standard"
        }
    }
}

/// A pair of system and user templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplates {
    pub system: String,
    pub user: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            system: TUTOR_SYSTEM_PROMPT.to_string(),
            user: TUTOR_USER_PROMPT.to_string(),
        }
    }
}

impl PromptTemplates {
    /// Builds templates from optional overrides, falling back to the defaults
    /// for anything unset or blank.
    pub fn with_overrides(system: Option<&str>, user: Option<&str>) -> Self {
        let defaults = Self::default();
        let pick = |value: Option<&str>, fallback: String| {
            value
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
                .unwrap_or(fallback)
        };
        Self {
            system: pick(system, defaults.system),
            user: pick(user, defaults.user),
        }
    }
}

/// Builds the tutoring conversation from the default templates.
pub fn build_prompt(
    level: StudentLevel,
    question: &str,
) -> Result<PromptMessages, ValidationError> {
    build_prompt_with(&PromptTemplates::default(), level, question)
}

/// Builds the tutoring conversation from the given templates.
///
/// The question is embedded verbatim. `{question}` is substituted last so
/// placeholder-like text inside the question is never rewritten.
pub fn build_prompt_with(
    templates: &PromptTemplates,
    level: StudentLevel,
    question: &str,
) -> Result<PromptMessages, ValidationError> {
    if question.trim().is_empty() {
        return Err(ValidationError::EmptyQuestion);
    }

    let user = templates
        .user
        .replace("{level_guidance}", get_level_guidance(level))
        .replace("{level}", level.as_str())
        .replace("{question}", question);

    Ok(PromptMessages::new(templates.system.clone(), user))
}
