//! # Prompt Builder Tests
//!
//! Validates the tutoring templates in `studytutor::prompts::tutor`: output is
//! deterministic, embeds the level and question verbatim, and rejects blank
//! questions.

use studytutor::prompts::tutor::{
    build_prompt, build_prompt_with, get_level_guidance, PromptTemplates, TUTOR_SYSTEM_PROMPT,
};
use studytutor::types::Role;
use studytutor::{StudentLevel, ValidationError};

#[test]
fn test_build_prompt_is_deterministic() {
    let first = build_prompt(StudentLevel::University, "Integrate x^2 dx").unwrap();
    let second = build_prompt(StudentLevel::University, "Integrate x^2 dx").unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.user().content.as_bytes(),
        second.user().content.as_bytes()
    );
}

#[test]
fn test_build_prompt_embeds_level_and_question() {
    let messages = build_prompt(StudentLevel::School, "Solve 2x + 5 = 15").unwrap();
    let user = &messages.user().content;
    assert!(user.contains("School"));
    assert!(user.contains("Solve 2x + 5 = 15"));
}

#[test]
fn test_build_prompt_has_system_then_user() {
    let messages = build_prompt(StudentLevel::School, "What is a noun?").unwrap();
    let roles: Vec<Role> = messages.as_slice().iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::System, Role::User]);
    assert_eq!(messages.system().content, TUTOR_SYSTEM_PROMPT);
}

#[test]
fn test_build_prompt_default_layout() {
    let messages = build_prompt(StudentLevel::University, "What is 7*8?").unwrap();
    let expected = format!(
        "Student level: University\n\nRules:\n- Use very simple language\n- Be clear and short\n- Explain step by step if needed\n- {}\n\nQuestion:\nWhat is 7*8?",
        get_level_guidance(StudentLevel::University)
    );
    assert_eq!(messages.user().content, expected);
}

#[test]
fn test_build_prompt_levels_differ() {
    let school = build_prompt(StudentLevel::School, "Why is the sky blue?").unwrap();
    let university = build_prompt(StudentLevel::University, "Why is the sky blue?").unwrap();
    assert_ne!(school.user().content, university.user().content);
}

/// Placeholder-like text inside a question must survive substitution.
#[test]
fn test_build_prompt_keeps_placeholder_text_in_question() {
    let question = "Explain what {level} and {question} mean in this template";
    let messages = build_prompt(StudentLevel::School, question).unwrap();
    assert!(messages.user().content.contains(question));
}

#[test]
fn test_build_prompt_rejects_blank_question() {
    assert_eq!(
        build_prompt(StudentLevel::School, ""),
        Err(ValidationError::EmptyQuestion)
    );
    assert_eq!(
        build_prompt(StudentLevel::University, " \n\t"),
        Err(ValidationError::EmptyQuestion)
    );
}

#[test]
fn test_build_prompt_with_custom_templates() {
    let templates = PromptTemplates {
        system: "You are a chemistry tutor.".to_string(),
        user: "[{level}] {question}".to_string(),
    };
    let messages = build_prompt_with(&templates, StudentLevel::School, "What is H2O?").unwrap();
    assert_eq!(messages.system().content, "You are a chemistry tutor.");
    assert_eq!(messages.user().content, "[School] What is H2O?");
}

#[test]
fn test_template_overrides_fall_back_on_blank_values() {
    let templates = PromptTemplates::with_overrides(Some("  "), Some("{question}"));
    assert_eq!(templates.system, TUTOR_SYSTEM_PROMPT);
    assert_eq!(templates.user, "{question}");

    assert_eq!(
        PromptTemplates::with_overrides(None, None),
        PromptTemplates::default()
    );
}
