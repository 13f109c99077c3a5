//! # Configuration Tests
//!
//! This file contains tests for the configuration loading logic.
//! Since `studytutor-cli` is a binary crate, we can't directly import
//! the `config` module. Instead, we include the source file directly
//! for testing purposes.

#[path = "../src/config.rs"]
#[allow(dead_code)]
mod config;

use self::config::{get_config, ConfigError, OcrEngineKind};
use std::env;
use studytutor::providers::factory::ProviderKind;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Environment variables are process-global, so tests touching them run one
// at a time.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Clears every environment variable `get_config` reads.
fn clear_env_vars() {
    for (key, _) in env::vars() {
        if key.starts_with("STUDYTUTOR_") {
            env::remove_var(key);
        }
    }
    env::remove_var("OPENAI_API_KEY");
    env::remove_var("GEMINI_API_KEY");
    env::remove_var("TEST_TUTOR_KEY");
}

fn write_yaml(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yml")
        .tempfile()
        .expect("Failed to create temp config");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp config");
    file
}

#[test]
fn test_get_config_defaults() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env_vars();

    let config = get_config(None).expect("Defaults should load");

    assert_eq!(config.provider, "openai");
    assert_eq!(config.model, "gpt-4o-mini");
    assert_eq!(config.api_key, None);
    assert_eq!(config.api_url, None);
    assert_eq!(config.request_timeout_secs, 60);
    assert_eq!(config.ocr.engine, OcrEngineKind::Tesseract);
    assert_eq!(config.ocr.binary, "tesseract");
    assert_eq!(config.ocr.language, "eng");
    assert!(config.prompts.system_prompt.is_none());
}

#[test]
fn test_get_config_reads_openai_key_fallback() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env_vars();
    env::set_var("OPENAI_API_KEY", "sk-from-env");

    let config = get_config(None).unwrap();
    assert_eq!(config.api_key, Some("sk-from-env".to_string()));

    clear_env_vars();
}

#[test]
fn test_get_config_blank_key_is_missing() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env_vars();
    env::set_var("OPENAI_API_KEY", "   ");

    let config = get_config(None).unwrap();
    assert_eq!(config.api_key, None);

    clear_env_vars();
}

#[test]
fn test_get_config_from_yaml_with_substitution() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env_vars();
    env::set_var("TEST_TUTOR_KEY", "gm-substituted");

    let file = write_yaml(
        r#"
provider: gemini
api_key: ${TEST_TUTOR_KEY}
model: gemini-2.0-flash
request_timeout_secs: 15
ocr:
  engine: vision
  model: gemini-2.0-flash
prompts:
  system_prompt: "You are a patient physics tutor."
"#,
    );

    let config = get_config(file.path().to_str()).unwrap();

    assert_eq!(config.provider, "gemini");
    assert_eq!(config.api_key, Some("gm-substituted".to_string()));
    assert_eq!(config.model, "gemini-2.0-flash");
    assert_eq!(config.request_timeout_secs, 15);
    assert_eq!(config.ocr.engine, OcrEngineKind::Vision);
    assert_eq!(config.ocr.language, "eng");
    assert_eq!(
        config.prompts.system_prompt.as_deref(),
        Some("You are a patient physics tutor.")
    );
    assert!(config.prompts.user_prompt.is_none());

    clear_env_vars();
}

#[test]
fn test_get_config_gemini_key_fallback() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env_vars();
    env::set_var("GEMINI_API_KEY", "gm-from-env");
    env::set_var("OPENAI_API_KEY", "sk-should-not-be-used");

    let file = write_yaml("provider: gemini\n");
    let config = get_config(file.path().to_str()).unwrap();

    assert_eq!(config.api_key, Some("gm-from-env".to_string()));

    clear_env_vars();
}

#[test]
fn test_get_config_blank_provider_follows_model() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env_vars();
    env::set_var("GEMINI_API_KEY", "gm-from-env");
    env::set_var("OPENAI_API_KEY", "sk-should-not-be-used");

    let file = write_yaml("provider: \"\"\nmodel: gemini-2.0-flash\n");
    let config = get_config(file.path().to_str()).unwrap();

    assert_eq!(config.provider, "gemini");
    assert_eq!(config.provider_kind().unwrap(), ProviderKind::Gemini);
    assert_eq!(config.api_key, Some("gm-from-env".to_string()));

    clear_env_vars();
}

#[test]
fn test_get_config_unknown_provider() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env_vars();

    let file = write_yaml("provider: claude-local\n");
    let result = get_config(file.path().to_str());

    assert!(matches!(result, Err(ConfigError::General(_))));
}

#[test]
fn test_get_config_env_overrides_file() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env_vars();
    env::set_var("STUDYTUTOR_MODEL", "gpt-4o");
    env::set_var("STUDYTUTOR_OCR__LANGUAGE", "deu");
    env::set_var("STUDYTUTOR_API_KEY", "sk-prefixed");

    let file = write_yaml("model: gpt-4o-mini\nocr:\n  language: eng\n");
    let config = get_config(file.path().to_str()).unwrap();

    assert_eq!(config.model, "gpt-4o");
    assert_eq!(config.ocr.language, "deu");
    assert_eq!(config.api_key, Some("sk-prefixed".to_string()));

    clear_env_vars();
}

#[test]
fn test_get_config_missing_explicit_file() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env_vars();

    let result = get_config(Some("/nonexistent/studytutor/config.yml"));

    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_get_config_invalid_ocr_engine() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env_vars();

    let file = write_yaml("ocr:\n  engine: paddle\n");
    let result = get_config(file.path().to_str());

    assert!(matches!(result, Err(ConfigError::General(_))));
}
