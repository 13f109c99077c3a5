#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared setup for the integration tests in this crate.

use dotenvy::dotenv;
use std::sync::Once;
use studytutor::providers::{ai::CompletionProvider, ocr::OcrEngine};
use studytutor::TutorClient;

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Builds a client with a test credential around the given collaborators.
pub fn client_with(
    provider: impl CompletionProvider + 'static,
    ocr_engine: Option<Box<dyn OcrEngine>>,
) -> TutorClient {
    let mut builder = TutorClient::builder()
        .completion_provider(Box::new(provider))
        .api_key(Some("test-api-key".to_string()))
        .model("test-model");
    if let Some(engine) = ocr_engine {
        builder = builder.ocr_engine(engine);
    }
    builder.build().expect("client with a provider always builds")
}
