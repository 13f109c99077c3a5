//! # Tutor Request Dispatcher
//!
//! Sends a built conversation to the configured completion provider and turns
//! the reply into a `TutorAnswer`. The credential is resolved once, when the
//! dispatcher is created, and checked before any request goes out.

use crate::{
    errors::DispatchError,
    providers::ai::{CompletionProvider, CompletionRequest},
    types::{ApiKey, PromptMessages, TutorAnswer},
};
use std::fmt;
use tracing::{debug, info, instrument, warn};

pub struct Dispatcher {
    provider: Box<dyn CompletionProvider>,
    credential: Option<ApiKey>,
    model: String,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("provider", &self.provider)
            .field("has_credential", &self.credential.is_some())
            .field("model", &self.model)
            .finish()
    }
}

impl Dispatcher {
    /// Creates a dispatcher. A `None` or blank `credential` is recorded as
    /// missing.
    pub fn new(
        provider: Box<dyn CompletionProvider>,
        credential: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            credential: ApiKey::new(credential),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Fails with `AuthMissing` when no credential was configured.
    pub fn ensure_credential(&self) -> Result<&ApiKey, DispatchError> {
        self.credential.as_ref().ok_or(DispatchError::AuthMissing)
    }

    /// Sends `messages` to the provider and returns its answer unmodified.
    ///
    /// Makes exactly one attempt. Without a credential the provider is never
    /// called.
    #[instrument(skip_all, fields(model = %self.model))]
    pub async fn dispatch(&self, messages: &PromptMessages) -> Result<TutorAnswer, DispatchError> {
        let api_key = self.ensure_credential()?;

        debug!(
            system_prompt = %messages.system().content,
            user_prompt = %messages.user().content,
            "--> Sending prompts to completion provider"
        );

        let text = self
            .provider
            .complete(CompletionRequest {
                model: &self.model,
                api_key: api_key.expose(),
                messages: messages.as_slice(),
            })
            .await
            .inspect_err(|e| warn!("Completion provider failed: {e}"))?;

        info!(chars = text.chars().count(), "<-- Answer received");
        Ok(TutorAnswer { text })
    }
}
