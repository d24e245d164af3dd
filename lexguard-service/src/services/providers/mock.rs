//! Mock provider for tests and local development.

use super::{CompletionProvider, ProviderError};
use crate::prompts::PromptPair;
use async_trait::async_trait;
use std::sync::Mutex;

enum Behavior {
    Echo,
    Fixed(String),
    Fail(ProviderError),
}

/// In-memory provider that records every prompt it is asked to complete,
/// unless built with [`MockProvider::without_recording`].
pub struct MockProvider {
    behavior: Behavior,
    record: bool,
    calls: Mutex<Vec<PromptPair>>,
}

impl MockProvider {
    /// Replies with `Mock response for: <user prompt>`.
    pub fn echo() -> Self {
        Self::with_behavior(Behavior::Echo)
    }

    pub fn with_response(text: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Fixed(text.into()))
    }

    pub fn failing(error: ProviderError) -> Self {
        Self::with_behavior(Behavior::Fail(error))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            record: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Stop keeping a call log. Used when the mock serves real traffic.
    pub fn without_recording(mut self) -> Self {
        self.record = false;
        self
    }

    /// Prompts received so far, oldest first.
    pub fn calls(&self) -> Vec<PromptPair> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, prompt: &PromptPair) -> Result<String, ProviderError> {
        if self.record {
            self.calls
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(prompt.clone());
        }

        match &self.behavior {
            Behavior::Echo => Ok(format!("Mock response for: {}", prompt.user)),
            Behavior::Fixed(text) => Ok(text.clone()),
            Behavior::Fail(err) => Err(err.clone()),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}
