//! Scripted in-memory `CompletionService` for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Completion, CompletionError, CompletionParams, CompletionService};

/// Replies with queued results in order and records every call it receives.
#[derive(Default)]
pub struct FakeCompletion {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    calls: Mutex<Vec<(String, CompletionParams)>>,
}

impl FakeCompletion {
    pub fn replying(text: &str) -> Self {
        let fake = Self::default();
        fake.push_reply(text);
        fake
    }

    pub fn failing(err: CompletionError) -> Self {
        let fake = Self::default();
        fake.replies.lock().unwrap().push_back(Err(err));
        fake
    }

    pub fn push_reply(&self, text: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
    }

    pub fn calls(&self) -> Vec<(String, CompletionParams)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for FakeCompletion {
    async fn complete(
        &self,
        prompt: &str,
        params: CompletionParams,
    ) -> Result<Completion, CompletionError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), params));

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(CompletionError::EmptyChoices))?;

        Ok(Completion {
            text: reply,
            finish_reason: Some("stop".to_string()),
        })
    }
}
