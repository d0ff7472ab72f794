//! Scripted in-memory provider used by core tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use secrecy::{ExposeSecret, SecretString};

use pitchbot_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

use super::box_provider::BoxLlmProvider;
use super::provider::{LlmProvider, ProviderFactory};

/// Provider that pops scripted replies and records every request it sees.
#[derive(Clone, Default)]
pub(crate) struct ScriptedProvider {
    replies: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            requests: Arc::default(),
        }
    }

    pub fn push(&self, reply: Result<String, LlmError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn recorded(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyResponse))?;
        Ok(CompletionResponse {
            content: next,
            model: request.model.clone(),
            finish_reason: Some("STOP".to_string()),
            usage: Usage::default(),
        })
    }
}

/// Factory handing out clones of one scripted provider.
#[derive(Clone, Default)]
pub(crate) struct ScriptedFactory {
    pub provider: ScriptedProvider,
    pub keys: Arc<Mutex<Vec<String>>>,
}

impl ScriptedFactory {
    pub fn new(provider: ScriptedProvider) -> Self {
        Self {
            provider,
            keys: Arc::default(),
        }
    }
}

impl ProviderFactory for ScriptedFactory {
    fn create(&self, api_key: &SecretString) -> Result<BoxLlmProvider, LlmError> {
        self.keys.lock().unwrap().push(api_key.expose_secret().to_string());
        Ok(BoxLlmProvider::new(self.provider.clone()))
    }
}
