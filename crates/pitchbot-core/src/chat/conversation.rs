//! Model-side conversation handle.
//!
//! One `Conversation` is created when a session becomes active and is reused
//! for every turn, so the model sees the full history on each call.

use pitchbot_types::llm::{GenerationSettings, LlmError, Message, Usage};

use crate::llm::box_provider::BoxLlmProvider;

/// Accumulated provider-side history for a single chat.
///
/// The history always alternates user/assistant: a prompt is only kept once
/// the model has answered it.
#[derive(Debug, Clone)]
pub struct Conversation {
    settings: GenerationSettings,
    history: Vec<Message>,
    usage: Usage,
}

impl Conversation {
    /// Start an empty conversation with the given model settings.
    pub fn start(settings: GenerationSettings) -> Self {
        Self {
            settings,
            history: Vec::new(),
            usage: Usage::default(),
        }
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Number of completed user/model exchanges.
    pub fn turn_count(&self) -> usize {
        self.history.len() / 2
    }

    /// Cumulative token usage reported by the provider.
    pub fn usage(&self) -> &Usage {
        &self.usage
    }

    /// Send `prompt` with the whole history and record the model's answer.
    ///
    /// On failure the prompt is dropped again and the history is unchanged.
    pub async fn send(
        &mut self,
        provider: &BoxLlmProvider,
        prompt: impl Into<String>,
    ) -> Result<String, LlmError> {
        self.history.push(Message::user(prompt));
        let request = self.settings.request(self.history.clone());

        match provider.complete(&request).await {
            Ok(response) => {
                self.usage.input_tokens += response.usage.input_tokens;
                self.usage.output_tokens += response.usage.output_tokens;
                self.history.push(Message::assistant(response.content.clone()));
                Ok(response.content)
            }
            Err(e) => {
                self.history.pop();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedProvider;
    use pitchbot_types::llm::MessageRole;

    fn conversation() -> Conversation {
        Conversation::start(GenerationSettings {
            model: "gemini-2.5-flash".to_string(),
            max_tokens: 256,
            temperature: None,
        })
    }

    #[tokio::test]
    async fn test_send_accumulates_history() {
        let scripted = ScriptedProvider::new(vec![Ok("one".to_string()), Ok("two".to_string())]);
        let provider = BoxLlmProvider::new(scripted.clone());
        let mut conv = conversation();

        assert_eq!(conv.send(&provider, "first").await.unwrap(), "one");
        assert_eq!(conv.send(&provider, "second").await.unwrap(), "two");
        assert_eq!(conv.turn_count(), 2);

        let requests = scripted.recorded();
        assert_eq!(requests[0].messages.len(), 1);
        assert_eq!(requests[1].messages.len(), 3);
        assert_eq!(requests[1].messages[1].role, MessageRole::Assistant);
        assert_eq!(requests[1].messages[1].content, "one");
    }

    #[tokio::test]
    async fn test_failed_send_leaves_history_untouched() {
        let scripted = ScriptedProvider::new(vec![
            Ok("one".to_string()),
            Err(LlmError::Overloaded("busy".to_string())),
        ]);
        let provider = BoxLlmProvider::new(scripted);
        let mut conv = conversation();

        conv.send(&provider, "first").await.unwrap();
        let err = conv.send(&provider, "second").await.unwrap_err();
        assert!(matches!(err, LlmError::Overloaded(_)));
        assert_eq!(conv.history().len(), 2);
        assert_eq!(conv.history()[1].content, "one");
    }

    #[test]
    fn test_start_is_empty() {
        let conv = conversation();
        assert!(conv.history().is_empty());
        assert_eq!(conv.model(), "gemini-2.5-flash");
        assert_eq!(conv.usage().input_tokens, 0);
    }
}
