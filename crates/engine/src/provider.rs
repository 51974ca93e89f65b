use async_trait::async_trait;
use lana_models::{ChatMessage, ChatRole, LanaError};

use crate::persona;

/// Produces the assistant's next reply from an assembled prompt.
#[async_trait]
pub trait ReplyProvider: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LanaError>;
}

/// Echoing fallback used when no API key is configured. Keeps the bot
/// usable in sandboxes and makes tests deterministic.
pub struct StubProvider;

#[async_trait]
impl ReplyProvider for StubProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LanaError> {
        let user_text = messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or("");
        Ok(persona::stub_reply(user_text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_echoes_last_user_message() {
        let messages = vec![
            ChatMessage::system("persona"),
            ChatMessage::user("first"),
            ChatMessage::assistant("reply"),
            ChatMessage::user("Привет, как дела?"),
        ];
        let reply = StubProvider.complete(&messages).await.unwrap();
        assert!(reply.contains("Привет, как дела?"));
    }

    #[tokio::test]
    async fn stub_handles_empty_prompt() {
        let reply = StubProvider.complete(&[]).await.unwrap();
        assert!(!reply.is_empty());
    }
}
