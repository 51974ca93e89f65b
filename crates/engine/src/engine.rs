use std::sync::Arc;

use chrono::Utc;
use lana_models::{ChatConfig, ChatMessage, ChatRole, Config, LanaError};
use lana_store::Store;
use tracing::{error, info};

use crate::openai::OpenAiProvider;
use crate::persona;
use crate::provider::{ReplyProvider, StubProvider};

/// What a transport should deliver back to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Reply(String),
    /// Daily free quota exhausted; the message was neither stored nor
    /// counted.
    Paywalled(String),
}

impl Outcome {
    pub fn text(&self) -> &str {
        match self {
            Outcome::Reply(t) | Outcome::Paywalled(t) => t,
        }
    }
}

/// Transport-agnostic chat core shared by the Telegram poller and the
/// local sandbox.
pub struct ChatEngine {
    store: Store,
    provider: Arc<dyn ReplyProvider>,
    chat: ChatConfig,
}

impl ChatEngine {
    pub fn new(store: Store, provider: Arc<dyn ReplyProvider>, chat: ChatConfig) -> Self {
        Self {
            store,
            provider,
            chat,
        }
    }

    /// Pick the OpenAI provider when a key is configured, the stub
    /// otherwise.
    pub fn from_config(store: Store, config: &Config) -> Self {
        let provider: Arc<dyn ReplyProvider> = if config.openai.api_key.is_empty() {
            info!("OPENAI_API_KEY not set - replies use the stub provider");
            Arc::new(StubProvider)
        } else {
            Arc::new(OpenAiProvider::new(&config.openai))
        };
        Self::new(store, provider, config.chat.clone())
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn free_per_day(&self) -> u32 {
        self.chat.free_messages_per_day
    }

    fn keep_rows(&self) -> i64 {
        i64::from(self.chat.history_turns) * 2
    }

    /// `/start`: make sure the user row exists and greet.
    pub async fn greet(
        &self,
        user_id: i64,
        username: Option<&str>,
    ) -> Result<String, LanaError> {
        let today = Utc::now().date_naive();
        self.store.ensure_user(user_id, username, today).await?;
        Ok(persona::greeting(self.chat.free_messages_per_day))
    }

    /// The main text path: quota gate, prompt assembly, reply, persist.
    ///
    /// A provider failure is downgraded to the canned glitch apology so
    /// the conversation keeps flowing; storage failures propagate.
    pub async fn handle_message(
        &self,
        user_id: i64,
        username: Option<&str>,
        text: &str,
    ) -> Result<Outcome, LanaError> {
        let today = Utc::now().date_naive();
        let profile = self.store.ensure_user(user_id, username, today).await?;
        if profile.messages_today >= i64::from(self.chat.free_messages_per_day) {
            return Ok(Outcome::Paywalled(persona::paywall_text().to_string()));
        }

        let keep = self.keep_rows();
        self.store
            .append(user_id, ChatRole::User, text, keep)
            .await?;

        let mut messages = vec![ChatMessage::system(persona::SYSTEM_PROMPT)];
        if let Some(name) = username {
            messages.push(ChatMessage::system(format!(
                "User telegram username is @{name}."
            )));
        }
        // History already ends with the message stored above.
        messages.extend(self.store.history(user_id).await?);

        let reply = match self.provider.complete(&messages).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Reply provider failed: {e}");
                persona::GLITCH_REPLY.to_string()
            }
        };

        self.store
            .append(user_id, ChatRole::Assistant, &reply, keep)
            .await?;
        self.store.count_message(user_id).await?;
        Ok(Outcome::Reply(reply))
    }

    /// `/reset`: drop the user's stored context.
    pub async fn reset(&self, user_id: i64) -> Result<String, LanaError> {
        self.store.clear_history(user_id).await?;
        Ok(persona::RESET_DONE.to_string())
    }

    /// `/stats`: remaining free messages for today.
    pub async fn stats(
        &self,
        user_id: i64,
        username: Option<&str>,
    ) -> Result<String, LanaError> {
        let today = Utc::now().date_naive();
        let profile = self.store.ensure_user(user_id, username, today).await?;
        let limit = self.chat.free_messages_per_day;
        let left = (i64::from(limit) - profile.messages_today).max(0);
        Ok(persona::stats_text(left, limit))
    }
}
