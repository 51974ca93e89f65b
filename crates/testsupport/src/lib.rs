//! Test helpers shared across the workspace: in-memory stores, canned
//! reply providers and engine constructors.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lana_engine::{ChatEngine, ReplyProvider, StubProvider};
use lana_models::{ChatConfig, ChatMessage, LanaError};
use lana_store::Store;

pub async fn memory_store() -> Store {
    let store = Store::connect_memory()
        .await
        .expect("in-memory sqlite store");
    store.migrate().await.expect("migrations");
    store
}

pub fn chat_config(free_messages_per_day: u32, history_turns: u32) -> ChatConfig {
    ChatConfig {
        free_messages_per_day,
        history_turns,
    }
}

/// Engine over a fresh in-memory store with the deterministic stub
/// provider.
pub async fn stub_engine(free_messages_per_day: u32, history_turns: u32) -> ChatEngine {
    ChatEngine::new(
        memory_store().await,
        Arc::new(StubProvider),
        chat_config(free_messages_per_day, history_turns),
    )
}

/// Replies with a fixed line and records every prompt it receives, so
/// tests can assert on prompt assembly.
pub struct RecordingProvider {
    prompts: Mutex<Vec<Vec<ChatMessage>>>,
    reply: String,
}

impl RecordingProvider {
    pub fn new(reply: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
            reply: reply.into(),
        })
    }

    pub fn prompts(&self) -> Vec<Vec<ChatMessage>> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplyProvider for RecordingProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LanaError> {
        self.prompts.lock().unwrap().push(messages.to_vec());
        Ok(self.reply.clone())
    }
}

/// Always fails, for exercising degraded-reply paths.
pub struct FailingProvider;

#[async_trait]
impl ReplyProvider for FailingProvider {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, LanaError> {
        Err(LanaError::Completion {
            reason: "provider down".to_string(),
        })
    }
}
