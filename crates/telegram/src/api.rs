//! Minimal Telegram Bot API surface: only the methods and fields the bot
//! actually reads.

use std::time::Duration;

use lana_models::{LanaError, TelegramConfig};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<TgUser>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Every Bot API response comes in this envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base: String,
    poll_timeout_s: u64,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: format!(
                "{}/bot{}",
                config.api_url.trim_end_matches('/'),
                config.token
            ),
            poll_timeout_s: config.poll_timeout_s,
        }
    }

    /// Long-poll for updates. The HTTP timeout sits above the server-side
    /// poll timeout so the server closes the request first.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, LanaError> {
        let response = self
            .http
            .post(format!("{}/getUpdates", self.base))
            .timeout(Duration::from_secs(self.poll_timeout_s + 10))
            .json(&json!({
                "offset": offset,
                "timeout": self.poll_timeout_s,
                "allowed_updates": ["message"],
            }))
            .send()
            .await?;

        let result: Option<Vec<Update>> = unwrap_response(response).await?;
        Ok(result.unwrap_or_default())
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), LanaError> {
        let response = self
            .http
            .post(format!("{}/sendMessage", self.base))
            .json(&json!({
                "chat_id": chat_id,
                "text": text,
                "parse_mode": "HTML",
                "disable_web_page_preview": true,
            }))
            .send()
            .await?;

        unwrap_response::<serde_json::Value>(response).await?;
        Ok(())
    }
}

async fn unwrap_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<Option<T>, LanaError> {
    let body: ApiResponse<T> = response.json().await?;
    if !body.ok {
        return Err(LanaError::TelegramApi {
            description: body
                .description
                .unwrap_or_else(|| "unknown error".to_string()),
        });
    }
    Ok(body.result)
}
