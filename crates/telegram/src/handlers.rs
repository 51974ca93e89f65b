use std::sync::Arc;

use lana_engine::{persona, ChatEngine, Outcome};
use lana_models::LanaError;
use tracing::{debug, error};

use crate::api::{TelegramClient, Update};

/// Commands the bot answers. Anything else starting with `/` is ignored,
/// matching the original handler filters.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Start,
    Help,
    Reset,
    Stats,
    Text(&'a str),
    Unknown,
}

pub fn parse_command(text: &str) -> Command<'_> {
    let trimmed = text.trim();
    if !trimmed.starts_with('/') {
        return Command::Text(trimmed);
    }
    // "/start@LanaBot extra" -> "/start"
    let head = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .split('@')
        .next()
        .unwrap_or(trimmed);
    match head {
        "/start" => Command::Start,
        "/help" => Command::Help,
        "/reset" => Command::Reset,
        "/stats" => Command::Stats,
        _ => Command::Unknown,
    }
}

/// Routes one update through the engine and sends the reply. Failures are
/// logged and answered with an apology; the poll loop never sees them.
pub struct UpdateHandler {
    client: TelegramClient,
    engine: Arc<ChatEngine>,
}

impl UpdateHandler {
    pub fn new(client: TelegramClient, engine: Arc<ChatEngine>) -> Self {
        Self { client, engine }
    }

    pub async fn handle(&self, update: Update) {
        let Some(message) = update.message else {
            return;
        };
        let Some(text) = message.text.clone() else {
            return;
        };
        let chat_id = message.chat.id;
        let (user_id, username) = match &message.from {
            Some(from) => (from.id, from.username.clone()),
            None => (chat_id, None),
        };

        if let Err(e) = self
            .dispatch(chat_id, user_id, username.as_deref(), &text)
            .await
        {
            error!("Update handling failed for chat {chat_id}: {e}");
            if let Err(send_err) = self
                .client
                .send_message(chat_id, persona::GENERIC_APOLOGY)
                .await
            {
                debug!("Could not deliver apology to chat {chat_id}: {send_err}");
            }
        }
    }

    async fn dispatch(
        &self,
        chat_id: i64,
        user_id: i64,
        username: Option<&str>,
        text: &str,
    ) -> Result<(), LanaError> {
        match parse_command(text) {
            Command::Start => {
                let greeting = self.engine.greet(user_id, username).await?;
                self.client.send_message(chat_id, &greeting).await
            }
            Command::Help => self.client.send_message(chat_id, persona::help_text()).await,
            Command::Reset => match self.engine.reset(user_id).await {
                Ok(confirmation) => self.client.send_message(chat_id, &confirmation).await,
                Err(e) => {
                    error!("Reset failed for user {user_id}: {e}");
                    self.client.send_message(chat_id, persona::RESET_FAILED).await
                }
            },
            Command::Stats => {
                let stats = self.engine.stats(user_id, username).await?;
                self.client.send_message(chat_id, &stats).await
            }
            Command::Text(text) => {
                match self.engine.handle_message(user_id, username, text).await {
                    Ok(Outcome::Reply(reply)) | Ok(Outcome::Paywalled(reply)) => {
                        self.client.send_message(chat_id, &reply).await
                    }
                    Err(e) => {
                        error!("Message handling failed for user {user_id}: {e}");
                        self.client
                            .send_message(chat_id, persona::STORAGE_APOLOGY)
                            .await
                    }
                }
            }
            Command::Unknown => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_commands_route() {
        assert_eq!(parse_command("/start"), Command::Start);
        assert_eq!(parse_command("/help"), Command::Help);
        assert_eq!(parse_command("/reset"), Command::Reset);
        assert_eq!(parse_command("/stats"), Command::Stats);
    }

    #[test]
    fn bot_suffix_and_arguments_are_stripped() {
        assert_eq!(parse_command("/start@LanaBot"), Command::Start);
        assert_eq!(parse_command("/stats please"), Command::Stats);
    }

    #[test]
    fn unknown_commands_are_ignored() {
        assert_eq!(parse_command("/unsubscribe"), Command::Unknown);
    }

    #[test]
    fn plain_text_is_chat() {
        assert_eq!(parse_command("  привет  "), Command::Text("привет"));
    }
}
