use std::sync::Arc;
use std::time::Duration;

use lana_engine::ChatEngine;
use lana_models::{LanaError, TelegramConfig};
use tracing::{info, warn};

use crate::api::TelegramClient;
use crate::handlers::UpdateHandler;

const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(2);

/// Long-polling loop: fetch updates, advance the offset, dispatch each
/// update. Transport errors back off and retry instead of ending the
/// loop.
pub struct Poller {
    client: TelegramClient,
    handler: UpdateHandler,
}

impl Poller {
    pub fn new(config: &TelegramConfig, engine: Arc<ChatEngine>) -> Result<Self, LanaError> {
        if config.token.is_empty() {
            return Err(LanaError::Config {
                reason: "TELEGRAM_BOT_TOKEN is missing. Set it or use --local.".to_string(),
            });
        }
        let client = TelegramClient::new(config);
        let handler = UpdateHandler::new(client.clone(), engine);
        Ok(Self { client, handler })
    }

    pub async fn run(self) {
        info!("Telegram poller started");
        let mut offset = 0i64;
        loop {
            match self.client.get_updates(offset).await {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        self.handler.handle(update).await;
                    }
                }
                Err(e) => {
                    warn!("getUpdates failed: {e}; retrying shortly");
                    tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                }
            }
        }
    }
}
