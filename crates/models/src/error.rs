use thiserror::Error;

#[derive(Error, Debug)]
pub enum LanaError {
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    #[error("Database error: {reason}")]
    Database { reason: String },

    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API error: {description}")]
    TelegramApi { description: String },

    #[error("Chat completion failed: {reason}")]
    Completion { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
