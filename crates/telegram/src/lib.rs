pub mod api;
pub mod handlers;
pub mod poller;

pub use api::{Chat, Message, TelegramClient, TgUser, Update};
pub use handlers::UpdateHandler;
pub use poller::Poller;
