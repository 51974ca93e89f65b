pub mod chat;
pub mod config;
pub mod error;
pub mod user;

pub use chat::*;
pub use config::*;
pub use error::*;
pub use user::*;
