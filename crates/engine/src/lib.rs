pub mod engine;
pub mod openai;
pub mod persona;
pub mod provider;

pub use engine::{ChatEngine, Outcome};
pub use openai::OpenAiProvider;
pub use provider::{ReplyProvider, StubProvider};
