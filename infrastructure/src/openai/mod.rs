//! Chat-completions adapter for the LLM gateway port

mod gateway;
mod protocol;

pub use gateway::{ChatBackendConfig, OpenAiGateway};
