//! LLM provider implementations

mod deepseek;
mod http_client;

pub use deepseek::DeepseekProvider;
pub use http_client::{HttpClient, HttpClientTrait};
