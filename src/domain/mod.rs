//! Domain layer - Core business logic and entities

pub mod chat;
pub mod error;
pub mod llm;
pub mod prompt;

pub use chat::{ChatMessage, ChatRequest, ChatResponse};
pub use error::DomainError;
pub use llm::{
    FinishReason, LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse, Message, MessageRole,
    Usage,
};
pub use prompt::{PromptTemplate, TemplateError};
