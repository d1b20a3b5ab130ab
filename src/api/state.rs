//! Application state for shared services

use std::sync::Arc;

use crate::domain::{ChatRequest, ChatResponse, DomainError};
use crate::infrastructure::services::ChatRelayService;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<dyn ChatServiceTrait>,
}

impl AppState {
    pub fn new(chat_service: Arc<dyn ChatServiceTrait>) -> Self {
        Self { chat_service }
    }
}

/// Trait for the chat relay operation
#[async_trait::async_trait]
pub trait ChatServiceTrait: Send + Sync {
    async fn handle(&self, request: ChatRequest) -> Result<ChatResponse, DomainError>;
}

#[async_trait::async_trait]
impl ChatServiceTrait for ChatRelayService {
    async fn handle(&self, request: ChatRequest) -> Result<ChatResponse, DomainError> {
        ChatRelayService::handle(self, request).await
    }
}
