//! Chat relay service - forwards the latest turn of a conversation to the provider

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::ProviderConfig;
use crate::domain::{
    ChatRequest, ChatResponse, DomainError, LlmProvider, LlmRequest, PromptTemplate,
};
use crate::infrastructure::logging::truncate_for_log;

/// Message returned when the conversation has no turns
pub const NO_MESSAGES_ERROR: &str = "No messages provided.";

const LOG_PREVIEW_LEN: usize = 500;

/// Generation settings applied to every forwarded message
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub prompt_template: Option<PromptTemplate>,
}

impl RelaySettings {
    pub fn from_config(config: &ProviderConfig) -> Result<Self, DomainError> {
        Ok(Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            prompt_template: config.prompt_template()?,
        })
    }
}

impl Default for RelaySettings {
    fn default() -> Self {
        let config = ProviderConfig::default();

        Self {
            model: config.model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            prompt_template: None,
        }
    }
}

/// Translates one client conversation into one provider call.
///
/// Only the content of the final turn is forwarded; earlier turns and all roles
/// are dropped, and the provider always sees a single user message.
pub struct ChatRelayService {
    provider: Arc<dyn LlmProvider>,
    settings: RelaySettings,
}

impl ChatRelayService {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: RelaySettings) -> Self {
        Self { provider, settings }
    }

    pub async fn handle(&self, request: ChatRequest) -> Result<ChatResponse, DomainError> {
        debug!(
            messages = request.messages.len(),
            request = ?request,
            "Received chat request"
        );

        let last_message = request
            .last_message()
            .ok_or_else(|| DomainError::validation(NO_MESSAGES_ERROR))?;

        debug!(
            role = %last_message.role,
            message = %truncate_for_log(&last_message.content, LOG_PREVIEW_LEN),
            "Processing message"
        );

        let prompt = self.render_prompt(&last_message.content)?;
        let llm_request = LlmRequest::builder()
            .user(prompt)
            .max_tokens(self.settings.max_tokens)
            .temperature(self.settings.temperature)
            .build();

        let response = self.provider.chat(&self.settings.model, llm_request).await?;

        info!(
            provider = self.provider.provider_name(),
            model = %self.settings.model,
            response_id = %response.id,
            finish_reason = ?response.finish_reason,
            completion_tokens = response.usage.as_ref().map(|u| u.completion_tokens),
            response_len = response.content().len(),
            "Provider call completed"
        );
        debug!(
            response = %truncate_for_log(response.content(), LOG_PREVIEW_LEN),
            "Final extracted response"
        );

        Ok(ChatResponse::new(response.content()))
    }

    fn render_prompt(&self, message: &str) -> Result<String, DomainError> {
        let Some(template) = &self.settings.prompt_template else {
            return Ok(message.to_string());
        };

        let mut values = HashMap::new();
        values.insert("message".to_string(), message.to_string());

        template
            .render(&values)
            .map_err(|e| DomainError::internal(format!("Failed to render prompt: {}", e)))
    }
}
