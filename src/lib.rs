//! Chat Relay
//!
//! Backend for a browser chat client:
//! - `POST /api/chat` forwards the latest message to an OpenAI-compatible provider
//! - Layered configuration with a fail-fast credential check
//! - Structured logging and per-request tracing

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::DomainError;
use infrastructure::{
    llm::{DeepseekProvider, HttpClient},
    services::{ChatRelayService, RelaySettings},
};

/// Wire the relay from validated configuration.
///
/// Fails with a configuration error when the credential is missing or any
/// provider setting is out of range, so the server never starts half-configured.
pub fn create_app_state(config: &AppConfig) -> Result<AppState, DomainError> {
    config.validate()?;

    let provider_config = &config.provider;
    let client = HttpClient::with_timeouts(
        provider_config.timeout(),
        provider_config.connect_timeout(),
    )?;
    let provider = DeepseekProvider::with_base_url(
        client,
        provider_config.api_key()?,
        provider_config.base_url.as_str(),
    );
    let settings = RelaySettings::from_config(provider_config)?;

    tracing::info!(
        base_url = %provider_config.base_url,
        model = %settings.model,
        temperature = settings.temperature,
        max_tokens = settings.max_tokens,
        timeout_secs = provider_config.timeout_secs,
        connect_timeout_secs = provider_config.connect_timeout_secs,
        prompt_template = settings.prompt_template.is_some(),
        "Chat relay configured"
    );

    let chat_service = ChatRelayService::new(Arc::new(provider), settings);

    Ok(AppState::new(Arc::new(chat_service)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_app_state_requires_api_key() {
        let result = create_app_state(&AppConfig::default());
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_create_app_state_with_valid_config() {
        let mut config = AppConfig::default();
        config.provider.api_key = Some("sk-test".to_string());

        assert!(create_app_state(&config).is_ok());
    }
}
