//! Infrastructure services

mod chat_relay_service;

pub use chat_relay_service::{ChatRelayService, RelaySettings, NO_MESSAGES_ERROR};
