//! Client-facing chat contract

mod entity;

pub use entity::{ChatMessage, ChatRequest, ChatResponse};
