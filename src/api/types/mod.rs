//! Client-facing request, response, and error types

pub mod error;
pub mod json;

pub use crate::domain::chat::{ChatMessage, ChatRequest, ChatResponse};
pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
