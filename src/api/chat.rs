//! Chat relay endpoint handler

use axum::{extract::State, routing::post, Extension, Router};
use tracing::{error, info, warn};

use crate::api::middleware::RequestId;
use crate::api::state::AppState;
use crate::api::types::{ApiError, ChatRequest, ChatResponse, Json};

/// Create the `/api` router
pub fn create_chat_router() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    info!(
        request_id = %request_id,
        messages = request.messages.len(),
        "Processing chat request"
    );

    match state.chat_service.handle(request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) if e.is_client_error() => {
            warn!(request_id = %request_id, error = %e, "Rejected chat request");
            Err(ApiError::from(e))
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Error processing chat request");
            Err(ApiError::from(e))
        }
    }
}
