//! Assistant tool handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppResult;
use crate::services::assistant::{
    detect_cargo_conversation, detect_cargo_message, tool_definitions, AssistantService, CargoDetection,
    ChatMessage,
};
use crate::services::pricing::PricingResponse;
use crate::AppState;

/// Either a single message or a transcript
#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    pub message: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// Tool definitions for the LLM loop
pub async fn list_tools() -> Json<Value> {
    Json(tool_definitions())
}

/// Execute one tool call
pub async fn call_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(arguments): Json<Value>,
) -> AppResult<Json<PricingResponse>> {
    let service = AssistantService::new(state.pricing.clone());
    Ok(Json(service.dispatch(&name, arguments)?))
}

/// Whether a message or conversation is a shipping enquiry
pub async fn detect_cargo(Json(request): Json<DetectRequest>) -> Json<CargoDetection> {
    let detection = match request.message {
        Some(message) => detect_cargo_message(&message),
        None => detect_cargo_conversation(&request.messages),
    };
    Json(detection)
}
