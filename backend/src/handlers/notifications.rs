//! Shipment notification handlers

use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::email::EmailOutcome;
use crate::services::OrderService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ShipmentNotificationRequest {
    pub order_id: Uuid,
}

/// Email the operations team about a stored shipment request
pub async fn send_shipment_notification(
    State(state): State<AppState>,
    Json(request): Json<ShipmentNotificationRequest>,
) -> AppResult<Json<EmailOutcome>> {
    let order = OrderService::new(state.db.clone()).get_order(request.order_id).await?;
    Ok(Json(state.email.send_shipment_request(&order).await))
}
