//! Order management HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::services::orders::{CreateOrderInput, ListOrdersQuery, OrderService, UpdateOrderInput, UpdateStatusInput};
use crate::AppState;

/// List orders with search, status filter and pagination
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> impl IntoResponse {
    let service = OrderService::new(state.db.clone());

    match service.list_orders(query).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a specific order
pub async fn get_order(State(state): State<AppState>, Path(order_id): Path<Uuid>) -> impl IntoResponse {
    let service = OrderService::new(state.db.clone());

    match service.get_order(order_id).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Store a shipment request submitted through the form
pub async fn create_order(
    State(state): State<AppState>,
    Json(input): Json<CreateOrderInput>,
) -> impl IntoResponse {
    let service = OrderService::new(state.db.clone());

    match service.create_order(input).await {
        Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update order fields
pub async fn update_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<UpdateOrderInput>,
) -> impl IntoResponse {
    let service = OrderService::new(state.db.clone());

    match service.update_order(order_id, input).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Change an order's status
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<UpdateStatusInput>,
) -> impl IntoResponse {
    let service = OrderService::new(state.db.clone());

    match service.update_status(order_id, input).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Dashboard statistics
pub async fn order_stats(State(state): State<AppState>) -> impl IntoResponse {
    let service = OrderService::new(state.db.clone());

    match service.stats().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => e.into_response(),
    }
}
