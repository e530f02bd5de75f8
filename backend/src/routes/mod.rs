//! Route definitions for the Shipquote API

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Pricing functions, also reachable through the assistant tools
        .nest("/functions", function_routes())
        .nest("/assistant", assistant_routes())
        .nest("/orders", order_routes())
        .route("/notifications/shipment", post(handlers::send_shipment_notification))
}

/// Cargo pricing functions
fn function_routes() -> Router<AppState> {
    Router::new()
        .route("/cargo_pricing", get(handlers::cargo_pricing))
        .route("/cargo_multi_pricing", get(handlers::cargo_multi_pricing))
        .route("/cargo_draft_pricing", get(handlers::cargo_draft_pricing))
        .route("/cargo_mixed_pricing", post(handlers::cargo_mixed_pricing))
        .route("/admissibility", get(handlers::check_admissibility))
        .route("/region", get(handlers::region_for))
}

/// Assistant tool definitions and dispatch
fn assistant_routes() -> Router<AppState> {
    Router::new()
        .route("/tools", get(handlers::list_tools))
        .route("/tools/:name", post(handlers::call_tool))
        .route("/detect", post(handlers::detect_cargo))
}

/// Order management routes
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::create_order))
        .route("/stats", get(handlers::order_stats))
        .route("/:id", get(handlers::get_order).put(handlers::update_order))
        .route("/:id/status", patch(handlers::update_order_status))
}
