//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;
use shared::pricing::Carrier;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub database: String,
    /// Carriers whose rate tables are loaded
    pub rate_tables: Vec<Carrier>,
    pub email: String,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_status = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected".to_string(),
        Err(_) => "disconnected".to_string(),
    };

    let rate_tables = Carrier::ALL
        .into_iter()
        .filter(|carrier| state.pricing.is_loaded(*carrier))
        .collect::<Vec<_>>();

    let status = if rate_tables.is_empty() { "degraded" } else { "healthy" };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        database: db_status,
        rate_tables,
        email: if state.email.is_enabled() { "enabled" } else { "disabled" }.to_string(),
    })
}
