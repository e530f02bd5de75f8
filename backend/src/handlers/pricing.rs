//! Cargo pricing function handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::pricing::AdmissibilityCheck;

use crate::error::AppResult;
use crate::services::pricing::{MixedPricingRequest, PricingQuery, PricingResponse, RegionLookup};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AdmissibilityQuery {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct RegionQuery {
    pub carrier: String,
    #[serde(default)]
    pub country: String,
}

/// Content check or single-carrier quote
pub async fn cargo_pricing(
    State(state): State<AppState>,
    Query(query): Query<PricingQuery>,
) -> AppResult<Json<PricingResponse>> {
    Ok(Json(state.pricing.single(&query)?))
}

/// Quotes from every carrier, cheapest marked
pub async fn cargo_multi_pricing(
    State(state): State<AppState>,
    Query(query): Query<PricingQuery>,
) -> AppResult<Json<PricingResponse>> {
    Ok(Json(state.pricing.multi(&query)?))
}

/// Estimate from actual weight only
pub async fn cargo_draft_pricing(
    State(state): State<AppState>,
    Query(query): Query<PricingQuery>,
) -> AppResult<Json<PricingResponse>> {
    Ok(Json(state.pricing.draft(&query)?))
}

/// Quote for boxes of different sizes
pub async fn cargo_mixed_pricing(
    State(state): State<AppState>,
    Json(request): Json<MixedPricingRequest>,
) -> AppResult<Json<PricingResponse>> {
    Ok(Json(state.pricing.mixed(&request)?))
}

pub async fn check_admissibility(
    State(state): State<AppState>,
    Query(query): Query<AdmissibilityQuery>,
) -> Json<AdmissibilityCheck> {
    Json(state.pricing.check_admissibility(&query.content))
}

/// Zone of a destination for UPS or DHL
pub async fn region_for(
    State(state): State<AppState>,
    Query(query): Query<RegionQuery>,
) -> AppResult<Json<RegionLookup>> {
    Ok(Json(state.pricing.region_for(&query.carrier, &query.country)?))
}
