//! Cargo pricing service: maps engine outcomes onto the pricing response body

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::pricing::{
    content_approval_message, detect_carrier, identify_cargo_category, AdmissibilityCheck, BoxSpec,
    CargoCategory, Carrier, DestinationResolution, DetailedQuoteRequest, Dimensions, DraftQuoteRequest,
    PricingEngine, PricingError, PricingRegion, QuoteOutcome,
};
use shared::Language;

use crate::error::{AppError, AppResult};

/// Pricing service shared by the HTTP functions and the assistant tools
#[derive(Clone)]
pub struct PricingService {
    engine: Arc<PricingEngine>,
}

/// Body returned by every pricing function
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricingResponse {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_info: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_approved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_draft: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CargoCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recognized_term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl PricingResponse {
    pub fn rejected(reason: String) -> Self {
        Self {
            allowed: false,
            message: Some(reason),
            ..Default::default()
        }
    }

    pub fn needs_info(prompt: String) -> Self {
        Self {
            allowed: true,
            needs_info: Some(true),
            message: Some(prompt),
            ..Default::default()
        }
    }

    pub fn failed(err: &PricingError) -> Self {
        Self {
            allowed: true,
            error: Some(true),
            error_code: Some(err.code().to_string()),
            message: Some(err.user_message()),
            ..Default::default()
        }
    }

    pub fn quoted<T: Serialize>(data: &T) -> AppResult<Self> {
        let data = serde_json::to_value(data)
            .map_err(|e| AppError::Internal(format!("Failed to serialize quote: {}", e)))?;
        Ok(Self {
            allowed: true,
            success: Some(true),
            data: Some(data),
            ..Default::default()
        })
    }

    fn from_outcome<T: Serialize>(result: Result<QuoteOutcome<T>, PricingError>) -> AppResult<Self> {
        match result {
            Ok(QuoteOutcome::Quoted(data)) => Self::quoted(&data),
            Ok(QuoteOutcome::NeedsInfo { prompt }) => Ok(Self::needs_info(prompt)),
            Ok(QuoteOutcome::Rejected { reason }) => Ok(Self::rejected(reason)),
            Err(err) => {
                log_pricing_failure(&err);
                Ok(Self::failed(&err))
            }
        }
    }
}

fn log_pricing_failure(err: &PricingError) {
    match err {
        PricingError::ReferenceDataUnavailable { .. } | PricingError::PriceUnavailable { .. } => {
            tracing::error!(code = err.code(), "Cargo pricing failed: {}", err)
        }
        _ => tracing::debug!(code = err.code(), "Cargo pricing declined: {}", err),
    }
}

/// Parameters of the single, multi-carrier and draft pricing functions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricingQuery {
    #[serde(default)]
    pub content: String,
    pub country: Option<String>,
    pub weight: Option<Decimal>,
    pub length: Option<Decimal>,
    pub width: Option<Decimal>,
    pub height: Option<Decimal>,
    pub quantity: Option<u32>,
    pub carrier: Option<String>,
    pub language: Option<Language>,
}

impl PricingQuery {
    /// Only the content was supplied
    pub fn is_content_only(&self) -> bool {
        self.country.as_deref().map_or(true, |c| c.trim().is_empty())
            && self.weight.is_none()
            && self.length.is_none()
            && self.width.is_none()
            && self.height.is_none()
    }

    fn carrier(&self) -> Result<Option<Carrier>, PricingError> {
        match self.carrier.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => name.parse().map(Some),
        }
    }

    fn detailed_request(&self) -> DetailedQuoteRequest {
        DetailedQuoteRequest {
            content: self.content.clone(),
            destination: self.country.clone().unwrap_or_default(),
            weight_kg: self.weight,
            dimensions: Dimensions::from_parts(self.length, self.width, self.height),
            quantity: self.quantity.unwrap_or(1),
        }
    }

    fn draft_request(&self) -> DraftQuoteRequest {
        DraftQuoteRequest {
            content: self.content.clone(),
            destination: self.country.clone().unwrap_or_default(),
            weight_kg: self.weight,
            quantity: self.quantity.unwrap_or(1),
        }
    }
}

/// Zone lookup result
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegionLookup {
    pub carrier: Carrier,
    pub region: PricingRegion,
    pub resolution: DestinationResolution,
}

/// Body of the mixed-box pricing function
#[derive(Debug, Clone, Deserialize)]
pub struct MixedPricingRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub country: String,
    pub carrier: Option<String>,
    #[serde(default)]
    pub boxes: Vec<BoxSpec>,
}

impl PricingService {
    /// Create a new PricingService instance
    pub fn new(engine: Arc<PricingEngine>) -> Self {
        Self { engine }
    }

    /// Load every carrier's rate table; returns how many loaded
    pub fn preload(&self) -> usize {
        let mut loaded = 0;
        for (carrier, result) in self.engine.preload() {
            match result {
                Ok(()) => {
                    loaded += 1;
                    tracing::info!(%carrier, "Rate table loaded");
                }
                Err(e) => tracing::error!(%carrier, "Rate table unavailable: {}", e),
            }
        }
        loaded
    }

    pub fn is_loaded(&self, carrier: Carrier) -> bool {
        self.engine.cache().is_loaded(carrier)
    }

    /// Zone of a destination for a zone-priced carrier
    pub fn region_for(&self, carrier: &str, destination: &str) -> AppResult<RegionLookup> {
        let carrier: Carrier = carrier.trim().parse()?;
        let resolved = self.engine.region_for(carrier, destination)?;
        Ok(RegionLookup {
            carrier,
            region: resolved.region,
            resolution: resolved.resolution,
        })
    }

    pub fn check_admissibility(&self, content: &str) -> AdmissibilityCheck {
        self.engine.check_admissibility(content)
    }

    /// Content-only approval, including generic cargo terminology
    pub fn content_check(&self, content: &str, language: Language) -> PricingResponse {
        let check = self.engine.check_admissibility(content);
        if !check.allowed {
            return PricingResponse::rejected(check.reason.unwrap_or_default());
        }

        let terminology = identify_cargo_category(content);
        PricingResponse {
            allowed: true,
            content_approved: Some(true),
            message: Some(content_approval_message(terminology.as_ref(), language)),
            category: terminology.as_ref().map(|t| t.category),
            recognized_term: terminology.map(|t| t.matched_term),
            ..Default::default()
        }
    }

    /// Single-carrier quote: explicit carrier, else the one named in the content, else UPS
    pub fn single(&self, query: &PricingQuery) -> AppResult<PricingResponse> {
        if query.is_content_only() {
            return Ok(self.content_check(&query.content, query.language.unwrap_or_default()));
        }

        let carrier = match query.carrier() {
            Ok(explicit) => explicit
                .or_else(|| detect_carrier(&query.content))
                .unwrap_or(Carrier::Ups),
            Err(err) => return Ok(PricingResponse::failed(&err)),
        };

        tracing::debug!(%carrier, destination = ?query.country, "Single-carrier quote");
        PricingResponse::from_outcome(self.engine.quote_single_carrier(carrier, &query.detailed_request()))
    }

    /// Comparison across carriers
    pub fn multi(&self, query: &PricingQuery) -> AppResult<PricingResponse> {
        if query.is_content_only() {
            return Ok(self.content_check(&query.content, query.language.unwrap_or_default()));
        }

        tracing::debug!(destination = ?query.country, "Multi-carrier quote");
        PricingResponse::from_outcome(self.engine.quote_all_carriers(&query.detailed_request()))
    }

    /// Estimate from actual weight only
    pub fn draft(&self, query: &PricingQuery) -> AppResult<PricingResponse> {
        let carrier = match query.carrier() {
            Ok(carrier) => carrier,
            Err(err) => return Ok(PricingResponse::failed(&err)),
        };

        let mut response = PricingResponse::from_outcome(self.engine.quote_draft(carrier, &query.draft_request()))?;
        if response.success == Some(true) {
            response.is_draft = Some(true);
        }
        Ok(response)
    }

    /// Heterogeneous boxes priced on one aggregate weight
    pub fn mixed(&self, request: &MixedPricingRequest) -> AppResult<PricingResponse> {
        let carrier = match request.carrier.as_deref().map(str::trim) {
            None | Some("") => detect_carrier(&request.content).unwrap_or(Carrier::Ups),
            Some(name) => match name.parse::<Carrier>() {
                Ok(carrier) => carrier,
                Err(err) => return Ok(PricingResponse::failed(&err)),
            },
        };

        tracing::debug!(%carrier, boxes = request.boxes.len(), "Mixed-box quote");
        PricingResponse::from_outcome(self.engine.quote_mixed_boxes(
            carrier,
            &request.content,
            &request.country,
            &request.boxes,
        ))
    }
}
