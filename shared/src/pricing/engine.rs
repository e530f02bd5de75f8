//! Pricing facade: admissibility, resolution, weight and price lookup composed
//! into the quote modes offered to callers.

use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::admissibility::{check_admissibility, AdmissibilityCheck};
use super::cache::RateTableCache;
use super::carrier::{detect_carrier, Carrier, TableShape};
use super::error::PricingError;
use super::interpolate::{country_price, region_price};
use super::reference::{load_rate_table, RateTable, ReferenceSource};
use super::resolver::{Confidence, DestinationResolver, PricingRegion, ResolvedDestination};
use super::weight::{chargeable_weight, mixed_boxes, total_chargeable_weight, BoxSpec, Dimensions, MixedBoxCalculation};
use crate::validation::{validate_dimensions, validate_quantity, validate_weight};

pub const NEED_DESTINATION: &str = "Please provide the destination country to calculate shipping prices.";
pub const NEED_WEIGHT_OR_DIMENSIONS: &str =
    "Please provide either the actual weight of the package or its dimensions (length, width, height in cm).";
pub const NEED_ACTUAL_WEIGHT: &str = "Please provide the actual weight of the package.";
pub const NEED_BOXES: &str =
    "Please provide the weight and dimensions (length, width, height in cm) of each box type.";
pub const DRAFT_NOTICE: &str =
    "Draft pricing based on actual weight only. Final pricing will be calculated after providing dimensions.";

// ============================================================================
// Requests and results
// ============================================================================

/// Result of a quote request that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteOutcome<T> {
    /// Content failed admissibility screening; nothing was priced
    Rejected { reason: String },
    /// More input is needed before a price can be computed
    NeedsInfo { prompt: String },
    Quoted(T),
}

impl<T> QuoteOutcome<T> {
    pub fn quoted(self) -> Option<T> {
        match self {
            QuoteOutcome::Quoted(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedQuoteRequest {
    pub content: String,
    pub destination: String,
    pub weight_kg: Option<Decimal>,
    pub dimensions: Option<Dimensions>,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftQuoteRequest {
    pub content: String,
    pub destination: String,
    pub weight_kg: Option<Decimal>,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub carrier: Carrier,
    pub region: PricingRegion,
    /// Matched key in the carrier's table
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub confidence: Confidence,
    pub price_per_box: Decimal,
    pub total_price: Decimal,
    pub quantity: u32,
    pub chargeable_weight: Decimal,
    pub chargeable_weight_per_box: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_weight: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volumetric_weight: Option<Decimal>,
    pub service_type: String,
    pub cheapest: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierFailure {
    pub carrier: Carrier,
    pub code: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierComparison {
    /// Ascending by total price
    pub quotes: Vec<Quote>,
    pub cheapest: Option<Carrier>,
    pub unavailable: Vec<CarrierFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixedBoxQuote {
    pub carrier: Carrier,
    pub region: PricingRegion,
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub total_price: Decimal,
    pub chargeable_weight: Decimal,
    pub service_type: String,
    pub breakdown: MixedBoxCalculation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftQuote {
    pub carrier: Carrier,
    pub region: PricingRegion,
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub price_per_box: Decimal,
    pub total_price: Decimal,
    pub quantity: u32,
    pub actual_weight: Decimal,
    pub total_actual_weight: Decimal,
    pub service_type: String,
    pub message: String,
}

/// Outcome of the checks that run before any table is touched
enum Gate {
    Proceed(Decimal),
    Rejected(String),
    NeedsInfo(&'static str),
}

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn invalid_input(message: &str) -> PricingError {
    PricingError::InvalidInput(format!("{}.", message))
}

/// Bounds on every figure that feeds the weight arithmetic
fn validate_figures(weight_kg: Option<Decimal>, dimensions: Option<&Dimensions>, quantity: u32) -> Result<(), PricingError> {
    validate_quantity(i64::from(quantity)).map_err(invalid_input)?;
    if let Some(weight) = weight_kg.filter(|w| *w > Decimal::ZERO) {
        validate_weight(weight).map_err(invalid_input)?;
    }
    if let Some(dims) = dimensions.filter(|d| d.is_complete()) {
        validate_dimensions(dims.length_cm, dims.width_cm, dims.height_cm).map_err(invalid_input)?;
    }
    Ok(())
}

// ============================================================================
// Engine
// ============================================================================

/// Entry point for every pricing operation
pub struct PricingEngine {
    source: Arc<dyn ReferenceSource>,
    cache: Arc<RateTableCache>,
    resolver: DestinationResolver,
}

impl PricingEngine {
    pub fn new(source: Arc<dyn ReferenceSource>) -> Self {
        Self::with_cache(source, Arc::new(RateTableCache::new()))
    }

    pub fn with_cache(source: Arc<dyn ReferenceSource>, cache: Arc<RateTableCache>) -> Self {
        Self {
            source,
            cache,
            resolver: DestinationResolver::new(),
        }
    }

    pub fn with_resolver(mut self, resolver: DestinationResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn cache(&self) -> &RateTableCache {
        &self.cache
    }

    /// Load every carrier's table into the cache, reporting each result
    pub fn preload(&self) -> Vec<(Carrier, Result<(), PricingError>)> {
        Carrier::ALL
            .iter()
            .map(|carrier| (*carrier, self.table(*carrier).map(|_| ())))
            .collect()
    }

    /// Cached rate table of a carrier, checked against its declared shape
    pub fn table(&self, carrier: Carrier) -> Result<Arc<RateTable>, PricingError> {
        let table = self
            .cache
            .get_or_build(carrier, || load_rate_table(carrier, self.source.as_ref()))?;

        if table.shape() != carrier.table_shape() {
            return Err(PricingError::UnsupportedOperation {
                carrier,
                operation: "pricing with a mismatched rate table",
            });
        }
        Ok(table)
    }

    pub fn check_admissibility(&self, content: &str) -> AdmissibilityCheck {
        check_admissibility(content)
    }

    /// Resolve a destination for any carrier
    pub fn resolve(&self, carrier: Carrier, destination: &str) -> Result<ResolvedDestination, PricingError> {
        let table = self.table(carrier)?;
        self.resolver.resolve(carrier, &table, destination)
    }

    /// Zone of a destination; only meaningful for region-based carriers
    pub fn region_for(&self, carrier: Carrier, destination: &str) -> Result<ResolvedDestination, PricingError> {
        if carrier.table_shape() != TableShape::RegionBased {
            return Err(PricingError::UnsupportedOperation {
                carrier,
                operation: "region lookup",
            });
        }
        self.resolve(carrier, destination)
    }

    fn price(&self, carrier: Carrier, table: &RateTable, region: &PricingRegion, weight: Decimal) -> Result<Decimal, PricingError> {
        match (table, region) {
            (RateTable::RegionBased(t), PricingRegion::Zone(zone)) => region_price(t, weight, *zone),
            (RateTable::CountryBased(t), PricingRegion::Country(key)) => country_price(t, weight, key),
            _ => Err(PricingError::UnsupportedOperation {
                carrier,
                operation: "pricing a region from another table shape",
            }),
        }
    }

    // ------------------------------------------------------------------------
    // Detailed quotes
    // ------------------------------------------------------------------------

    /// Gate shared by the detailed modes: admissibility, then missing input
    fn gate_detailed(&self, request: &DetailedQuoteRequest) -> Result<Gate, PricingError> {
        let check = check_admissibility(&request.content);
        if !check.allowed {
            return Ok(Gate::Rejected(check.reason.unwrap_or_default()));
        }
        validate_figures(request.weight_kg, request.dimensions.as_ref(), request.quantity)?;

        if request.destination.trim().is_empty() {
            return Ok(Gate::NeedsInfo(NEED_DESTINATION));
        }

        Ok(match chargeable_weight(request.weight_kg, request.dimensions.as_ref()) {
            Some(weight) => Gate::Proceed(weight.chargeable_weight_kg),
            None => Gate::NeedsInfo(NEED_WEIGHT_OR_DIMENSIONS),
        })
    }

    fn detailed_quote(&self, carrier: Carrier, request: &DetailedQuoteRequest, per_box: Decimal) -> Result<Quote, PricingError> {
        let table = self.table(carrier)?;
        let resolved = self.resolver.resolve(carrier, &table, &request.destination)?;

        let total_weight = total_chargeable_weight(per_box, request.quantity);
        let total_price = round_money(self.price(carrier, &table, &resolved.region, total_weight)?);
        let volumetric = request
            .dimensions
            .filter(Dimensions::is_complete)
            .map(|d| round_money(d.volumetric_weight()));

        Ok(Quote {
            carrier,
            region: resolved.region,
            destination: resolved.resolution.canonical_country,
            city: resolved.resolution.original_city_name,
            confidence: resolved.resolution.confidence,
            price_per_box: round_money(total_price / Decimal::from(request.quantity)),
            total_price,
            quantity: request.quantity,
            chargeable_weight: total_weight,
            chargeable_weight_per_box: per_box,
            actual_weight: request.weight_kg.filter(|w| *w > Decimal::ZERO),
            volumetric_weight: volumetric,
            service_type: carrier.service_type(),
            cheapest: false,
        })
    }

    /// Quote one carrier for `quantity` identical boxes
    pub fn quote_single_carrier(&self, carrier: Carrier, request: &DetailedQuoteRequest) -> Result<QuoteOutcome<Quote>, PricingError> {
        let per_box = match self.gate_detailed(request)? {
            Gate::Proceed(per_box) => per_box,
            Gate::Rejected(reason) => return Ok(QuoteOutcome::Rejected { reason }),
            Gate::NeedsInfo(prompt) => {
                return Ok(QuoteOutcome::NeedsInfo {
                    prompt: prompt.to_string(),
                })
            }
        };
        self.detailed_quote(carrier, request, per_box).map(QuoteOutcome::Quoted)
    }

    /// Quote every carrier (or only the one named in the content) and rank them.
    ///
    /// A carrier that cannot price the request is listed as unavailable; the
    /// call fails only if no carrier can.
    pub fn quote_all_carriers(&self, request: &DetailedQuoteRequest) -> Result<QuoteOutcome<CarrierComparison>, PricingError> {
        let per_box = match self.gate_detailed(request)? {
            Gate::Proceed(per_box) => per_box,
            Gate::Rejected(reason) => return Ok(QuoteOutcome::Rejected { reason }),
            Gate::NeedsInfo(prompt) => {
                return Ok(QuoteOutcome::NeedsInfo {
                    prompt: prompt.to_string(),
                })
            }
        };

        let carriers: Vec<Carrier> = match detect_carrier(&request.content) {
            Some(carrier) => vec![carrier],
            None => Carrier::ALL.to_vec(),
        };

        let mut quotes = Vec::new();
        let mut failures = Vec::new();
        for carrier in carriers {
            match self.detailed_quote(carrier, request, per_box) {
                Ok(quote) => quotes.push(quote),
                Err(err) => failures.push((carrier, err)),
            }
        }

        if quotes.is_empty() {
            if let Some((_, err)) = failures.into_iter().next() {
                return Err(err);
            }
            return Err(PricingError::InvalidInput("No carrier available.".to_string()));
        }

        quotes.sort_by(|a, b| a.total_price.cmp(&b.total_price));
        if let Some(first) = quotes.first_mut() {
            first.cheapest = true;
        }

        Ok(QuoteOutcome::Quoted(CarrierComparison {
            cheapest: quotes.first().map(|q| q.carrier),
            quotes,
            unavailable: failures
                .into_iter()
                .map(|(carrier, err)| CarrierFailure {
                    carrier,
                    code: err.code().to_string(),
                    reason: err.user_message(),
                })
                .collect(),
        }))
    }

    // ------------------------------------------------------------------------
    // Mixed boxes
    // ------------------------------------------------------------------------

    /// Price a shipment of heterogeneous boxes on one rounded total weight
    pub fn quote_mixed_boxes(
        &self,
        carrier: Carrier,
        content: &str,
        destination: &str,
        boxes: &[BoxSpec],
    ) -> Result<QuoteOutcome<MixedBoxQuote>, PricingError> {
        let check = check_admissibility(content);
        if !check.allowed {
            return Ok(QuoteOutcome::Rejected {
                reason: check.reason.unwrap_or_default(),
            });
        }

        if carrier.table_shape() != TableShape::RegionBased {
            return Err(PricingError::UnsupportedOperation {
                carrier,
                operation: "mixed-box pricing",
            });
        }
        if destination.trim().is_empty() {
            return Ok(QuoteOutcome::NeedsInfo {
                prompt: NEED_DESTINATION.to_string(),
            });
        }
        if boxes.is_empty() {
            return Ok(QuoteOutcome::NeedsInfo {
                prompt: NEED_BOXES.to_string(),
            });
        }

        let breakdown = mixed_boxes(boxes)?;
        let table = self.table(carrier)?;
        let resolved = self.resolver.resolve(carrier, &table, destination)?;
        let total_price = round_money(self.price(carrier, &table, &resolved.region, breakdown.total_rounded_weight)?);

        Ok(QuoteOutcome::Quoted(MixedBoxQuote {
            carrier,
            region: resolved.region,
            destination: resolved.resolution.canonical_country,
            city: resolved.resolution.original_city_name,
            total_price,
            chargeable_weight: breakdown.total_rounded_weight,
            service_type: carrier.service_type(),
            breakdown,
        }))
    }

    // ------------------------------------------------------------------------
    // Draft
    // ------------------------------------------------------------------------

    /// Quick estimate from actual weight only.
    ///
    /// Without an explicit carrier the one named in the content is used,
    /// falling back to UPS.
    pub fn quote_draft(&self, carrier: Option<Carrier>, request: &DraftQuoteRequest) -> Result<QuoteOutcome<DraftQuote>, PricingError> {
        let check = check_admissibility(&request.content);
        if !check.allowed {
            return Ok(QuoteOutcome::Rejected {
                reason: check.reason.unwrap_or_default(),
            });
        }
        validate_figures(request.weight_kg, None, request.quantity)?;

        if request.destination.trim().is_empty() {
            return Ok(QuoteOutcome::NeedsInfo {
                prompt: NEED_DESTINATION.to_string(),
            });
        }
        let Some(weight) = request.weight_kg.filter(|w| *w > Decimal::ZERO) else {
            return Ok(QuoteOutcome::NeedsInfo {
                prompt: NEED_ACTUAL_WEIGHT.to_string(),
            });
        };

        let carrier = carrier
            .or_else(|| detect_carrier(&request.content))
            .unwrap_or(Carrier::Ups);
        let total_weight = total_chargeable_weight(weight, request.quantity);

        let table = self.table(carrier)?;
        let resolved = self.resolver.resolve(carrier, &table, &request.destination)?;
        let total_price = round_money(self.price(carrier, &table, &resolved.region, total_weight)?);

        Ok(QuoteOutcome::Quoted(DraftQuote {
            carrier,
            region: resolved.region,
            destination: resolved.resolution.canonical_country,
            city: resolved.resolution.original_city_name,
            price_per_box: round_money(total_price / Decimal::from(request.quantity)),
            total_price,
            quantity: request.quantity,
            actual_weight: weight,
            total_actual_weight: total_weight,
            service_type: carrier.service_type(),
            message: DRAFT_NOTICE.to_string(),
        }))
    }
}
