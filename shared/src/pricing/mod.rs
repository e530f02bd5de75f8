//! Cargo rate resolution engine
//!
//! Layers, each depending only on the ones above it in this list:
//! - [`reference`]: carrier rate text parsed into [`RateTable`]s, cached in a [`RateTableCache`]
//! - [`resolver`]: free-text destination to a carrier's zone or country key
//! - [`weight`]: actual vs. volumetric weight, per box and per shipment
//! - [`interpolate`]: weight and region to an unrounded price
//!
//! [`PricingEngine`] composes them behind the admissibility screen.

pub mod admissibility;
pub mod cache;
pub mod carrier;
pub mod engine;
pub mod error;
pub mod interpolate;
pub mod normalize;
pub mod reference;
pub mod resolver;
pub mod terminology;
pub mod weight;

pub use admissibility::{check_admissibility, AdmissibilityCheck, ProhibitionCategory, PROHIBITED_MESSAGE};
pub use cache::RateTableCache;
pub use carrier::{detect_carrier, Carrier, ReferenceKind, TableShape};
pub use engine::{
    CarrierComparison, CarrierFailure, DetailedQuoteRequest, DraftQuote, DraftQuoteRequest, MixedBoxQuote,
    PricingEngine, Quote, QuoteOutcome,
};
pub use error::PricingError;
pub use interpolate::{country_price, region_price, OVERAGE_THRESHOLD_KG};
pub use normalize::normalize_name;
pub use reference::{
    load_rate_table, CountryRateTable, DirectorySource, InMemorySource, RateTable, ReferenceSource,
    RegionRateTable, WeightBracket,
};
pub use resolver::{
    Confidence, ContainmentMatcher, DestinationResolution, DestinationResolver, FuzzyMatcher, PricingRegion,
    ResolvedDestination, WordBoundedMatcher,
};
pub use terminology::{content_approval_message, identify_cargo_category, CargoCategory, TerminologyMatch};
pub use weight::{
    chargeable_weight, mixed_boxes, total_chargeable_weight, BoxCalculation, BoxSpec, Dimensions,
    MixedBoxCalculation, MixedBoxSummary, WeightResult, VOLUMETRIC_DIVISOR,
};
