//! Failures of the rate resolution engine
//!
//! `NeedsInfo` and prohibited content are not failures; they are carried by
//! [`QuoteOutcome`](super::QuoteOutcome).

use rust_decimal::Decimal;
use thiserror::Error;

use super::carrier::Carrier;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    #[error("destination \"{input}\" not found for {carrier}")]
    DestinationNotFound { input: String, carrier: Carrier },

    #[error("reference data unavailable for {carrier}: {detail}")]
    ReferenceDataUnavailable { carrier: Carrier, detail: String },

    #[error("no price for {weight} kg in region {region}")]
    PriceUnavailable { weight: Decimal, region: String },

    #[error("{operation} is not supported for {carrier}")]
    UnsupportedOperation {
        carrier: Carrier,
        operation: &'static str,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl PricingError {
    /// Stable machine-readable code, used in HTTP bodies and logs
    pub fn code(&self) -> &'static str {
        match self {
            PricingError::DestinationNotFound { .. } => "DESTINATION_NOT_FOUND",
            PricingError::ReferenceDataUnavailable { .. } => "REFERENCE_DATA_UNAVAILABLE",
            PricingError::PriceUnavailable { .. } => "PRICE_UNAVAILABLE",
            PricingError::UnsupportedOperation { .. } => "UNSUPPORTED_OPERATION",
            PricingError::InvalidInput(_) => "INVALID_INPUT",
        }
    }

    /// Message safe to show to the person asking for a quote.
    ///
    /// Internal data failures collapse into one generic sentence; the detail
    /// belongs in server logs only.
    pub fn user_message(&self) -> String {
        match self {
            PricingError::DestinationNotFound { input, .. } => format!(
                "Country or city \"{}\" not found. Please check the country name and try again.",
                input
            ),
            PricingError::ReferenceDataUnavailable { .. } | PricingError::PriceUnavailable { .. } => {
                "Could not calculate shipping price. Please try again later.".to_string()
            }
            PricingError::UnsupportedOperation { carrier, operation } => format!(
                "{} is not available for {}. Please try UPS or DHL.",
                operation, carrier
            ),
            PricingError::InvalidInput(message) => message.clone(),
        }
    }
}
