//! End-to-end pricing scenarios over the bundled carrier rate files
//!
//! Covers:
//! - Single-carrier, multi-carrier, mixed-box and draft quotes
//! - The overage threshold
//! - Admissibility screening before any table access

use rust_decimal::Decimal;
use shared::pricing::{
    Carrier, DetailedQuoteRequest, Dimensions, DraftQuoteRequest, InMemorySource, PricingEngine, PricingError,
    PricingRegion, QuoteOutcome, BoxSpec, PROHIBITED_MESSAGE,
};
use std::str::FromStr;
use std::sync::Arc;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn engine() -> PricingEngine {
    let source = InMemorySource::new()
        .with_file("regions.csv", include_str!("../../data/regions.csv"))
        .with_file("pricing.csv", include_str!("../../data/pricing.csv"))
        .with_file("dhl-regions.csv", include_str!("../../data/dhl-regions.csv"))
        .with_file("dhl-pricing.csv", include_str!("../../data/dhl-pricing.csv"))
        .with_file("aramex-countries.csv", include_str!("../../data/aramex-countries.csv"));
    PricingEngine::new(Arc::new(source))
}

fn request(content: &str, destination: &str, weight: &str) -> DetailedQuoteRequest {
    DetailedQuoteRequest {
        content: content.to_string(),
        destination: destination.to_string(),
        weight_kg: Some(dec(weight)),
        dimensions: None,
        quantity: 1,
    }
}

fn boxed(weight: &str, l: &str, w: &str, h: &str, quantity: u32) -> BoxSpec {
    BoxSpec {
        actual_weight_kg: dec(weight),
        length_cm: dec(l),
        width_cm: dec(w),
        height_cm: dec(h),
        quantity,
    }
}

// ============================================================================
// Single carrier
// ============================================================================

#[cfg(test)]
mod single_carrier {
    use super::*;

    #[test]
    fn test_ups_books_to_germany() {
        let quote = engine()
            .quote_single_carrier(Carrier::Ups, &request("books", "Germany", "5"))
            .unwrap()
            .quoted()
            .unwrap();

        assert_eq!(quote.region, PricingRegion::Zone(2));
        assert_eq!(quote.total_price, dec("42.50"));
        assert_eq!(quote.price_per_box, dec("42.50"));
        assert_eq!(quote.chargeable_weight, dec("5"));
        assert_eq!(quote.service_type, "UPS Express");
    }

    #[test]
    fn test_city_resolves_to_country_zone() {
        let engine = engine();
        let by_city = engine
            .quote_single_carrier(Carrier::Ups, &request("books", "Berlin", "5"))
            .unwrap()
            .quoted()
            .unwrap();
        let by_country = engine
            .quote_single_carrier(Carrier::Ups, &request("books", "Germany", "5"))
            .unwrap()
            .quoted()
            .unwrap();

        assert_eq!(by_city.region, by_country.region);
        assert_eq!(by_city.total_price, by_country.total_price);
        assert!(by_city.city.is_some());
    }

    #[test]
    fn test_volumetric_weight_wins() {
        let mut req = request("clothes", "Germany", "2");
        // 50 × 40 × 30 / 5000 = 12 kg
        req.dimensions = Some(Dimensions::new(dec("50"), dec("40"), dec("30")));
        let quote = engine()
            .quote_single_carrier(Carrier::Ups, &req)
            .unwrap()
            .quoted()
            .unwrap();

        assert_eq!(quote.chargeable_weight, dec("12"));
        assert_eq!(quote.volumetric_weight, Some(dec("12")));
        assert_eq!(quote.actual_weight, Some(dec("2")));
    }

    #[test]
    fn test_oversized_dimensions_are_rejected_as_input() {
        let huge = dec("100000000000");
        let mut req = request("books", "Germany", "1");
        req.dimensions = Some(Dimensions::new(huge, huge, huge));

        let err = engine().quote_single_carrier(Carrier::Ups, &req).unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput(_)));
        assert_eq!(err.code(), "INVALID_INPUT");

        let boxes = [boxed("1", "100000000000", "100000000000", "100000000000", 1)];
        let err = engine().quote_mixed_boxes(Carrier::Dhl, "books", "Spain", &boxes).unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput(ref msg) if msg.starts_with("Box 1")));
    }

    #[test]
    fn test_quantity_rounds_total_once() {
        let mut req = request("books", "Germany", "2.3");
        req.quantity = 3;
        let quote = engine()
            .quote_single_carrier(Carrier::Ups, &req)
            .unwrap()
            .quoted()
            .unwrap();

        // 2.3 × 3 = 6.9, rounded up once to 7
        assert_eq!(quote.chargeable_weight, dec("7"));
        assert_eq!(quote.chargeable_weight_per_box, dec("2.3"));
        assert_eq!(quote.quantity, 3);
    }

    #[test]
    fn test_overage_threshold() {
        let engine = engine();
        let at = engine
            .quote_single_carrier(Carrier::Ups, &request("books", "Germany", "70"))
            .unwrap()
            .quoted()
            .unwrap();
        let above = engine
            .quote_single_carrier(Carrier::Ups, &request("books", "Germany", "70.01"))
            .unwrap()
            .quoted()
            .unwrap();

        // 70 kg is the last bracket; 70.01 kg rounds to 71 kg at the per-kg rate
        assert_eq!(at.total_price, dec("335.00"));
        assert_eq!(above.chargeable_weight, dec("71"));
        assert_eq!(above.total_price, dec("312.40"));
    }

    #[test]
    fn test_unknown_destination() {
        let err = engine()
            .quote_single_carrier(Carrier::Dhl, &request("books", "Atlantis", "5"))
            .unwrap_err();
        assert!(matches!(err, PricingError::DestinationNotFound { ref input, .. } if input == "Atlantis"));
        assert!(err.user_message().contains("Atlantis"));
    }

    #[test]
    fn test_missing_weight_needs_info() {
        let mut req = request("books", "Germany", "1");
        req.weight_kg = None;
        let outcome = engine().quote_single_carrier(Carrier::Ups, &req).unwrap();
        assert!(matches!(outcome, QuoteOutcome::NeedsInfo { .. }));
    }

    #[test]
    fn test_prohibited_content_rejected() {
        let outcome = engine()
            .quote_single_carrier(Carrier::Ups, &request("perfume samples", "Germany", "5"))
            .unwrap();
        match outcome {
            QuoteOutcome::Rejected { reason } => assert_eq!(reason, PROHIBITED_MESSAGE),
            other => panic!("expected rejection, got {:?}", other),
        }
    }
}

// ============================================================================
// Multi carrier
// ============================================================================

#[cfg(test)]
mod multi_carrier {
    use super::*;

    #[test]
    fn test_germany_comparison() {
        let comparison = engine()
            .quote_all_carriers(&request("books", "Germany", "5"))
            .unwrap()
            .quoted()
            .unwrap();

        assert_eq!(comparison.cheapest, Some(Carrier::Dhl));
        assert_eq!(comparison.quotes[0].carrier, Carrier::Dhl);
        assert_eq!(comparison.quotes[0].total_price, dec("41.00"));
        assert!(comparison.quotes[0].cheapest);
        assert_eq!(comparison.quotes[1].carrier, Carrier::Ups);
        assert_eq!(comparison.quotes[1].total_price, dec("42.50"));
        assert!(!comparison.quotes[1].cheapest);
        assert_eq!(comparison.unavailable.len(), 1);
        assert_eq!(comparison.unavailable[0].carrier, Carrier::Aramex);
    }

    #[test]
    fn test_dubai_comparison() {
        let comparison = engine()
            .quote_all_carriers(&request("documents", "Dubai", "5"))
            .unwrap()
            .quoted()
            .unwrap();

        let price_of = |carrier: Carrier| {
            comparison
                .quotes
                .iter()
                .find(|q| q.carrier == carrier)
                .map(|q| q.total_price)
        };
        assert_eq!(price_of(Carrier::Ups), Some(dec("59.00")));
        assert_eq!(price_of(Carrier::Dhl), Some(dec("56.50")));
        assert_eq!(price_of(Carrier::Aramex), Some(dec("60.00")));
        assert_eq!(comparison.cheapest, Some(Carrier::Dhl));
        assert!(comparison.unavailable.is_empty());
    }

    #[test]
    fn test_quotes_sorted_ascending() {
        let comparison = engine()
            .quote_all_carriers(&request("books", "UAE", "12"))
            .unwrap()
            .quoted()
            .unwrap();
        assert!(comparison
            .quotes
            .windows(2)
            .all(|pair| pair[0].total_price <= pair[1].total_price));
        assert_eq!(comparison.quotes.iter().filter(|q| q.cheapest).count(), 1);
    }

    #[test]
    fn test_carrier_named_in_content() {
        let comparison = engine()
            .quote_all_carriers(&request("books, send via UPS", "Germany", "5"))
            .unwrap()
            .quoted()
            .unwrap();
        assert_eq!(comparison.quotes.len(), 1);
        assert_eq!(comparison.cheapest, Some(Carrier::Ups));
    }

    #[test]
    fn test_no_carrier_can_price() {
        let err = engine()
            .quote_all_carriers(&request("books", "Atlantis", "5"))
            .unwrap_err();
        assert_eq!(err.code(), "DESTINATION_NOT_FOUND");
    }
}

// ============================================================================
// Mixed boxes and drafts
// ============================================================================

#[cfg(test)]
mod mixed_and_draft {
    use super::*;

    #[test]
    fn test_dhl_clothes_to_spain() {
        let boxes = vec![boxed("2", "30", "20", "15", 1), boxed("5", "50", "40", "30", 2)];
        let quote = engine()
            .quote_mixed_boxes(Carrier::Dhl, "clothes", "Spain", &boxes)
            .unwrap()
            .quoted()
            .unwrap();

        assert_eq!(quote.chargeable_weight, dec("26"));
        assert_eq!(quote.total_price, dec("161.80"));
        assert_eq!(quote.breakdown.summary.total_boxes, 3);
        assert_eq!(quote.breakdown.box_calculations.len(), 2);
    }

    #[test]
    fn test_mixed_boxes_not_offered_by_aramex() {
        let boxes = vec![boxed("2", "30", "20", "15", 1)];
        let err = engine()
            .quote_mixed_boxes(Carrier::Aramex, "clothes", "UAE", &boxes)
            .unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_OPERATION");
    }

    #[test]
    fn test_invalid_box_reports_position() {
        let boxes = vec![boxed("2", "30", "20", "15", 1), boxed("0", "30", "20", "15", 1)];
        let err = engine()
            .quote_mixed_boxes(Carrier::Ups, "clothes", "Germany", &boxes)
            .unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput(ref msg) if msg.starts_with("Box 2")));
    }

    #[test]
    fn test_draft_uses_carrier_from_content() {
        let req = DraftQuoteRequest {
            content: "books via dhl".to_string(),
            destination: "Germany".to_string(),
            weight_kg: Some(dec("5")),
            quantity: 1,
        };
        let draft = engine().quote_draft(None, &req).unwrap().quoted().unwrap();
        assert_eq!(draft.carrier, Carrier::Dhl);
        assert_eq!(draft.total_price, dec("41.00"));
        assert!(!draft.message.is_empty());
    }

    #[test]
    fn test_aramex_draft_is_rate_times_weight() {
        let req = DraftQuoteRequest {
            content: "books".to_string(),
            destination: "Dubai".to_string(),
            weight_kg: Some(dec("5")),
            quantity: 1,
        };
        let draft = engine()
            .quote_draft(Some(Carrier::Aramex), &req)
            .unwrap()
            .quoted()
            .unwrap();
        assert_eq!(draft.total_price, dec("60.00"));
    }
}

// ============================================================================
// Region lookup
// ============================================================================

#[cfg(test)]
mod region_lookup {
    use super::*;

    #[test]
    fn test_region_for_zone_carriers() {
        let engine = engine();
        assert_eq!(engine.region_for(Carrier::Ups, "Germany").unwrap().region, PricingRegion::Zone(2));
        assert_eq!(engine.region_for(Carrier::Dhl, "Germany").unwrap().region, PricingRegion::Zone(1));
    }

    #[test]
    fn test_region_for_country_carrier_unsupported() {
        let err = engine().region_for(Carrier::Aramex, "UAE").unwrap_err();
        assert!(matches!(err, PricingError::UnsupportedOperation { carrier: Carrier::Aramex, .. }));
    }
}
