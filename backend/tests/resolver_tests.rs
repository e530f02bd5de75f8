//! Destination resolution across carriers
//!
//! Tests for:
//! - City aliases resolve to their country's region
//! - Resolving a resolved name again is a no-op

use proptest::prelude::*;
use shared::pricing::{load_rate_table, normalize_name, Carrier, Confidence, DestinationResolver, InMemorySource, RateTable};

fn source() -> InMemorySource {
    InMemorySource::new()
        .with_file("regions.csv", include_str!("../../data/regions.csv"))
        .with_file("pricing.csv", include_str!("../../data/pricing.csv"))
        .with_file("dhl-regions.csv", include_str!("../../data/dhl-regions.csv"))
        .with_file("dhl-pricing.csv", include_str!("../../data/dhl-pricing.csv"))
        .with_file("aramex-countries.csv", include_str!("../../data/aramex-countries.csv"))
}

fn table(carrier: Carrier) -> RateTable {
    load_rate_table(carrier, &source()).unwrap()
}

const DESTINATIONS: &[&str] = &[
    "Germany", "Berlin", "London", "Paris", "Madrid", "Rome", "Amsterdam", "Vienna", "Athens", "Sofia",
    "Dubai", "UAE", "United Arab Emirates", "Abu Dhabi", "Almanya", "Fransa", "USA", "Japan", "Tokyo",
];

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_city_and_country_share_region() {
        let resolver = DestinationResolver::new();
        for carrier in [Carrier::Ups, Carrier::Dhl] {
            let table = table(carrier);
            let city = resolver.resolve(carrier, &table, "Berlin").unwrap();
            let country = resolver.resolve(carrier, &table, "Germany").unwrap();
            assert_eq!(city.region, country.region, "{carrier}");
            assert!(city.resolution.is_city_alias);
            assert!(!country.resolution.is_city_alias);
        }
    }

    #[test]
    fn test_uae_spellings_agree_per_carrier() {
        let resolver = DestinationResolver::new();
        for carrier in Carrier::ALL {
            let table = table(carrier);
            let regions: Vec<_> = ["Dubai", "UAE", "United Arab Emirates", "Abu Dhabi"]
                .iter()
                .map(|input| resolver.resolve(carrier, &table, input).unwrap().region)
                .collect();
            assert!(regions.windows(2).all(|pair| pair[0] == pair[1]), "{carrier}: {regions:?}");
        }
    }

    #[test]
    fn test_exact_match_high_confidence() {
        let resolver = DestinationResolver::new();
        let resolved = resolver.resolve(Carrier::Ups, &table(Carrier::Ups), "ALMANYA").unwrap();
        assert_eq!(resolved.resolution.confidence, Confidence::High);
    }

    #[test]
    fn test_inflected_turkish_names_share_country_region() {
        let resolver = DestinationResolver::new();
        for carrier in [Carrier::Ups, Carrier::Dhl] {
            let table = table(carrier);
            let country = resolver.resolve(carrier, &table, "Germany").unwrap();
            let inflected = resolver.resolve(carrier, &table, "Almanyada").unwrap();
            assert_eq!(inflected.region, country.region, "{carrier}");
            assert_eq!(inflected.resolution.confidence, Confidence::Medium);
        }
    }

    #[test]
    fn test_case_and_spacing_do_not_matter() {
        let resolver = DestinationResolver::new();
        let table = table(Carrier::Dhl);
        let a = resolver.resolve(Carrier::Dhl, &table, "germany").unwrap();
        let b = resolver.resolve(Carrier::Dhl, &table, "  GERMANY ").unwrap();
        assert_eq!(a.region, b.region);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Resolving the canonical name of a resolution lands in the same region
        #[test]
        fn prop_resolution_idempotent(
            input in prop::sample::select(DESTINATIONS),
            carrier in prop::sample::select(Carrier::ALL.to_vec()),
        ) {
            let resolver = DestinationResolver::new();
            let table = table(carrier);
            if let Ok(first) = resolver.resolve(carrier, &table, input) {
                let again = resolver.resolve(carrier, &table, &first.resolution.canonical_country).unwrap();
                prop_assert_eq!(&again.region, &first.region);
                prop_assert_eq!(&again.resolution.canonical_country, &first.resolution.canonical_country);
            }
        }

        /// Normalisation is idempotent on arbitrary text
        #[test]
        fn prop_normalize_idempotent(input in "\\PC{0,40}") {
            let once = normalize_name(&input);
            prop_assert_eq!(normalize_name(&once), once);
        }
    }
}
