//! Shipment order validation and status workflow tests

use proptest::prelude::*;
use shared::{
    validate_email, validate_phone, validate_phone_code, validate_status_transition, validate_tc_kimlik_no,
    OrderStatus, Pagination, PaginationMeta,
};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_happy_path_workflow() {
        let path = [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ];
        for pair in path.windows(2) {
            assert!(validate_status_transition(pair[0], pair[1]).is_ok(), "{:?}", pair);
        }
    }

    #[test]
    fn test_closed_orders_stay_closed() {
        for next in OrderStatus::ALL {
            if next != OrderStatus::Delivered {
                assert!(validate_status_transition(OrderStatus::Delivered, next).is_err());
            }
            if next != OrderStatus::Cancelled {
                assert!(validate_status_transition(OrderStatus::Cancelled, next).is_err());
            }
        }
    }

    #[test]
    fn test_shipped_cannot_be_cancelled() {
        assert_eq!(
            validate_status_transition(OrderStatus::Shipped, OrderStatus::Cancelled),
            Err("Invalid order status transition")
        );
    }

    #[test]
    fn test_contact_validation() {
        assert!(validate_email("hans@example.de").is_ok());
        assert!(validate_email("hans@").is_err());
        assert!(validate_phone("+90 532 123 45 67").is_ok());
        assert!(validate_phone("12ab").is_err());
        assert!(validate_phone_code("+90").is_ok());
        assert!(validate_tc_kimlik_no("10000000146").is_ok());
        assert!(validate_tc_kimlik_no("10000000147").is_err());
        assert!(validate_tc_kimlik_no("01234567890").is_err());
    }

    #[test]
    fn test_pagination_meta() {
        let pagination = Pagination::new(Some(2), Some(10));
        let meta = PaginationMeta::new(&pagination, 25);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(pagination.offset(), 10);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn status_strategy() -> impl Strategy<Value = OrderStatus> {
        prop::sample::select(OrderStatus::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Status names round-trip through their string form
        #[test]
        fn prop_status_parse(status in status_strategy()) {
            prop_assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }

        /// Transition validation agrees with the status graph
        #[test]
        fn prop_transition_matches_graph(from in status_strategy(), to in status_strategy()) {
            let allowed = from == to || from.can_transition_to(to);
            prop_assert_eq!(validate_status_transition(from, to).is_ok(), allowed);
        }

        /// Pages never overlap
        #[test]
        fn prop_pagination_offsets(page in 1u32..50, per_page in 1u32..100) {
            let current = Pagination::new(Some(page), Some(per_page));
            let next = Pagination::new(Some(page + 1), Some(per_page));
            prop_assert_eq!(next.offset() - current.offset(), current.limit());
        }
    }
}
