//! WebAssembly module for Shipquote
//!
//! Lets the shipment form show weights and screen content before a request
//! reaches the server:
//! - Volumetric and chargeable weight per box
//! - Uniform and mixed shipment totals
//! - Content admissibility
//! - Destination name normalization and carrier detection

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use shared::pricing::{self, BoxSpec, Dimensions, MixedBoxCalculation};
use shared::validation::{validate_dimensions, validate_quantity, validate_weight};
use wasm_bindgen::prelude::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("shipquote-wasm ready"));
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Dimensions within the accepted bounds, otherwise `None`
fn dimensions(length_cm: f64, width_cm: f64, height_cm: f64) -> Option<Dimensions> {
    let dims = Dimensions::new(to_decimal(length_cm), to_decimal(width_cm), to_decimal(height_cm));
    validate_dimensions(dims.length_cm, dims.width_cm, dims.height_cm).ok()?;
    Some(dims)
}

/// Volumetric weight in kg (L × W × H / 5000), 0 for incomplete or oversized dimensions
#[wasm_bindgen]
pub fn volumetric_weight(length_cm: f64, width_cm: f64, height_cm: f64) -> f64 {
    dimensions(length_cm, width_cm, height_cm)
        .map(|dims| to_f64(dims.volumetric_weight()))
        .unwrap_or(0.0)
}

/// Greater of actual and volumetric weight for one box; 0 when neither is known
#[wasm_bindgen]
pub fn chargeable_weight(actual_kg: f64, length_cm: f64, width_cm: f64, height_cm: f64) -> f64 {
    let actual = Some(to_decimal(actual_kg)).filter(|w| validate_weight(*w).is_ok());
    let dims = dimensions(length_cm, width_cm, height_cm);
    pricing::chargeable_weight(actual, dims.as_ref())
        .map(|w| to_f64(w.chargeable_weight_kg))
        .unwrap_or(0.0)
}

/// Weight billed for `quantity` identical boxes, rounded up once; 0 when out of range
#[wasm_bindgen]
pub fn uniform_total_weight(per_box_kg: f64, quantity: u32) -> f64 {
    let per_box = to_decimal(per_box_kg);
    if per_box <= Decimal::ZERO || validate_quantity(i64::from(quantity)).is_err() {
        return 0.0;
    }
    per_box
        .checked_mul(Decimal::from(quantity))
        .map(|total| to_f64(total.ceil()))
        .unwrap_or(0.0)
}

fn mixed_breakdown(boxes_json: &str) -> Result<MixedBoxCalculation, String> {
    let boxes: Vec<BoxSpec> =
        serde_json::from_str(boxes_json).map_err(|e| format!("Invalid boxes JSON: {}", e))?;
    pricing::mixed_boxes(&boxes).map_err(|e| e.to_string())
}

/// Per-box breakdown and rounded total for a JSON array of boxes
#[wasm_bindgen]
pub fn mixed_boxes(boxes_json: &str) -> Result<String, JsValue> {
    let breakdown = mixed_breakdown(boxes_json).map_err(|e| JsValue::from_str(&e))?;
    serde_json::to_string(&breakdown).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Whether the content may be shipped at all
#[wasm_bindgen]
pub fn is_content_allowed(content: &str) -> bool {
    pricing::check_admissibility(content).allowed
}

/// Rejection message for the content, or an empty string when it is allowed
#[wasm_bindgen]
pub fn content_rejection_reason(content: &str) -> String {
    pricing::check_admissibility(content).reason.unwrap_or_default()
}

/// Lookup form of a destination name
#[wasm_bindgen]
pub fn normalize_destination(name: &str) -> String {
    pricing::normalize_name(name)
}

/// Carrier named in the content ("UPS", "DHL", "ARAMEX"), or an empty string
#[wasm_bindgen]
pub fn detect_carrier(content: &str) -> String {
    pricing::detect_carrier(content)
        .map(|c| c.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volumetric_weight() {
        assert!((volumetric_weight(50.0, 40.0, 30.0) - 12.0).abs() < 0.001);
        assert_eq!(volumetric_weight(50.0, 0.0, 30.0), 0.0);
    }

    #[test]
    fn test_chargeable_weight() {
        assert!((chargeable_weight(2.0, 50.0, 40.0, 30.0) - 12.0).abs() < 0.001);
        assert!((chargeable_weight(15.0, 50.0, 40.0, 30.0) - 15.0).abs() < 0.001);
        assert!((chargeable_weight(3.5, 0.0, 0.0, 0.0) - 3.5).abs() < 0.001);
        assert_eq!(chargeable_weight(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_uniform_total_weight() {
        assert!((uniform_total_weight(2.3, 3) - 7.0).abs() < 0.001);
        assert_eq!(uniform_total_weight(2.0, 0), 0.0);
    }

    #[test]
    fn test_oversized_input_reads_as_zero() {
        assert_eq!(volumetric_weight(1e11, 1e11, 1e11), 0.0);
        assert!((chargeable_weight(4.0, 1e11, 1e11, 1e11) - 4.0).abs() < 0.001);
        assert_eq!(chargeable_weight(1e20, 0.0, 0.0, 0.0), 0.0);
        assert_eq!(uniform_total_weight(1e27, 1000), 0.0);
    }

    #[test]
    fn test_mixed_breakdown() {
        let json = r#"[
            {"weight": 2, "length": 30, "width": 20, "height": 15},
            {"weight": 5, "length": 50, "width": 40, "height": 30, "quantity": 2}
        ]"#;
        let breakdown = mixed_breakdown(json).unwrap();
        assert_eq!(breakdown.total_rounded_weight, Decimal::from(26));
        assert_eq!(breakdown.summary.total_boxes, 3);

        assert!(mixed_breakdown("not json").unwrap_err().starts_with("Invalid boxes JSON"));
        assert!(mixed_breakdown("[]").is_err());
    }

    #[test]
    fn test_content_screening() {
        assert!(is_content_allowed("books"));
        assert!(!is_content_allowed("perfume"));
        assert!(content_rejection_reason("books").is_empty());
        assert!(!content_rejection_reason("perfume").is_empty());
    }

    #[test]
    fn test_names_and_carriers() {
        assert_eq!(normalize_destination("BİRLEŞİK KRALLIK"), "birlesik krallik");
        assert_eq!(detect_carrier("send via DHL"), "DHL");
        assert_eq!(detect_carrier("books"), "");
    }
}
