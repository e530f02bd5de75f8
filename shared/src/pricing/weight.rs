//! Chargeable weight: actual vs. volumetric, per box and per shipment

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::error::PricingError;
use crate::validation::{validate_dimensions, validate_quantity, validate_weight};

/// Cubic centimetres per volumetric kilogram
pub const VOLUMETRIC_DIVISOR: u32 = 5000;

/// Box dimensions in centimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length_cm: Decimal,
    pub width_cm: Decimal,
    pub height_cm: Decimal,
}

impl Dimensions {
    pub fn new(length_cm: Decimal, width_cm: Decimal, height_cm: Decimal) -> Self {
        Self {
            length_cm,
            width_cm,
            height_cm,
        }
    }

    /// Build from optional parts; any missing or non-positive side means no dimensions
    pub fn from_parts(
        length_cm: Option<Decimal>,
        width_cm: Option<Decimal>,
        height_cm: Option<Decimal>,
    ) -> Option<Self> {
        let dims = Self::new(length_cm?, width_cm?, height_cm?);
        dims.is_complete().then_some(dims)
    }

    pub fn is_complete(&self) -> bool {
        self.length_cm > Decimal::ZERO && self.width_cm > Decimal::ZERO && self.height_cm > Decimal::ZERO
    }

    pub fn volumetric_weight(&self) -> Decimal {
        self.length_cm * self.width_cm * self.height_cm / Decimal::from(VOLUMETRIC_DIVISOR)
    }

    /// `"50×40×30cm"`
    pub fn label(&self) -> String {
        format!(
            "{}×{}×{}cm",
            self.length_cm.normalize(),
            self.width_cm.normalize(),
            self.height_cm.normalize()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightResult {
    pub volumetric_weight_kg: Option<Decimal>,
    pub chargeable_weight_kg: Decimal,
}

/// Chargeable weight of one box.
///
/// `None` when neither a positive actual weight nor complete dimensions were given.
pub fn chargeable_weight(actual_kg: Option<Decimal>, dimensions: Option<&Dimensions>) -> Option<WeightResult> {
    let actual = actual_kg.filter(|w| *w > Decimal::ZERO);
    let volumetric = dimensions
        .filter(|d| d.is_complete())
        .map(Dimensions::volumetric_weight);

    let chargeable = match (actual, volumetric) {
        (Some(a), Some(v)) => a.max(v),
        (Some(a), None) => a,
        (None, Some(v)) => v,
        (None, None) => return None,
    };

    (chargeable > Decimal::ZERO).then_some(WeightResult {
        volumetric_weight_kg: volumetric,
        chargeable_weight_kg: chargeable,
    })
}

/// Shipment weight for `quantity` identical boxes, rounded up to a whole kilogram
pub fn total_chargeable_weight(per_box_kg: Decimal, quantity: u32) -> Decimal {
    (per_box_kg * Decimal::from(quantity)).ceil()
}

// ============================================================================
// Mixed boxes
// ============================================================================

/// One box type in a mixed shipment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxSpec {
    #[serde(rename = "weight")]
    pub actual_weight_kg: Decimal,
    #[serde(rename = "length")]
    pub length_cm: Decimal,
    #[serde(rename = "width")]
    pub width_cm: Decimal,
    #[serde(rename = "height")]
    pub height_cm: Decimal,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl BoxSpec {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.length_cm, self.width_cm, self.height_cm)
    }

    /// Check every field; `position` is 1-based and only used in the message
    pub fn validate(&self, position: usize) -> Result<(), PricingError> {
        validate_weight(self.actual_weight_kg)
            .and_then(|_| validate_dimensions(self.length_cm, self.width_cm, self.height_cm))
            .and_then(|_| validate_quantity(i64::from(self.quantity)))
            .map_err(|message| PricingError::InvalidInput(format!("Box {}: {}.", position, message)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxCalculation {
    pub box_number: usize,
    pub actual_weight: Decimal,
    pub volumetric_weight: Decimal,
    pub chargeable_weight: Decimal,
    pub quantity: u32,
    pub total_chargeable_weight: Decimal,
    pub dimensions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixedBoxSummary {
    pub total_boxes: u32,
    pub total_actual_weight: Decimal,
    pub total_volumetric_weight: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixedBoxCalculation {
    /// Unrounded sum, reported to 2 dp
    pub total_chargeable_weight: Decimal,
    /// The only figure used for pricing
    pub total_rounded_weight: Decimal,
    pub box_calculations: Vec<BoxCalculation>,
    pub summary: MixedBoxSummary,
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Aggregate heterogeneous boxes, rounding up once over the whole shipment
pub fn mixed_boxes(boxes: &[BoxSpec]) -> Result<MixedBoxCalculation, PricingError> {
    if boxes.is_empty() {
        return Err(PricingError::InvalidInput(
            "Boxes array is required with at least one box.".to_string(),
        ));
    }

    let mut total_chargeable = Decimal::ZERO;
    let mut total_actual = Decimal::ZERO;
    let mut total_volumetric = Decimal::ZERO;
    let mut total_boxes = 0u32;
    let mut box_calculations = Vec::with_capacity(boxes.len());

    for (index, spec) in boxes.iter().enumerate() {
        spec.validate(index + 1)?;

        let dims = spec.dimensions();
        let volumetric = dims.volumetric_weight();
        let chargeable = spec.actual_weight_kg.max(volumetric);
        let quantity = Decimal::from(spec.quantity);
        let line_total = chargeable * quantity;

        total_chargeable += line_total;
        total_actual += spec.actual_weight_kg * quantity;
        total_volumetric += volumetric * quantity;
        total_boxes += spec.quantity;

        box_calculations.push(BoxCalculation {
            box_number: index + 1,
            actual_weight: spec.actual_weight_kg,
            volumetric_weight: round2(volumetric),
            chargeable_weight: round2(chargeable),
            quantity: spec.quantity,
            total_chargeable_weight: round2(line_total),
            dimensions: dims.label(),
        });
    }

    Ok(MixedBoxCalculation {
        total_chargeable_weight: round2(total_chargeable),
        total_rounded_weight: total_chargeable.ceil(),
        box_calculations,
        summary: MixedBoxSummary {
            total_boxes,
            total_actual_weight: round2(total_actual),
            total_volumetric_weight: round2(total_volumetric),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn boxed(w: &str, l: &str, wi: &str, h: &str, quantity: u32) -> BoxSpec {
        BoxSpec {
            actual_weight_kg: dec(w),
            length_cm: dec(l),
            width_cm: dec(wi),
            height_cm: dec(h),
            quantity,
        }
    }

    #[test]
    fn test_volumetric_dominates() {
        let dims = Dimensions::new(dec("50"), dec("40"), dec("30"));
        let result = chargeable_weight(Some(dec("1")), Some(&dims)).unwrap();
        assert_eq!(result.volumetric_weight_kg, Some(dec("12")));
        assert_eq!(result.chargeable_weight_kg, dec("12"));
    }

    #[test]
    fn test_actual_dominates() {
        let dims = Dimensions::new(dec("10"), dec("10"), dec("10"));
        let result = chargeable_weight(Some(dec("5")), Some(&dims)).unwrap();
        assert_eq!(result.chargeable_weight_kg, dec("5"));
        assert_eq!(result.volumetric_weight_kg, Some(dec("0.2")));
    }

    #[test]
    fn test_single_source() {
        assert_eq!(chargeable_weight(Some(dec("3")), None).unwrap().chargeable_weight_kg, dec("3"));
        let dims = Dimensions::new(dec("20"), dec("25"), dec("10"));
        assert_eq!(chargeable_weight(None, Some(&dims)).unwrap().chargeable_weight_kg, dec("1"));
    }

    #[test]
    fn test_zero_means_absent() {
        assert!(chargeable_weight(Some(Decimal::ZERO), None).is_none());
        assert!(chargeable_weight(None, None).is_none());
        let flat = Dimensions::new(dec("20"), dec("0"), dec("10"));
        assert!(chargeable_weight(None, Some(&flat)).is_none());
        assert!(Dimensions::from_parts(Some(dec("1")), None, Some(dec("1"))).is_none());
    }

    #[test]
    fn test_ceiling_applied_once() {
        assert_eq!(total_chargeable_weight(dec("2.3"), 3), dec("7"));
        assert_eq!(total_chargeable_weight(dec("5"), 1), dec("5"));
        assert_eq!(total_chargeable_weight(dec("0.1"), 1), dec("1"));
    }

    #[test]
    fn test_mixed_boxes_aggregate() {
        let calc = mixed_boxes(&[
            boxed("2", "30", "20", "15", 1),
            boxed("5", "50", "40", "30", 2),
        ])
        .unwrap();

        assert_eq!(calc.total_chargeable_weight, dec("26"));
        assert_eq!(calc.total_rounded_weight, dec("26"));
        assert_eq!(calc.summary.total_boxes, 3);
        assert_eq!(calc.summary.total_actual_weight, dec("12"));
        assert_eq!(calc.summary.total_volumetric_weight, dec("25.8"));
        assert_eq!(calc.box_calculations[0].volumetric_weight, dec("1.8"));
        assert_eq!(calc.box_calculations[0].chargeable_weight, dec("2"));
        assert_eq!(calc.box_calculations[1].total_chargeable_weight, dec("24"));
        assert_eq!(calc.box_calculations[1].dimensions, "50×40×30cm");
    }

    #[test]
    fn test_mixed_boxes_rejects_invalid_box() {
        let err = mixed_boxes(&[boxed("2", "30", "20", "15", 1), boxed("0", "1", "1", "1", 1)]).unwrap_err();
        assert_eq!(
            err,
            PricingError::InvalidInput("Box 2: Weight must be greater than 0.".to_string())
        );
        assert!(mixed_boxes(&[]).is_err());
    }

    #[test]
    fn test_mixed_boxes_rejects_oversized_box_before_multiplying() {
        let huge = "100000000000";
        let err = mixed_boxes(&[boxed("1", huge, huge, huge, 1)]).unwrap_err();
        assert_eq!(
            err,
            PricingError::InvalidInput("Box 1: Dimensions exceed the maximum of 1000 cm per side.".to_string())
        );

        let err = mixed_boxes(&[boxed("2", "30", "20", "15", 1), boxed("2", "30", "20", "15", 5000)]).unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput(ref msg) if msg.starts_with("Box 2: Quantity")));
    }

    #[test]
    fn test_box_spec_json_shape() {
        let spec: BoxSpec =
            serde_json::from_str(r#"{"weight": 2.5, "length": 30, "width": 20, "height": 15}"#).unwrap();
        assert_eq!(spec.quantity, 1);
        assert_eq!(spec.actual_weight_kg, dec("2.5"));
    }
}
