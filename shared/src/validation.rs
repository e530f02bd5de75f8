//! Validation utilities for shipment requests
//!
//! Includes Turkey-specific checks for the sender's identity number.

use rust_decimal::Decimal;

use crate::models::OrderStatus;

// ============================================================================
// Shipment Validations
// ============================================================================

pub const MAX_WEIGHT_KG: u32 = 10_000;
pub const MAX_DIMENSION_CM: u32 = 1_000;
pub const MAX_QUANTITY: i64 = 1_000;

/// Validate a package weight in kilograms
pub fn validate_weight(weight_kg: Decimal) -> Result<(), &'static str> {
    if weight_kg <= Decimal::ZERO {
        return Err("Weight must be greater than 0");
    }
    if weight_kg > Decimal::from(MAX_WEIGHT_KG) {
        return Err("Weight exceeds the maximum of 10000 kg");
    }
    Ok(())
}

/// Validate box dimensions in centimetres.
///
/// The upper bound keeps L × W × H well inside `Decimal` range.
pub fn validate_dimensions(length_cm: Decimal, width_cm: Decimal, height_cm: Decimal) -> Result<(), &'static str> {
    let sides = [length_cm, width_cm, height_cm];
    if sides.iter().any(|side| *side <= Decimal::ZERO) {
        return Err("All dimensions (length, width, height) must be greater than 0");
    }
    if sides.iter().any(|side| *side > Decimal::from(MAX_DIMENSION_CM)) {
        return Err("Dimensions exceed the maximum of 1000 cm per side");
    }
    Ok(())
}

/// Validate number of identical boxes
pub fn validate_quantity(quantity: i64) -> Result<(), &'static str> {
    if quantity < 1 {
        return Err("Quantity must be at least 1");
    }
    if quantity > MAX_QUANTITY {
        return Err("Quantity must be at most 1000");
    }
    Ok(())
}

/// Validate an order status change
pub fn validate_status_transition(from: OrderStatus, to: OrderStatus) -> Result<(), &'static str> {
    if from == to {
        return Ok(());
    }
    if from.is_final() {
        return Err("Order is already closed");
    }
    if !from.can_transition_to(to) {
        return Err("Invalid order status transition");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return Err("Invalid email format");
    };
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err("Invalid email format");
    }
    if email.len() < 5 || email.contains(char::is_whitespace) {
        return Err("Invalid email format");
    }
    Ok(())
}

/// Validate an international phone number
/// Accepts: +90 532 123 45 67, 0532-123-4567, (0212) 123 45 67
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let trimmed = phone.trim();
    if trimmed.is_empty() {
        return Err("Phone number is required");
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'))
    {
        return Err("Phone number contains invalid characters");
    }
    if trimmed.chars().skip(1).any(|c| c == '+') {
        return Err("Invalid phone number format");
    }

    let digits = trimmed.chars().filter(|c| c.is_ascii_digit()).count();
    if !(7..=15).contains(&digits) {
        return Err("Phone number must have 7 to 15 digits");
    }
    Ok(())
}

/// Validate a dialling code such as `+90` or `+971`
pub fn validate_phone_code(code: &str) -> Result<(), &'static str> {
    let Some(digits) = code.trim().strip_prefix('+') else {
        return Err("Phone code must start with +");
    };
    if digits.is_empty() || digits.len() > 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err("Invalid phone code");
    }
    Ok(())
}

// ============================================================================
// Turkey-Specific Validations
// ============================================================================

/// Validate Turkish national identity number (TC Kimlik No)
/// 11 digits, first digit non-zero, two checksum digits
pub fn validate_tc_kimlik_no(id: &str) -> Result<(), &'static str> {
    let id = id.trim();
    if id.len() != 11 || !id.chars().all(|c| c.is_ascii_digit()) {
        return Err("TC Kimlik No must be 11 digits");
    }

    let d: Vec<i32> = id
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|v| v as i32)
        .collect();
    if d[0] == 0 {
        return Err("TC Kimlik No cannot start with 0");
    }

    let odd_sum = d[0] + d[2] + d[4] + d[6] + d[8];
    let even_sum = d[1] + d[3] + d[5] + d[7];
    let tenth = (odd_sum * 7 - even_sum).rem_euclid(10);
    if tenth != d[9] {
        return Err("Invalid TC Kimlik No checksum");
    }

    let eleventh = d.iter().take(10).sum::<i32>() % 10;
    if eleventh != d[10] {
        return Err("Invalid TC Kimlik No checksum");
    }

    Ok(())
}
