//! Price lookup over weight brackets

use rust_decimal::Decimal;

use super::error::PricingError;
use super::reference::{CountryRateTable, RegionRateTable, WeightBracket};

/// Weights strictly above this many kilograms are charged per kg
pub const OVERAGE_THRESHOLD_KG: u32 = 70;

/// Unrounded price for `weight` kg in `zone`.
///
/// Above the overage threshold the per-kg overage rate applies. Otherwise an
/// exact bracket wins, weights outside the table clamp to the nearest end, and
/// anything in between is interpolated linearly.
pub fn region_price(table: &RegionRateTable, weight: Decimal, zone: u8) -> Result<Decimal, PricingError> {
    let unavailable = || PricingError::PriceUnavailable {
        weight,
        region: zone.to_string(),
    };

    if weight > Decimal::from(OVERAGE_THRESHOLD_KG) {
        let rate = table.overage_rate(zone).ok_or_else(unavailable)?;
        return Ok(weight * rate);
    }

    let brackets = &table.sorted_brackets;
    let price_of = |w: Decimal| table.price(WeightBracket::Kg(w), zone);

    if let Some(price) = price_of(weight) {
        return Ok(price);
    }

    let (first, last) = match (brackets.first(), brackets.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(unavailable()),
    };

    if weight <= first {
        return price_of(first).ok_or_else(unavailable);
    }
    if weight >= last {
        return price_of(last).ok_or_else(unavailable);
    }

    // first bracket strictly above the weight; the one before it is strictly below
    let upper_index = brackets.partition_point(|b| *b <= weight);
    let (lower, upper) = (brackets[upper_index - 1], brackets[upper_index]);

    let lower_price = price_of(lower).ok_or_else(unavailable)?;
    let upper_price = price_of(upper).ok_or_else(unavailable)?;
    let ratio = (weight - lower) / (upper - lower);

    Ok(lower_price + (upper_price - lower_price) * ratio)
}

/// Unrounded flat price: weight × the country's per-kg rate
pub fn country_price(table: &CountryRateTable, weight: Decimal, country: &str) -> Result<Decimal, PricingError> {
    table
        .rate_of
        .get(country)
        .map(|rate| weight * rate)
        .ok_or_else(|| PricingError::PriceUnavailable {
            weight,
            region: country.to_string(),
        })
}
