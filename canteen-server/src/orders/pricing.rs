//! Order pricing
//!
//! All money math runs through rust_decimal and rounds to 2 decimal places
//! (half-up) on the way back out. Models carry `f64`; nothing outside this
//! module multiplies prices.
//!
//! Line total = `(item.price + Σ option.price × option.quantity) × quantity`.
//! Order total = `Σ line totals + tip + service fee`, fixed once at assembly.

use rust_decimal::prelude::*;
use shared::models::{OrderItem, OrderItemModifier};

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Summed price of the selected options across a line's modifiers
fn options_total(modifiers: &[OrderItemModifier]) -> Decimal {
    modifiers
        .iter()
        .flat_map(|modifier| modifier.options.iter())
        .map(|option| to_decimal(option.price) * Decimal::from(option.quantity))
        .sum()
}

/// Total for one snapshotted order line
pub fn line_total(item: &OrderItem) -> f64 {
    let unit = to_decimal(item.price) + options_total(&item.modifiers);
    to_f64(unit * Decimal::from(item.quantity))
}

/// Total for the whole order: line totals plus tip and service fee
pub fn order_total(items: &[OrderItem], tip: f64, service_fee: f64) -> f64 {
    let subtotal: Decimal = items.iter().map(|item| to_decimal(line_total(item))).sum();
    to_f64(subtotal + to_decimal(tip) + to_decimal(service_fee))
}

/// What the employee pays after the company contribution
///
/// `contribution_pct` is the share of the total the company covers; the
/// employee pays `total × (100 − pct) / 100`. Out-of-range values are
/// clamped to 0-100.
pub fn employee_price(total: f64, contribution_pct: Option<f64>) -> f64 {
    match contribution_pct {
        Some(pct) => {
            let pct = to_decimal(pct.clamp(0.0, 100.0));
            let share = (Decimal::ONE_HUNDRED - pct) / Decimal::ONE_HUNDRED;
            to_f64(to_decimal(total) * share)
        }
        None => total,
    }
}
