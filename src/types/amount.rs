//! Integer amount arithmetic and display-unit conversion.
//!
//! ## Overview
//!
//! Every quantity in the exchange is an integer count of base units
//! (`Amount = u128`). Each denomination has a fixed decimal exponent that only
//! matters for display: `1.5` of an 8-decimal token is `150_000_000` base units.
//!
//! ## Proportional Fills
//!
//! `floor(a * b / c)` is computed through a 256-bit intermediate, so the product
//! of two 128-bit amounts never overflows and the quotient is exact before the
//! floor is applied. Floating point never touches an amount.
//!
//! ## Examples
//!
//! ```
//! use token_exchange::types::amount::{format_units_trimmed, mul_div_floor, parse_units};
//!
//! // 1000 * 200 / 500 = 400
//! assert_eq!(mul_div_floor(1000, 200, 500), Some(400));
//!
//! // 7 * 1 / 3 = 2.33.. -> 2
//! assert_eq!(mul_div_floor(7, 1, 3), Some(2));
//!
//! assert_eq!(parse_units("1.5", 8), Some(150_000_000));
//! assert_eq!(format_units_trimmed(150_000_000, 8).as_deref(), Some("1.5"));
//! ```

use primitive_types::U256;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Quantity of a denomination in base units.
pub type Amount = u128;

/// Largest decimal exponent a denomination may declare.
pub const MAX_DECIMALS: u32 = 18;

// ============================================================================
// Integer arithmetic
// ============================================================================

/// Compute `floor(a * b / c)` exactly.
///
/// # Returns
///
/// * `Some(q)` - the floored quotient
/// * `None` - if `c` is zero or the quotient does not fit in an `Amount`
pub fn mul_div_floor(a: Amount, b: Amount, c: Amount) -> Option<Amount> {
    if c == 0 {
        return None;
    }

    // (2^128 - 1)^2 < 2^256, the product cannot overflow
    let product = U256::from(a) * U256::from(b);
    let quotient = product / U256::from(c);

    if quotient > U256::from(Amount::MAX) {
        None
    } else {
        Some(quotient.as_u128())
    }
}

/// Compute `ceil(a / b)`.
///
/// Returns `None` if `b` is zero.
pub fn ceil_div(a: Amount, b: Amount) -> Option<Amount> {
    if b == 0 {
        return None;
    }
    let q = a / b;
    if a % b == 0 {
        Some(q)
    } else {
        Some(q + 1)
    }
}

// ============================================================================
// Display units (rust_decimal)
// ============================================================================

/// Convert a human decimal string into base units for a denomination with
/// `decimals` decimal places.
///
/// Rejects negatives, unparsable strings and values carrying more precision
/// than the denomination supports (nothing is rounded away).
///
/// # Example
///
/// ```
/// use token_exchange::types::amount::parse_units;
///
/// assert_eq!(parse_units("1", 6), Some(1_000_000));
/// assert_eq!(parse_units("0.000001", 6), Some(1));
/// assert_eq!(parse_units("0.0000001", 6), None);
/// ```
pub fn parse_units(s: &str, decimals: u32) -> Option<Amount> {
    if decimals > MAX_DECIMALS {
        return None;
    }

    let value = Decimal::from_str(s).ok()?.normalize();
    if value.is_sign_negative() && !value.is_zero() {
        return None;
    }
    if value.scale() > decimals {
        return None;
    }

    let scale = Decimal::from(10u64.pow(decimals));
    let scaled = value.checked_mul(scale)?;
    scaled.trunc().to_u128()
}

/// Render base units with trailing zeros removed.
///
/// Returns `None` when the amount exceeds the 96-bit mantissa of `Decimal`.
///
/// ```
/// use token_exchange::types::amount::format_units_trimmed;
///
/// assert_eq!(format_units_trimmed(150_000_000, 8).as_deref(), Some("1.5"));
/// ```
pub fn format_units_trimmed(amount: Amount, decimals: u32) -> Option<String> {
    let value = to_decimal(amount, decimals)?;
    Some(format!("{}", value.normalize()))
}

fn to_decimal(amount: Amount, decimals: u32) -> Option<Decimal> {
    if decimals > MAX_DECIMALS {
        return None;
    }
    let mantissa = i128::try_from(amount).ok()?;
    Decimal::try_from_i128_with_scale(mantissa, decimals).ok()
}

// ============================================================================
// Unit Tests
// ============================================================================
