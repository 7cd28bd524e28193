//! Fixed-point price and size utilities.
//!
//! Prices and sizes are `u64` values scaled by 10^8, giving 8 decimal
//! places. Integer keys keep price levels exact: two orders at "100.1" always
//! land on the same level, which a floating-point key cannot promise.
//!
//! ## Examples
//!
//! ```
//! use orderbook_core::types::price::{to_fixed, from_fixed};
//!
//! let price = to_fixed("2000.5").unwrap();
//! assert_eq!(price, 200_050_000_000);
//! assert_eq!(from_fixed(price), "2000.50000000");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor for fixed-point arithmetic: 10^8
pub const SCALE: u64 = 100_000_000;

/// Largest whole-unit value that still fits once scaled
pub const MAX_VALUE: u64 = u64::MAX / SCALE;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert a decimal string to fixed-point.
///
/// Returns `None` for unparsable, negative or out-of-range input.
///
/// ```
/// use orderbook_core::types::price::to_fixed;
///
/// assert_eq!(to_fixed("1.0"), Some(100_000_000));
/// assert_eq!(to_fixed("0.00000001"), Some(1));
/// assert_eq!(to_fixed("-3"), None);
/// ```
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a `Decimal` to fixed-point, rounding to 8 places.
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    scaled.round_dp(0).to_u64()
}

pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Render with all 8 decimal places.
pub fn from_fixed(value: u64) -> String {
    format!("{:.8}", fixed_to_decimal(value))
}

/// Render without trailing zeros.
///
/// ```
/// use orderbook_core::types::price::from_fixed_trimmed;
///
/// assert_eq!(from_fixed_trimmed(100_000_000), "1");
/// assert_eq!(from_fixed_trimmed(150_000_000), "1.5");
/// ```
pub fn from_fixed_trimmed(value: u64) -> String {
    format!("{}", fixed_to_decimal(value).normalize())
}

/// Multiply two fixed-point values, keeping the result scaled by 10^8.
///
/// Returns `None` on overflow.
pub fn checked_mul(a: u64, b: u64) -> Option<u64> {
    let result = fixed_to_decimal(a).checked_mul(fixed_to_decimal(b))?;
    decimal_to_fixed(result)
}

// ============================================================================
// Unit Tests
// ============================================================================
