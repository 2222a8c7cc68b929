//! Fixed-point price conversion.
//!
//! ## Overview
//!
//! Books are indexed by integer ticks, never by the caller's decimal price,
//! so that level lookups and comparisons cannot drift. A tick is
//! `price * 10^precision` with the fractional remainder discarded.
//!
//! ## Truncation
//!
//! Conversion truncates toward zero. It does NOT round: at precision 4,
//! `100.00049` becomes tick `1_000_004`, not `1_000_005`.
//!
//! ## Examples
//!
//! ```
//! use std::str::FromStr;
//! use rust_decimal::Decimal;
//! use call_auction::types::price::{to_tick, to_decimal};
//!
//! let tick = to_tick(Decimal::from_str("50.12345").unwrap(), 4).unwrap();
//! assert_eq!(tick, 501_234);
//!
//! assert_eq!(to_decimal(501_234, 4), Decimal::from_str("50.1234").unwrap());
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::error::ConfigError;
use crate::types::Tick;

/// Highest supported precision (decimal places).
///
/// 10^12 leaves room for prices up to ~18 million before a tick overflows u64.
pub const MAX_PRECISION: u32 = 12;

/// Precision used when none is configured: 4 decimal places.
pub const DEFAULT_PRECISION: u32 = 4;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert a decimal price to a tick, truncating toward zero.
///
/// # Returns
///
/// * `Some(Tick)` - The fixed-point representation
/// * `None` - If the price is negative, the precision is unsupported,
///   or the tick does not fit in a u64
///
/// # Example
///
/// ```
/// use std::str::FromStr;
/// use rust_decimal::Decimal;
/// use call_auction::types::price::to_tick;
///
/// assert_eq!(to_tick(Decimal::from_str("99.99999").unwrap(), 4), Some(999_999));
/// assert_eq!(to_tick(Decimal::from_str("-1").unwrap(), 4), None);
/// ```
pub fn to_tick(price: Decimal, precision: u32) -> Option<Tick> {
    if price.is_sign_negative() || precision > MAX_PRECISION {
        return None;
    }

    let scaled = price.checked_mul(Decimal::from(scale(precision)))?;
    scaled.trunc().to_u64()
}

/// Convert a tick back to its decimal price.
///
/// The division is exact: `to_decimal(to_tick(p))` is `p` with the digits
/// beyond the precision dropped.
pub fn to_decimal(tick: Tick, precision: u32) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(tick), precision.min(MAX_PRECISION))
}

/// `10^precision` as an integer
fn scale(precision: u32) -> u64 {
    10u64.pow(precision)
}

// ============================================================================
// Converter bound to one venue precision
// ============================================================================

/// Price converter fixed to one venue-wide precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceConverter {
    precision: u32,
}

impl PriceConverter {
    /// Create a converter, rejecting precisions above [`MAX_PRECISION`].
    pub fn new(precision: u32) -> Result<Self, ConfigError> {
        if precision > MAX_PRECISION {
            return Err(ConfigError::PrecisionOutOfRange {
                precision,
                max: MAX_PRECISION,
            });
        }
        Ok(Self { precision })
    }

    /// Decimal places represented by one tick
    #[inline]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// See [`to_tick`]
    #[inline]
    pub fn to_tick(&self, price: Decimal) -> Option<Tick> {
        to_tick(price, self.precision)
    }

    /// See [`to_decimal`]
    #[inline]
    pub fn to_decimal(&self, tick: Tick) -> Decimal {
        to_decimal(tick, self.precision)
    }
}

impl Default for PriceConverter {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
