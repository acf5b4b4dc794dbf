//! Decimal helpers shared by the tax calculations.
//!
//! Money is carried as [`Decimal`] throughout and rounded to cents with
//! half-up rounding at each derived figure.

use rust_decimal::{Decimal, RoundingStrategy};

pub const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(86506.685)), dec!(86506.69));
/// assert_eq!(round_half_up(dec!(-12.345)), dec!(-12.35));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Floors a value at zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::clamp_non_negative;
///
/// assert_eq!(clamp_non_negative(dec!(-8736)), dec!(0));
/// assert_eq!(clamp_non_negative(dec!(27264)), dec!(27264));
/// ```
pub fn clamp_non_negative(value: Decimal) -> Decimal {
    max(value, Decimal::ZERO)
}

/// Spreads an annual amount over twelve months, rounded to cents.
pub fn monthly(annual: Decimal) -> Decimal {
    round_half_up(annual / MONTHS_PER_YEAR)
}

/// Expresses `part` as a percentage of `whole`, rounded to two places.
///
/// Returns zero when `whole` is not positive instead of dividing by zero.
pub fn percentage_of(
    part: Decimal,
    whole: Decimal,
) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_half_up(part / whole * Decimal::ONE_HUNDRED)
}
