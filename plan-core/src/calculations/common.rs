//! Shared numeric helpers for the tax and benefit calculators.
//!
//! Every dollar figure the engine reports goes through [`round_half_up`];
//! rates and adjustment factors are never rounded before they are applied.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use plan_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a rate (effective tax rate, adjustment factor shown to a user) to
/// four decimal places.
///
/// ```
/// use rust_decimal_macros::dec;
/// use plan_core::calculations::common::round_rate;
///
/// assert_eq!(round_rate(dec!(0.123456)), dec!(0.1235));
/// ```
pub fn round_rate(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps a value at zero from below.
///
/// ```
/// use rust_decimal_macros::dec;
/// use plan_core::calculations::common::non_negative;
///
/// assert_eq!(non_negative(dec!(-12.50)), dec!(0));
/// assert_eq!(non_negative(dec!(12.50)), dec!(12.50));
/// ```
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Half of a value, the ratio used by the provisional-income and spousal rules.
pub(crate) fn half(value: Decimal) -> Decimal {
    value / Decimal::TWO
}
