//! Progressive bracket math.
//!
//! [`ProgressiveBracketEngine::tax_on_amount`] taxes an amount starting from
//! zero. [`ProgressiveBracketEngine::tax_stacked_on`] taxes an amount that
//! sits on top of income already taxed elsewhere, which is how qualified
//! dividends and long-term gains fill the preferential brackets above
//! ordinary taxable income.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use plan_core::BracketSchedule;
//! use plan_core::calculations::tax::ProgressiveBracketEngine;
//!
//! let schedule =
//!     BracketSchedule::from_edges(&[dec!(10000)], &[dec!(0.10), dec!(0.22)]).unwrap();
//! let engine = ProgressiveBracketEngine::new(&schedule);
//!
//! let result = engine.tax_on_amount(dec!(15000));
//!
//! assert_eq!(result.tax, dec!(2100.00));
//! assert_eq!(result.breakdown.len(), 2);
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::round_half_up;
use crate::models::{BracketSchedule, BracketSlice, BracketTax};

#[derive(Debug, Clone, Copy)]
pub struct ProgressiveBracketEngine<'a> {
    schedule: &'a BracketSchedule,
}

impl<'a> ProgressiveBracketEngine<'a> {
    pub fn new(schedule: &'a BracketSchedule) -> Self {
        Self { schedule }
    }

    /// Tax on `amount` filled from the bottom bracket up.
    ///
    /// Non-positive amounts owe nothing and produce an empty breakdown.
    pub fn tax_on_amount(
        &self,
        amount: Decimal,
    ) -> BracketTax {
        self.tax_stacked_on(Decimal::ZERO, amount)
    }

    /// Tax on `amount` when `floor` of income already occupies the lower
    /// part of the schedule.
    ///
    /// Each bracket offers `max(0, upper - floor)` of room; after a bracket
    /// is visited the floor rises to at least its upper bound.
    pub fn tax_stacked_on(
        &self,
        floor: Decimal,
        amount: Decimal,
    ) -> BracketTax {
        let mut remaining = amount;
        let mut floor = floor.max(Decimal::ZERO);
        let mut tax = Decimal::ZERO;
        let mut breakdown = Vec::new();

        for bracket in self.schedule.brackets() {
            if remaining <= Decimal::ZERO {
                break;
            }

            let room = match bracket.max_income {
                Some(upper) => (upper - floor.max(bracket.min_income)).max(Decimal::ZERO),
                None => remaining,
            };
            let slice = remaining.min(room);

            if slice > Decimal::ZERO {
                let slice_tax = slice * bracket.tax_rate;
                tax += slice_tax;
                remaining -= slice;
                breakdown.push(BracketSlice {
                    min_income: bracket.min_income,
                    max_income: bracket.max_income,
                    tax_rate: bracket.tax_rate,
                    taxable_amount: slice,
                    tax: round_half_up(slice_tax),
                });
            }

            if let Some(upper) = bracket.max_income {
                floor = floor.max(upper);
            }
        }

        BracketTax {
            tax: round_half_up(tax),
            breakdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    use super::*;

    fn two_tier() -> BracketSchedule {
        BracketSchedule::from_edges(&[dec!(10000)], &[dec!(0.10), dec!(0.22)])
            .expect("valid schedule")
    }

    fn preferential() -> BracketSchedule {
        BracketSchedule::from_edges(
            &[dec!(48350), dec!(533400)],
            &[dec!(0.00), dec!(0.15), dec!(0.20)],
        )
        .expect("valid schedule")
    }

    // =========================================================================
    // tax_on_amount tests
    // =========================================================================

    #[test]
    fn tax_on_amount_zero_is_zero() {
        let schedule = two_tier();
        let result = ProgressiveBracketEngine::new(&schedule).tax_on_amount(dec!(0));

        assert_eq!(result.tax, dec!(0));
        assert!(result.breakdown.is_empty());
    }

    #[test]
    fn tax_on_amount_negative_is_zero() {
        let schedule = two_tier();
        let result = ProgressiveBracketEngine::new(&schedule).tax_on_amount(dec!(-500));

        assert_eq!(result, BracketTax::default());
    }

    #[test]
    fn tax_on_amount_two_tier_15000() {
        let schedule = two_tier();
        let result = ProgressiveBracketEngine::new(&schedule).tax_on_amount(dec!(15000));

        assert_eq!(result.tax, dec!(2100.00));
        assert_eq!(
            result.breakdown,
            vec![
                BracketSlice {
                    min_income: dec!(0),
                    max_income: Some(dec!(10000)),
                    tax_rate: dec!(0.10),
                    taxable_amount: dec!(10000),
                    tax: dec!(1000.00),
                },
                BracketSlice {
                    min_income: dec!(10000),
                    max_income: None,
                    tax_rate: dec!(0.22),
                    taxable_amount: dec!(5000),
                    tax: dec!(1100.00),
                },
            ]
        );
    }

    #[test]
    fn tax_on_amount_within_first_bracket_emits_one_slice() {
        let schedule = two_tier();
        let result = ProgressiveBracketEngine::new(&schedule).tax_on_amount(dec!(4000));

        assert_eq!(result.tax, dec!(400.00));
        assert_eq!(result.breakdown.len(), 1);
        assert_eq!(result.marginal_rate(), Some(dec!(0.10)));
    }

    #[test]
    fn tax_on_amount_exactly_at_edge_stays_in_lower_bracket() {
        let schedule = two_tier();
        let result = ProgressiveBracketEngine::new(&schedule).tax_on_amount(dec!(10000));

        assert_eq!(result.tax, dec!(1000.00));
        assert_eq!(result.breakdown.len(), 1);
    }

    #[test]
    fn tax_on_amount_rounds_total_half_up() {
        let schedule = two_tier();
        let result = ProgressiveBracketEngine::new(&schedule).tax_on_amount(dec!(0.05));

        assert_eq!(result.tax, dec!(0.01));
    }

    // =========================================================================
    // tax_stacked_on tests
    // =========================================================================

    #[test]
    fn stacked_gains_below_zero_rate_ceiling_owe_nothing() {
        let schedule = preferential();
        let result =
            ProgressiveBracketEngine::new(&schedule).tax_stacked_on(dec!(30000), dec!(10000));

        assert_eq!(result.tax, dec!(0.00));
        assert_eq!(result.taxed_amount(), dec!(10000));
    }

    #[test]
    fn stacked_gains_straddle_zero_and_fifteen_percent() {
        let schedule = preferential();
        let result =
            ProgressiveBracketEngine::new(&schedule).tax_stacked_on(dec!(40000), dec!(20000));

        // 8,350 at 0% then 11,650 at 15%.
        assert_eq!(result.tax, dec!(1747.50));
        assert_eq!(result.breakdown[0].taxable_amount, dec!(8350));
        assert_eq!(result.breakdown[1].taxable_amount, dec!(11650));
    }

    #[test]
    fn stacked_gains_above_first_edge_skip_zero_bracket() {
        let schedule = preferential();
        let result =
            ProgressiveBracketEngine::new(&schedule).tax_stacked_on(dec!(100000), dec!(10000));

        assert_eq!(result.tax, dec!(1500.00));
        assert_eq!(result.breakdown.len(), 1);
        assert_eq!(result.breakdown[0].tax_rate, dec!(0.15));
    }

    #[test]
    fn stacked_on_zero_floor_matches_tax_on_amount() {
        let schedule = preferential();
        let engine = ProgressiveBracketEngine::new(&schedule);

        assert_eq!(
            engine.tax_stacked_on(dec!(0), dec!(600000)),
            engine.tax_on_amount(dec!(600000))
        );
    }

    // =========================================================================
    // Properties
    // =========================================================================

    fn cents() -> impl Strategy<Value = Decimal> {
        (0i64..200_000_000).prop_map(|c| Decimal::new(c, 2))
    }

    proptest! {
        #[test]
        fn tax_is_monotonic_in_amount(a in cents(), b in cents()) {
            let schedule = preferential();
            let engine = ProgressiveBracketEngine::new(&schedule);
            let (low, high) = if a <= b { (a, b) } else { (b, a) };

            prop_assert!(engine.tax_on_amount(low).tax <= engine.tax_on_amount(high).tax);
        }

        #[test]
        fn breakdown_sums_to_amount(amount in cents(), floor in cents()) {
            let schedule = two_tier();
            let engine = ProgressiveBracketEngine::new(&schedule);

            prop_assert_eq!(engine.tax_on_amount(amount).taxed_amount(), amount);
            prop_assert_eq!(engine.tax_stacked_on(floor, amount).taxed_amount(), amount);
        }
    }
}
