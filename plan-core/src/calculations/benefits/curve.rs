//! Benefit amount as a function of claiming age.
//!
//! Claiming before full retirement age (FRA) reduces the PIA by 5/9% per
//! month for the first 36 months and 5/12% per month beyond that. Claiming
//! after FRA raises it by 2/3% per month, up to the latest claiming age.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use plan_core::{Age, RuleBook};
//! use plan_core::calculations::benefits::BenefitCurveCalculator;
//!
//! let book = RuleBook::builtin();
//! let curve = BenefitCurveCalculator::new(book.benefit_rules(2025).unwrap());
//! let fra = curve.full_retirement_age(1960);
//!
//! assert_eq!(curve.monthly_benefit(dec!(2000), fra, Age::years(62)), dec!(1400.00));
//! assert_eq!(curve.monthly_benefit(dec!(2000), fra, Age::years(70)), dec!(2480.00));
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::{non_negative, round_half_up};
use crate::models::Age;
use crate::rules::{BenefitRules, MonthlyRate};

#[derive(Debug, Clone, Copy)]
pub struct BenefitCurveCalculator<'a> {
    rules: &'a BenefitRules,
}

impl<'a> BenefitCurveCalculator<'a> {
    pub fn new(rules: &'a BenefitRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'a BenefitRules {
        self.rules
    }

    pub fn full_retirement_age(
        &self,
        birth_year: i32,
    ) -> Age {
        self.rules.full_retirement_age(birth_year)
    }

    /// PIA from average annual indexed earnings via the bend-point formula.
    pub fn primary_insurance_amount(
        &self,
        average_annual_earnings: Decimal,
    ) -> Decimal {
        let aime = non_negative(average_annual_earnings) / Decimal::from(12);
        let [first_bend, second_bend] = self.rules.bend_points;
        let [low, middle, high] = self.rules.pia_factors;

        let pia = low * aime.min(first_bend)
            + middle * non_negative(aime.min(second_bend) - first_bend)
            + high * non_negative(aime - second_bend);
        round_half_up(pia)
    }

    /// Multiplier applied to the PIA when claiming at `claiming_age`.
    ///
    /// The claiming age is clamped to the claiming window first.
    pub fn adjustment_factor(
        &self,
        full_retirement_age: Age,
        claiming_age: Age,
    ) -> Decimal {
        let claiming_age = self.clamp_to_window(claiming_age);

        if claiming_age < full_retirement_age {
            let months_early = claiming_age.months_until(full_retirement_age);
            Decimal::ONE
                - self.tiered_reduction(
                    months_early,
                    self.rules.early_reduction_first,
                    self.rules.early_reduction_beyond,
                )
        } else {
            let months_delayed = full_retirement_age.months_until(claiming_age);
            Decimal::ONE + self.rules.delayed_increase.over_months(months_delayed)
        }
    }

    /// Own monthly benefit when claiming at `claiming_age`.
    pub fn monthly_benefit(
        &self,
        primary_insurance_amount: Decimal,
        full_retirement_age: Age,
        claiming_age: Age,
    ) -> Decimal {
        round_half_up(
            primary_insurance_amount * self.adjustment_factor(full_retirement_age, claiming_age),
        )
    }

    /// Spousal benefit on a worker's record, reduced for claiming before the
    /// spouse's own FRA. There is no delayed credit on spousal benefits.
    pub fn spousal_amount(
        &self,
        worker_pia: Decimal,
        spouse_full_retirement_age: Age,
        spouse_claiming_age: Age,
    ) -> Decimal {
        let claiming_age = self.clamp_to_window(spouse_claiming_age);
        let months_early = claiming_age.months_until(spouse_full_retirement_age);
        let reduction = self.tiered_reduction(
            months_early,
            self.rules.spousal_reduction_first,
            self.rules.spousal_reduction_beyond,
        );
        round_half_up(worker_pia * self.rules.spousal_fraction * (Decimal::ONE - reduction))
    }

    /// Greater of a person's own benefit or the spousal benefit on the other
    /// person's record.
    pub fn spousal_benefit(
        &self,
        own_benefit: Decimal,
        worker_pia: Decimal,
        spouse_full_retirement_age: Age,
        spouse_claiming_age: Age,
    ) -> Decimal {
        own_benefit.max(self.spousal_amount(
            worker_pia,
            spouse_full_retirement_age,
            spouse_claiming_age,
        ))
    }

    /// Survivor benefit on a deceased spouse's benefit.
    ///
    /// Full at or after the survivor's FRA. Between the earliest survivor
    /// age and FRA the reduction grows linearly to the maximum reduction;
    /// ages below the earliest survivor age are treated as that age.
    pub fn survivor_benefit(
        &self,
        deceased_benefit: Decimal,
        survivor_full_retirement_age: Age,
        survivor_age: Age,
    ) -> Decimal {
        if survivor_age >= survivor_full_retirement_age {
            return round_half_up(deceased_benefit);
        }

        let earliest = self.rules.survivor_earliest_age;
        let window = earliest.months_until(survivor_full_retirement_age);
        if window == 0 {
            return round_half_up(deceased_benefit);
        }
        let age = survivor_age.max(earliest);
        let months_early = age.months_until(survivor_full_retirement_age);
        let reduction = self.rules.survivor_max_reduction * Decimal::from(months_early)
            / Decimal::from(window);

        round_half_up(deceased_benefit * (Decimal::ONE - reduction))
    }

    fn tiered_reduction(
        &self,
        months_early: u32,
        first: MonthlyRate,
        beyond: MonthlyRate,
    ) -> Decimal {
        let first_months = months_early.min(self.rules.early_reduction_months);
        let beyond_months = months_early - first_months;
        first.over_months(first_months) + beyond.over_months(beyond_months)
    }

    fn clamp_to_window(
        &self,
        age: Age,
    ) -> Age {
        age.clamp(
            self.rules.earliest_claiming_age,
            self.rules.latest_claiming_age,
        )
    }
}
