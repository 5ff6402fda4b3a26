use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::curve::BenefitCurveCalculator;
use crate::models::Age;

/// Finds the age at which a later claim's cumulative benefits catch up with
/// an earlier claim's.
///
/// The scan advances one month at a time from the later claiming age and
/// stops at the rule book's break-even horizon.
#[derive(Debug, Clone, Copy)]
pub struct BreakEvenSolver<'a> {
    curve: BenefitCurveCalculator<'a>,
}

impl<'a> BreakEvenSolver<'a> {
    pub fn new(curve: BenefitCurveCalculator<'a>) -> Self {
        Self { curve }
    }

    /// Total received by `age` from a claim at `claiming_age`.
    pub fn cumulative(
        monthly_benefit: Decimal,
        claiming_age: Age,
        age: Age,
    ) -> Decimal {
        monthly_benefit * Decimal::from(claiming_age.months_until(age))
    }

    /// Break-even between claiming at `earlier` and `later` for one PIA.
    pub fn solve(
        &self,
        primary_insurance_amount: Decimal,
        full_retirement_age: Age,
        earlier: Age,
        later: Age,
    ) -> Option<Age> {
        let earlier_monthly =
            self.curve
                .monthly_benefit(primary_insurance_amount, full_retirement_age, earlier);
        let later_monthly =
            self.curve
                .monthly_benefit(primary_insurance_amount, full_retirement_age, later);
        self.crossing(earlier_monthly, earlier, later_monthly, later)
    }

    /// First age, scanning monthly from `later`, at which the later claim's
    /// cumulative total is at least the earlier claim's.
    pub fn crossing(
        &self,
        earlier_monthly: Decimal,
        earlier: Age,
        later_monthly: Decimal,
        later: Age,
    ) -> Option<Age> {
        let horizon = Age::years(self.curve.rules().break_even_horizon);

        for month in later.total_months()..=horizon.total_months() {
            let age = Age::from_months(month);
            if Self::cumulative(later_monthly, later, age)
                >= Self::cumulative(earlier_monthly, earlier, age)
            {
                debug!(%earlier, %later, break_even = %age, "break-even found");
                return Some(age);
            }
        }

        warn!(
            %earlier,
            %later,
            horizon = %horizon,
            "no break-even before horizon"
        );
        None
    }
}
