use rust_decimal::Decimal;

use super::Claimant;
use super::curve::BenefitCurveCalculator;
use crate::calculations::common::{non_negative, round_half_up};
use crate::models::PensionOffsetComparison;

/// Spousal benefit for a non-covered pension holder with and without the
/// legacy two-thirds pension offset.
#[derive(Debug, Clone, Copy)]
pub struct PensionOffsetComparator<'a> {
    curve: BenefitCurveCalculator<'a>,
}

impl<'a> PensionOffsetComparator<'a> {
    pub fn new(curve: BenefitCurveCalculator<'a>) -> Self {
        Self { curve }
    }

    /// `None` when the pensioner has no pension.
    pub fn compare(
        &self,
        pensioner: &Claimant,
        other: &Claimant,
        pensioner_is_primary: bool,
    ) -> Option<PensionOffsetComparison> {
        if pensioner.pension_monthly <= Decimal::ZERO {
            return None;
        }

        let spousal_without_offset = self.curve.spousal_amount(
            other.primary_insurance_amount,
            pensioner.full_retirement_age,
            pensioner.claiming_age,
        );
        let offset_amount =
            round_half_up(pensioner.pension_monthly * self.curve.rules().offset_fraction);
        let spousal_with_offset = non_negative(spousal_without_offset - offset_amount);
        let monthly_savings = spousal_without_offset - spousal_with_offset;

        Some(PensionOffsetComparison {
            pensioner_is_primary,
            pension_monthly: pensioner.pension_monthly,
            spousal_without_offset,
            offset_amount,
            spousal_with_offset,
            monthly_savings,
            annual_savings: monthly_savings * Decimal::from(12),
        })
    }
}
