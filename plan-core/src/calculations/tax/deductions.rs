//! Deduction selection and the special deductions layered on top of it.
//!
//! The resolver runs in three steps against one tax year's rules:
//!
//! 1. [`DeductionResolver::base_deduction`]: the elected standard or itemized
//!    amount, with the age-65 add-on per senior on the standard path.
//! 2. [`DeductionResolver::senior_deduction`]: the per-senior amount for years
//!    that define it, reduced by the phase-out rate above an AGI threshold.
//! 3. [`DeductionResolver::qbi_deduction`]: 20% of qualified business income,
//!    limited to 20% of taxable income before QBI.
//!
//! Businesses that are not specified service businesses keep the full QBI
//! deduction above the threshold. The wage and property-basis limitation that
//! applies to them in the real rules is not modelled.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{non_negative, round_half_up};
use crate::models::{DeductionElection, DeductionKind, TaxProfile};
use crate::rules::{FilingStatusRules, TaxYearRules};

/// The elected deduction and how it was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeductionOutcome {
    pub kind: DeductionKind,
    /// Total deduction including any age-65 add-on.
    pub amount: Decimal,
    pub age_65_addition: Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct DeductionResolver<'a> {
    year: &'a TaxYearRules,
    status: &'a FilingStatusRules,
}

impl<'a> DeductionResolver<'a> {
    pub fn new(
        year: &'a TaxYearRules,
        status: &'a FilingStatusRules,
    ) -> Self {
        Self { year, status }
    }

    pub fn base_deduction(
        &self,
        profile: &TaxProfile,
    ) -> DeductionOutcome {
        match profile.deduction {
            DeductionElection::Standard => {
                let age_65_addition =
                    self.status.age_65_addition * Decimal::from(profile.seniors());
                DeductionOutcome {
                    kind: DeductionKind::Standard,
                    amount: round_half_up(self.status.standard_deduction + age_65_addition),
                    age_65_addition,
                }
            }
            DeductionElection::Itemized(amount) => DeductionOutcome {
                kind: DeductionKind::Itemized,
                amount: round_half_up(non_negative(amount)),
                age_65_addition: Decimal::ZERO,
            },
        }
    }

    /// Zero for years without the deduction or households without a senior.
    pub fn senior_deduction(
        &self,
        seniors: u32,
        agi: Decimal,
    ) -> Decimal {
        let Some(rules) = &self.year.senior_deduction else {
            return Decimal::ZERO;
        };
        if seniors == 0 {
            return Decimal::ZERO;
        }

        let excess = non_negative(agi - self.status.senior_phase_out_threshold);
        let per_person = non_negative(rules.amount_per_person - rules.phase_out_rate * excess);
        let amount = round_half_up(per_person * Decimal::from(seniors));
        debug!(seniors, agi = %agi, amount = %amount, "senior deduction");
        amount
    }

    /// QBI deduction for `qualified_income` given taxable income before QBI.
    ///
    /// For a specified service business the deduction is full at or below the
    /// threshold, shrinks linearly across the phase-in range, and is zero
    /// beyond it. The threshold is tested against taxable income before QBI.
    pub fn qbi_deduction(
        &self,
        qualified_income: Decimal,
        taxable_before_qbi: Decimal,
        specified_service: bool,
    ) -> Decimal {
        if qualified_income <= Decimal::ZERO || taxable_before_qbi <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let rate = self.year.qbi_rate;
        let tentative = rate * qualified_income;
        let cap = rate * taxable_before_qbi;

        let applicable = if specified_service {
            let excess = non_negative(taxable_before_qbi - self.status.qbi_threshold);
            let phase_out = (excess / self.status.qbi_phase_in_range).min(Decimal::ONE);
            Decimal::ONE - phase_out
        } else {
            Decimal::ONE
        };

        round_half_up(tentative.min(cap) * applicable)
    }
}
