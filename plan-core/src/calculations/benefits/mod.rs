//! Retirement-benefit path: the benefit curve and everything built on it.

mod break_even;
mod curve;
mod pension_offset;
mod scenarios;
mod schedule;
mod strategies;

use rust_decimal::Decimal;

pub use break_even::BreakEvenSolver;
pub use curve::BenefitCurveCalculator;
pub use pension_offset::PensionOffsetComparator;
pub use scenarios::ScenarioAnalyzer;
pub use schedule::ScheduleProjector;
pub use strategies::ClaimingStrategyEnumerator;

use crate::calculations::common::round_half_up;
use crate::models::{Age, BenefitInput, BenefitProfile, PersonStatus};

/// A [`BenefitProfile`] with its PIA and FRA resolved against one law year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claimant {
    pub birth_year: i32,
    pub primary_insurance_amount: Decimal,
    pub full_retirement_age: Age,
    pub claiming_age: Age,
    pub life_expectancy: u32,
    pub claim_year: i32,
    pub death_year: i32,
    pub pension_monthly: Decimal,
    pub pension_survivor_percentage: Decimal,
}

impl Claimant {
    pub fn resolve(
        profile: &BenefitProfile,
        curve: &BenefitCurveCalculator<'_>,
    ) -> Self {
        let primary_insurance_amount = match profile.benefit_input {
            BenefitInput::DirectBenefit {
                primary_insurance_amount,
            } => round_half_up(primary_insurance_amount),
            BenefitInput::EstimatedFromEarnings {
                average_annual_earnings,
            } => curve.primary_insurance_amount(average_annual_earnings),
        };

        Self {
            birth_year: profile.birth_year,
            primary_insurance_amount,
            full_retirement_age: curve.full_retirement_age(profile.birth_year),
            claiming_age: profile.claiming_age,
            life_expectancy: profile.life_expectancy,
            claim_year: profile.claim_year(),
            death_year: profile.death_year(),
            pension_monthly: profile.pension_monthly(),
            pension_survivor_percentage: profile
                .pension
                .as_ref()
                .map(|p| p.survivor_percentage)
                .unwrap_or(Decimal::ZERO),
        }
    }

    /// Deceased from the death year on; receiving from the claim year on.
    pub fn status_in(
        &self,
        year: i32,
    ) -> PersonStatus {
        if year >= self.death_year {
            PersonStatus::Deceased
        } else if year >= self.claim_year {
            PersonStatus::Receiving
        } else {
            PersonStatus::PreClaim
        }
    }

    /// Age reached during `year`, `None` once deceased.
    pub fn age_in(
        &self,
        year: i32,
    ) -> Option<u32> {
        match self.status_in(year) {
            PersonStatus::Deceased => None,
            _ => u32::try_from(year - self.birth_year).ok(),
        }
    }

    /// Whether the person reached their claim year before their death year.
    pub fn ever_claims(&self) -> bool {
        self.claim_year < self.death_year
    }

    pub fn life_expectancy_age(&self) -> Age {
        Age::years(self.life_expectancy)
    }
}
