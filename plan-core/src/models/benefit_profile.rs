use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::profile_error::require_non_negative;
use super::{Age, ProfileError};
use crate::rules::BenefitRules;

/// How the Primary Insurance Amount was supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum BenefitInput {
    /// PIA taken from the person's benefit statement.
    DirectBenefit { primary_insurance_amount: Decimal },
    /// PIA estimated from average indexed annual earnings.
    EstimatedFromEarnings { average_annual_earnings: Decimal },
}

/// A pension from work not covered by Social Security.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonCoveredPension {
    pub monthly_amount: Decimal,
    /// Share of the pension that continues to a surviving spouse (0 to 1).
    #[serde(default)]
    pub survivor_percentage: Decimal,
}

/// One person's inputs to the claiming analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitProfile {
    pub birth_year: i32,
    #[serde(default = "default_birth_month")]
    pub birth_month: u32,
    pub benefit_input: BenefitInput,
    /// Assumed age at death, in whole years.
    pub life_expectancy: u32,
    pub claiming_age: Age,
    #[serde(default)]
    pub pension: Option<NonCoveredPension>,
}

fn default_birth_month() -> u32 {
    1
}

impl BenefitProfile {
    /// A profile with a known PIA and no pension.
    pub fn with_pia(
        birth_year: i32,
        primary_insurance_amount: Decimal,
        life_expectancy: u32,
        claiming_age: Age,
    ) -> Self {
        Self {
            birth_year,
            birth_month: default_birth_month(),
            benefit_input: BenefitInput::DirectBenefit {
                primary_insurance_amount,
            },
            life_expectancy,
            claiming_age,
            pension: None,
        }
    }

    /// Checks the profile against the supported ranges in `rules`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError`] for a birth year or month outside the supported
    /// range, a negative amount, a claiming age outside the claiming window, a
    /// life expectancy outside the supported range, or a survivor percentage
    /// outside [0, 1].
    pub fn validate(
        &self,
        rules: &BenefitRules,
    ) -> Result<(), ProfileError> {
        if self.birth_year < rules.min_birth_year || self.birth_year > rules.max_birth_year {
            return Err(ProfileError::BirthYearOutOfRange {
                year: self.birth_year,
                min: rules.min_birth_year,
                max: rules.max_birth_year,
            });
        }
        if !(1..=12).contains(&self.birth_month) {
            return Err(ProfileError::InvalidBirthMonth(self.birth_month));
        }

        match &self.benefit_input {
            BenefitInput::DirectBenefit {
                primary_insurance_amount,
            } => require_non_negative("primary_insurance_amount", *primary_insurance_amount)?,
            BenefitInput::EstimatedFromEarnings {
                average_annual_earnings,
            } => require_non_negative("average_annual_earnings", *average_annual_earnings)?,
        }

        if self.claiming_age < rules.earliest_claiming_age
            || self.claiming_age > rules.latest_claiming_age
        {
            return Err(ProfileError::ClaimingAgeOutOfRange {
                age: self.claiming_age,
                min: rules.earliest_claiming_age,
                max: rules.latest_claiming_age,
            });
        }

        if self.life_expectancy < rules.min_life_expectancy
            || self.life_expectancy > rules.max_life_expectancy
        {
            return Err(ProfileError::LifeExpectancyOutOfRange {
                age: self.life_expectancy,
                min: rules.min_life_expectancy,
                max: rules.max_life_expectancy,
            });
        }

        if let Some(pension) = &self.pension {
            require_non_negative("pension.monthly_amount", pension.monthly_amount)?;
            if pension.survivor_percentage < Decimal::ZERO
                || pension.survivor_percentage > Decimal::ONE
            {
                return Err(ProfileError::InvalidSurvivorPercentage(
                    pension.survivor_percentage,
                ));
            }
        }

        Ok(())
    }

    /// Calendar year in which the claiming age is reached.
    pub fn claim_year(&self) -> i32 {
        let months_from_birth_year_start =
            self.birth_month.saturating_sub(1) + self.claiming_age.total_months();
        self.birth_year + (months_from_birth_year_start / 12) as i32
    }

    /// Calendar year of the assumed death.
    pub fn death_year(&self) -> i32 {
        self.birth_year + self.life_expectancy as i32
    }

    pub fn pension_monthly(&self) -> Decimal {
        self.pension
            .as_ref()
            .map(|p| p.monthly_amount)
            .unwrap_or(Decimal::ZERO)
    }
}
