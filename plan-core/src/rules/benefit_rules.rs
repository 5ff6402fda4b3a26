use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Age;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BenefitRulesError {
    #[error("full retirement age schedule is empty")]
    EmptyFraSchedule,

    #[error("full retirement age schedule is not ordered by birth year at step {0}")]
    UnorderedFraSchedule(usize),

    #[error("{name} monthly rate has a zero denominator")]
    ZeroDenominator { name: &'static str },

    #[error("{name} must be between 0 and 1, got {value}")]
    InvalidFraction { name: &'static str, value: Decimal },

    #[error("bend points must be positive and increasing, got {first} and {second}")]
    InvalidBendPoints { first: Decimal, second: Decimal },

    #[error("claiming window {earliest} to {latest} is empty")]
    InvalidClaimingWindow { earliest: Age, latest: Age },

    #[error("break-even horizon {horizon} is not after the latest claiming age {latest}")]
    InvalidHorizon { horizon: u32, latest: Age },

    #[error("birth year range {min} to {max} is empty")]
    InvalidBirthYearRange { min: i32, max: i32 },
}

/// A per-month percentage expressed as an exact fraction.
///
/// `MonthlyRate { numerator: 5, denominator: 9 }` means 5/9 of one percent
/// for every month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRate {
    pub numerator: u32,
    pub denominator: u32,
}

impl MonthlyRate {
    pub const fn new(
        numerator: u32,
        denominator: u32,
    ) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Total fraction accrued over `months`, e.g. 36 months at 5/9% is 0.2.
    pub fn over_months(
        &self,
        months: u32,
    ) -> Decimal {
        if self.denominator == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(months) * Decimal::from(self.numerator)
            / (Decimal::from(self.denominator) * Decimal::ONE_HUNDRED)
    }
}

/// One row of the full-retirement-age table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraStep {
    /// Last birth year this age applies to; the final step covers every later year.
    pub through_birth_year: i32,
    pub age: Age,
}

/// Benefit-law constants for one law year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitRules {
    pub law_year: i32,
    pub fra_schedule: Vec<FraStep>,

    /// Reduction for each of the first `early_reduction_months` months before FRA.
    pub early_reduction_first: MonthlyRate,
    pub early_reduction_months: u32,
    /// Reduction for every earlier month beyond those.
    pub early_reduction_beyond: MonthlyRate,
    pub delayed_increase: MonthlyRate,

    pub spousal_reduction_first: MonthlyRate,
    pub spousal_reduction_beyond: MonthlyRate,
    /// Share of the worker's PIA available to a spouse at FRA.
    pub spousal_fraction: Decimal,

    pub survivor_max_reduction: Decimal,
    pub survivor_earliest_age: Age,

    /// Share of a non-covered pension the legacy offset subtracted.
    pub offset_fraction: Decimal,

    /// Monthly AIME bend points.
    pub bend_points: [Decimal; 2],
    pub pia_factors: [Decimal; 3],

    pub earliest_claiming_age: Age,
    pub latest_claiming_age: Age,
    pub break_even_horizon: u32,

    pub min_birth_year: i32,
    pub max_birth_year: i32,
    pub min_life_expectancy: u32,
    pub max_life_expectancy: u32,
}

impl BenefitRules {
    /// Full retirement age for someone born in `birth_year`.
    ///
    /// Years before the first step get the first step's age; years after the
    /// last step get the last step's age.
    pub fn full_retirement_age(
        &self,
        birth_year: i32,
    ) -> Age {
        self.fra_schedule
            .iter()
            .find(|step| birth_year <= step.through_birth_year)
            .or(self.fra_schedule.last())
            .map(|step| step.age)
            .unwrap_or(self.latest_claiming_age)
    }

    /// Whole-year claiming ages in the window, e.g. 62 through 70.
    pub fn whole_year_claiming_ages(&self) -> impl Iterator<Item = Age> + '_ {
        (self.earliest_claiming_age.ceil_years()..=self.latest_claiming_age.years)
            .map(Age::years)
    }

    /// # Errors
    ///
    /// Returns [`BenefitRulesError`] for the first inconsistency found.
    pub fn validate(&self) -> Result<(), BenefitRulesError> {
        if self.fra_schedule.is_empty() {
            return Err(BenefitRulesError::EmptyFraSchedule);
        }
        for (index, pair) in self.fra_schedule.windows(2).enumerate() {
            if pair[1].through_birth_year <= pair[0].through_birth_year {
                return Err(BenefitRulesError::UnorderedFraSchedule(index + 1));
            }
        }

        let rates = [
            ("early_reduction_first", self.early_reduction_first),
            ("early_reduction_beyond", self.early_reduction_beyond),
            ("delayed_increase", self.delayed_increase),
            ("spousal_reduction_first", self.spousal_reduction_first),
            ("spousal_reduction_beyond", self.spousal_reduction_beyond),
        ];
        for (name, rate) in rates {
            if rate.denominator == 0 {
                return Err(BenefitRulesError::ZeroDenominator { name });
            }
        }

        let fractions = [
            ("spousal_fraction", self.spousal_fraction),
            ("survivor_max_reduction", self.survivor_max_reduction),
            ("offset_fraction", self.offset_fraction),
        ];
        for (name, value) in fractions.into_iter().chain(
            ["pia_factor_1", "pia_factor_2", "pia_factor_3"]
                .into_iter()
                .zip(self.pia_factors),
        ) {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(BenefitRulesError::InvalidFraction { name, value });
            }
        }

        let [first, second] = self.bend_points;
        if first <= Decimal::ZERO || second <= first {
            return Err(BenefitRulesError::InvalidBendPoints { first, second });
        }

        if self.latest_claiming_age < self.earliest_claiming_age {
            return Err(BenefitRulesError::InvalidClaimingWindow {
                earliest: self.earliest_claiming_age,
                latest: self.latest_claiming_age,
            });
        }
        if Age::years(self.break_even_horizon) <= self.latest_claiming_age {
            return Err(BenefitRulesError::InvalidHorizon {
                horizon: self.break_even_horizon,
                latest: self.latest_claiming_age,
            });
        }
        if self.max_birth_year < self.min_birth_year {
            return Err(BenefitRulesError::InvalidBirthYearRange {
                min: self.min_birth_year,
                max: self.max_birth_year,
            });
        }
        Ok(())
    }
}
