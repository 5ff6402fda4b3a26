use rust_decimal::Decimal;
use thiserror::Error;

use super::Age;

/// Input that must be rejected before any calculation runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("{field} must be non-negative, got {amount}")]
    NegativeAmount { field: &'static str, amount: Decimal },

    #[error("claiming age {age} is outside the allowed range {min} to {max}")]
    ClaimingAgeOutOfRange { age: Age, min: Age, max: Age },

    #[error("birth year {year} is outside the supported range {min} to {max}")]
    BirthYearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("birth month must be between 1 and 12, got {0}")]
    InvalidBirthMonth(u32),

    #[error("life expectancy {age} is outside the supported range {min} to {max}")]
    LifeExpectancyOutOfRange { age: u32, min: u32, max: u32 },

    #[error("survivor percentage must be between 0 and 1, got {0}")]
    InvalidSurvivorPercentage(Decimal),
}

/// Rejects a negative monetary field.
pub(crate) fn require_non_negative(
    field: &'static str,
    amount: Decimal,
) -> Result<(), ProfileError> {
    if amount < Decimal::ZERO {
        return Err(ProfileError::NegativeAmount { field, amount });
    }
    Ok(())
}
