use serde::{Deserialize, Serialize};

/// Filing statuses the engine carries rule tables for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    Single,
    MarriedFilingJointly,
    HeadOfHousehold,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 3] = [
        Self::Single,
        Self::MarriedFilingJointly,
        Self::HeadOfHousehold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "S",
            Self::MarriedFilingJointly => "MFJ",
            Self::HeadOfHousehold => "HOH",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "S" => Some(Self::Single),
            "MFJ" => Some(Self::MarriedFilingJointly),
            "HOH" => Some(Self::HeadOfHousehold),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedFilingJointly => "Married Filing Jointly",
            Self::HeadOfHousehold => "Head of Household",
        }
    }

    /// Maps IRS rate-schedule codes to filing statuses.
    ///
    /// - Schedule X → Single
    /// - Schedule Y-1 → Married Filing Jointly
    /// - Schedule Z → Head of Household
    pub fn from_schedule(schedule: &str) -> Option<Self> {
        match schedule {
            "X" => Some(Self::Single),
            "Y-1" => Some(Self::MarriedFilingJointly),
            "Z" => Some(Self::HeadOfHousehold),
            _ => None,
        }
    }

    /// Whether a spouse's age and income are part of the return.
    pub fn is_joint(&self) -> bool {
        matches!(self, Self::MarriedFilingJointly)
    }
}
