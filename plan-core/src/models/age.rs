use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An age expressed in whole years plus months.
///
/// Equality and ordering compare the total number of months, so
/// `Age { years: 66, months: 12 }` equals `Age::years(67)`. Use
/// [`Age::new`] to get the normalized form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Age {
    pub years: u32,
    #[serde(default)]
    pub months: u32,
}

impl Age {
    pub const fn new(
        years: u32,
        months: u32,
    ) -> Self {
        Self::from_months(years * 12 + months)
    }

    pub const fn years(years: u32) -> Self {
        Self { years, months: 0 }
    }

    pub const fn from_months(total_months: u32) -> Self {
        Self {
            years: total_months / 12,
            months: total_months % 12,
        }
    }

    pub const fn total_months(&self) -> u32 {
        self.years * 12 + self.months
    }

    /// The age as fractional years, e.g. 66y 6m is 66.5.
    pub fn as_years(&self) -> Decimal {
        Decimal::from(self.total_months()) / Decimal::from(12)
    }

    /// Months from `self` up to `later`, zero when `later` is not after `self`.
    pub fn months_until(
        &self,
        later: Age,
    ) -> u32 {
        later.total_months().saturating_sub(self.total_months())
    }

    /// Smallest whole-year age at or after this one.
    pub const fn ceil_years(&self) -> u32 {
        if self.months == 0 {
            self.years
        } else {
            self.years + 1
        }
    }
}

impl PartialEq for Age {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.total_months() == other.total_months()
    }
}

impl Eq for Age {}

impl Hash for Age {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        self.total_months().hash(state);
    }
}

impl PartialOrd for Age {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Age {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        self.total_months().cmp(&other.total_months())
    }
}

impl fmt::Display for Age {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let normalized = Age::from_months(self.total_months());
        if normalized.months == 0 {
            write!(f, "{}", normalized.years)
        } else {
            write!(f, "{}y {}m", normalized.years, normalized.months)
        }
    }
}
