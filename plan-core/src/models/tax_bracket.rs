use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One band of a progressive rate schedule.
///
/// `max_income` of `None` marks the unbounded top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
}

impl TaxBracket {
    /// Width of the bracket, `None` for the top bracket.
    pub fn width(&self) -> Option<Decimal> {
        self.max_income.map(|max| max - self.min_income)
    }
}

/// Errors raised when a bracket list does not form a valid schedule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketScheduleError {
    #[error("bracket schedule is empty")]
    Empty,

    #[error("first bracket must start at 0, got {0}")]
    NonZeroStart(Decimal),

    #[error("bracket {index} starts at {found} but the previous bracket ends at {expected}")]
    NotContiguous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket {index} upper bound {max} is not above its lower bound {min}")]
    NotIncreasing {
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    #[error("bracket {index} rate must be between 0 and 1, got {rate}")]
    InvalidRate { index: usize, rate: Decimal },

    #[error("bracket {0} is unbounded but is not the last bracket")]
    UnboundedBeforeTop(usize),

    #[error("top bracket must be unbounded, got upper bound {0}")]
    BoundedTop(Decimal),

    #[error("{rates} rates do not fit {edges} bracket edges; expected one more rate than edges")]
    RateCountMismatch { edges: usize, rates: usize },
}

/// An ordered, contiguous list of brackets ending in an unbounded top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketSchedule {
    brackets: Vec<TaxBracket>,
}

impl BracketSchedule {
    /// Validates and wraps a bracket list.
    ///
    /// # Errors
    ///
    /// Returns [`BracketScheduleError`] if the list is empty, does not start at
    /// zero, has gaps or overlaps, has a bracket whose upper bound is not above
    /// its lower bound, has a rate outside [0, 1], or does not end with exactly
    /// one unbounded bracket.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use plan_core::{BracketSchedule, TaxBracket};
    ///
    /// let schedule = BracketSchedule::new(vec![
    ///     TaxBracket { min_income: dec!(0), max_income: Some(dec!(10000)), tax_rate: dec!(0.10) },
    ///     TaxBracket { min_income: dec!(10000), max_income: None, tax_rate: dec!(0.22) },
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(schedule.brackets().len(), 2);
    /// ```
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, BracketScheduleError> {
        let first = brackets.first().ok_or(BracketScheduleError::Empty)?;
        if first.min_income != Decimal::ZERO {
            return Err(BracketScheduleError::NonZeroStart(first.min_income));
        }

        let last_index = brackets.len() - 1;
        let mut previous_max: Option<Decimal> = None;

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.tax_rate < Decimal::ZERO || bracket.tax_rate > Decimal::ONE {
                return Err(BracketScheduleError::InvalidRate {
                    index,
                    rate: bracket.tax_rate,
                });
            }

            if let Some(expected) = previous_max {
                if bracket.min_income != expected {
                    return Err(BracketScheduleError::NotContiguous {
                        index,
                        expected,
                        found: bracket.min_income,
                    });
                }
            }

            match bracket.max_income {
                Some(max) if index == last_index => {
                    return Err(BracketScheduleError::BoundedTop(max));
                }
                Some(max) if max <= bracket.min_income => {
                    return Err(BracketScheduleError::NotIncreasing {
                        index,
                        min: bracket.min_income,
                        max,
                    });
                }
                Some(max) => previous_max = Some(max),
                None if index != last_index => {
                    return Err(BracketScheduleError::UnboundedBeforeTop(index));
                }
                None => {}
            }
        }

        Ok(Self { brackets })
    }

    /// Builds a schedule from the upper edges of each bounded bracket and one
    /// rate per bracket (`rates.len() == edges.len() + 1`).
    ///
    /// # Errors
    ///
    /// Returns [`BracketScheduleError::RateCountMismatch`] when the counts do
    /// not line up, and any error [`BracketSchedule::new`] reports for the
    /// resulting list.
    pub fn from_edges(
        edges: &[Decimal],
        rates: &[Decimal],
    ) -> Result<Self, BracketScheduleError> {
        if rates.len() != edges.len() + 1 {
            return Err(BracketScheduleError::RateCountMismatch {
                edges: edges.len(),
                rates: rates.len(),
            });
        }
        Self::new(Self::brackets_from_edges(edges, rates))
    }

    /// Same as [`BracketSchedule::from_edges`] without validation, for the
    /// compiled-in tables (which are checked by the rule-book tests).
    pub(crate) fn from_edges_unchecked(
        edges: &[Decimal],
        rates: &[Decimal],
    ) -> Self {
        Self {
            brackets: Self::brackets_from_edges(edges, rates),
        }
    }

    fn brackets_from_edges(
        edges: &[Decimal],
        rates: &[Decimal],
    ) -> Vec<TaxBracket> {
        let mut lower = Decimal::ZERO;
        rates
            .iter()
            .enumerate()
            .map(|(index, rate)| {
                let upper = edges.get(index).copied();
                let bracket = TaxBracket {
                    min_income: lower,
                    max_income: upper,
                    tax_rate: *rate,
                };
                if let Some(upper) = upper {
                    lower = upper;
                }
                bracket
            })
            .collect()
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Rate of the first (lowest) bracket.
    pub fn bottom_rate(&self) -> Decimal {
        self.brackets
            .first()
            .map(|b| b.tax_rate)
            .unwrap_or(Decimal::ZERO)
    }
}

impl TryFrom<Vec<TaxBracket>> for BracketSchedule {
    type Error = BracketScheduleError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<BracketSchedule> for Vec<TaxBracket> {
    fn from(schedule: BracketSchedule) -> Self {
        schedule.brackets
    }
}
