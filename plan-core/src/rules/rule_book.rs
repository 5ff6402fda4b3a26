use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use super::benefit_rules::{BenefitRules, BenefitRulesError};
use super::builtin;
use super::tax_rules::{ScheduleKind, TaxRulesError, TaxYearRules};
use crate::models::{BracketSchedule, FilingStatus};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleBookError {
    #[error("no tax rules for tax year {0}")]
    UnknownTaxYear(i32),

    #[error("no benefit rules for law year {0}")]
    UnknownBenefitYear(i32),

    #[error("invalid tax rules for {year}: {source}")]
    InvalidTaxRules {
        year: i32,
        #[source]
        source: TaxRulesError,
    },

    #[error("invalid benefit rules for {year}: {source}")]
    InvalidBenefitRules {
        year: i32,
        #[source]
        source: BenefitRulesError,
    },
}

/// Year-keyed rule tables for both calculation paths.
///
/// Lookups never fall back to a neighbouring year: a missing year is an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleBook {
    tax_years: BTreeMap<i32, TaxYearRules>,
    benefit_years: BTreeMap<i32, BenefitRules>,
}

impl RuleBook {
    /// The tables compiled into the crate.
    pub fn builtin() -> Self {
        let mut book = Self::empty();
        for rules in builtin::tax_years() {
            book.tax_years.insert(rules.tax_year, rules);
        }
        for rules in builtin::benefit_years() {
            book.benefit_years.insert(rules.law_year, rules);
        }
        book
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns [`RuleBookError::UnknownTaxYear`] if the year has no table.
    pub fn tax_rules(
        &self,
        tax_year: i32,
    ) -> Result<&TaxYearRules, RuleBookError> {
        self.tax_years
            .get(&tax_year)
            .ok_or(RuleBookError::UnknownTaxYear(tax_year))
    }

    /// # Errors
    ///
    /// Returns [`RuleBookError::UnknownBenefitYear`] if the year has no table.
    pub fn benefit_rules(
        &self,
        law_year: i32,
    ) -> Result<&BenefitRules, RuleBookError> {
        self.benefit_years
            .get(&law_year)
            .ok_or(RuleBookError::UnknownBenefitYear(law_year))
    }

    /// Adds or replaces a tax year after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`RuleBookError::InvalidTaxRules`] if validation fails; the
    /// book is left unchanged.
    pub fn insert_tax_year(
        &mut self,
        rules: TaxYearRules,
    ) -> Result<Option<TaxYearRules>, RuleBookError> {
        let year = rules.tax_year;
        rules
            .validate()
            .map_err(|source| RuleBookError::InvalidTaxRules { year, source })?;
        debug!(tax_year = year, "inserting tax rules");
        Ok(self.tax_years.insert(year, rules))
    }

    /// Adds or replaces a benefit-law year after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`RuleBookError::InvalidBenefitRules`] if validation fails.
    pub fn insert_benefit_year(
        &mut self,
        rules: BenefitRules,
    ) -> Result<Option<BenefitRules>, RuleBookError> {
        let year = rules.law_year;
        rules
            .validate()
            .map_err(|source| RuleBookError::InvalidBenefitRules { year, source })?;
        debug!(law_year = year, "inserting benefit rules");
        Ok(self.benefit_years.insert(year, rules))
    }

    /// Swaps one bracket schedule of an existing tax year.
    ///
    /// # Errors
    ///
    /// Returns [`RuleBookError::UnknownTaxYear`] if the year has no table.
    pub fn replace_schedule(
        &mut self,
        tax_year: i32,
        status: FilingStatus,
        kind: ScheduleKind,
        schedule: BracketSchedule,
    ) -> Result<BracketSchedule, RuleBookError> {
        let rules = self
            .tax_years
            .get_mut(&tax_year)
            .ok_or(RuleBookError::UnknownTaxYear(tax_year))?
            .for_status_mut(status);
        let slot = match kind {
            ScheduleKind::Ordinary => &mut rules.ordinary_brackets,
            ScheduleKind::Preferential => &mut rules.preferential_brackets,
        };
        debug!(
            tax_year,
            status = status.as_str(),
            ?kind,
            brackets = schedule.brackets().len(),
            "replacing bracket schedule"
        );
        Ok(std::mem::replace(slot, schedule))
    }

    pub fn tax_years(&self) -> impl Iterator<Item = i32> + '_ {
        self.tax_years.keys().copied()
    }

    pub fn benefit_years(&self) -> impl Iterator<Item = i32> + '_ {
        self.benefit_years.keys().copied()
    }

    pub fn latest_benefit_year(&self) -> Option<i32> {
        self.benefit_years.keys().next_back().copied()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::TaxBracket;

    #[test]
    fn builtin_ships_three_years_of_each_table() {
        let book = RuleBook::builtin();

        assert_eq!(book.tax_years().collect::<Vec<_>>(), vec![2024, 2025, 2026]);
        assert_eq!(book.benefit_years().collect::<Vec<_>>(), vec![2024, 2025, 2026]);
        assert_eq!(book.latest_benefit_year(), Some(2026));
    }

    #[test]
    fn builtin_tables_pass_validation() {
        let book = RuleBook::builtin();

        for year in book.tax_years() {
            let rules = book.tax_rules(year).expect("listed year");
            assert_eq!(rules.validate(), Ok(()), "tax year {year}");
        }
        for year in book.benefit_years() {
            let rules = book.benefit_rules(year).expect("listed year");
            assert_eq!(rules.validate(), Ok(()), "law year {year}");
        }
    }

    #[test]
    fn unknown_tax_year_is_an_error() {
        let book = RuleBook::builtin();

        assert_eq!(
            book.tax_rules(2019).err(),
            Some(RuleBookError::UnknownTaxYear(2019))
        );
    }

    #[test]
    fn unknown_benefit_year_is_an_error() {
        assert_eq!(
            RuleBook::empty().benefit_rules(2025).err(),
            Some(RuleBookError::UnknownBenefitYear(2025))
        );
    }

    #[test]
    fn insert_tax_year_adds_a_new_year() {
        let mut book = RuleBook::builtin();
        let mut rules = book.tax_rules(2026).cloned().expect("2026 built in");
        rules.tax_year = 2027;

        let previous = book.insert_tax_year(rules).expect("valid rules");

        assert!(previous.is_none());
        assert!(book.tax_rules(2027).is_ok());
    }

    #[test]
    fn insert_tax_year_rejects_invalid_rules_and_keeps_book() {
        let mut book = RuleBook::builtin();
        let mut rules = book.tax_rules(2025).cloned().expect("2025 built in");
        rules.niit_rate = dec!(3.8);

        let err = book.insert_tax_year(rules).unwrap_err();

        assert!(matches!(err, RuleBookError::InvalidTaxRules { year: 2025, .. }));
        assert_eq!(
            book.tax_rules(2025).expect("still there").niit_rate,
            dec!(0.038)
        );
    }

    #[test]
    fn replace_schedule_swaps_only_the_requested_schedule() {
        let mut book = RuleBook::builtin();
        let flat = BracketSchedule::new(vec![TaxBracket {
            min_income: dec!(0),
            max_income: None,
            tax_rate: dec!(0.10),
        }])
        .expect("valid schedule");

        let old = book
            .replace_schedule(
                2025,
                FilingStatus::Single,
                ScheduleKind::Ordinary,
                flat.clone(),
            )
            .expect("2025 exists");

        let rules = book.tax_rules(2025).expect("2025 exists");
        assert_eq!(old.brackets().len(), 7);
        assert_eq!(rules.single.ordinary_brackets, flat);
        assert_eq!(rules.single.preferential_brackets.brackets().len(), 3);
        assert_eq!(rules.married_filing_jointly.ordinary_brackets.brackets().len(), 7);
    }

    #[test]
    fn replace_schedule_for_unknown_year_fails() {
        let mut book = RuleBook::builtin();
        let schedule = book
            .tax_rules(2025)
            .expect("2025 exists")
            .single
            .ordinary_brackets
            .clone();

        assert_eq!(
            book.replace_schedule(
                2030,
                FilingStatus::Single,
                ScheduleKind::Ordinary,
                schedule
            ),
            Err(RuleBookError::UnknownTaxYear(2030))
        );
    }
}
