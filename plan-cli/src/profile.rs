//! TOML household profiles.
//!
//! A profile file carries a `[tax]` table, a `[benefits]` table, or both:
//!
//! ```toml
//! [tax]
//! tax_year = 2025
//! filing_status = "single"
//!
//! [tax.income]
//! wages = "75000"
//!
//! [benefits]
//! law_year = 2025
//!
//! [benefits.primary]
//! birth_year = 1960
//! life_expectancy = 85
//! claiming_age = { years = 67 }
//! benefit_input = { method = "direct_benefit", primary_insurance_amount = "2400" }
//! ```

use std::path::Path;

use plan_core::{BenefitProfile, TaxProfile};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ProfileFileError {
    #[error("cannot read profile '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid profile: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("profile has no [{0}] table")]
    MissingSection(&'static str),
}

/// The `[benefits]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BenefitsSection {
    /// Benefit-law year; the latest built-in year when omitted.
    #[serde(default)]
    pub law_year: Option<i32>,
    pub primary: BenefitProfile,
    #[serde(default)]
    pub spouse: Option<BenefitProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ProfileFile {
    #[serde(default)]
    pub tax: Option<TaxProfile>,
    #[serde(default)]
    pub benefits: Option<BenefitsSection>,
}

impl ProfileFile {
    pub fn from_toml(input: &str) -> Result<Self, ProfileFileError> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: &Path) -> Result<Self, ProfileFileError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ProfileFileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let profile = Self::from_toml(&contents)?;
        debug!(
            path = %path.display(),
            tax = profile.tax.is_some(),
            benefits = profile.benefits.is_some(),
            "loaded profile"
        );
        Ok(profile)
    }

    pub fn tax(&self) -> Result<&TaxProfile, ProfileFileError> {
        self.tax.as_ref().ok_or(ProfileFileError::MissingSection("tax"))
    }

    pub fn benefits(&self) -> Result<&BenefitsSection, ProfileFileError> {
        self.benefits
            .as_ref()
            .ok_or(ProfileFileError::MissingSection("benefits"))
    }
}

#[cfg(test)]
mod tests {
    use plan_core::{Age, BenefitInput, DeductionElection, FilingStatus};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // [tax] tests
    // =========================================================================

    #[test]
    fn minimal_tax_table_uses_defaults() {
        let profile = ProfileFile::from_toml(
            r#"
            [tax]
            tax_year = 2025
            filing_status = "married_filing_jointly"
            "#,
        )
        .expect("valid TOML");

        let tax = profile.tax().expect("tax table");
        assert_eq!(tax, &TaxProfile::new(2025, FilingStatus::MarriedFilingJointly));
        assert!(profile.benefits.is_none());
    }

    #[test]
    fn full_tax_table() {
        let profile = ProfileFile::from_toml(
            r#"
            [tax]
            tax_year = 2026
            filing_status = "head_of_household"
            qualifying_children = 2
            filer_65_or_older = true
            deduction = { itemized = "31000.50" }
            specified_service_business = true

            [tax.income]
            wages = "61000"
            ordinary_income = "21000"
            long_term_gains = "4500.25"
            self_employment_income = "12000"

            [tax.payments]
            withholding = "9000"

            [tax.prior_year]
            total_tax = "8800"
            adjusted_gross_income = "91000"
            "#,
        )
        .expect("valid TOML");

        let tax = profile.tax().expect("tax table");
        assert_eq!(tax.qualifying_children, 2);
        assert!(tax.filer_65_or_older);
        assert!(!tax.spouse_65_or_older);
        assert_eq!(tax.deduction, DeductionElection::Itemized(dec!(31000.50)));
        assert_eq!(tax.income.wages, dec!(61000));
        assert_eq!(tax.income.ordinary_income, dec!(21000));
        assert_eq!(tax.income.long_term_gains, dec!(4500.25));
        assert_eq!(tax.income.qualified_dividends, dec!(0));
        assert_eq!(tax.payments.withholding, dec!(9000));
        assert_eq!(tax.payments.estimated_payments, dec!(0));
        assert_eq!(
            tax.prior_year.as_ref().map(|p| p.total_tax),
            Some(dec!(8800))
        );
    }

    #[test]
    fn unknown_filing_status_is_a_toml_error() {
        let err = ProfileFile::from_toml(
            r#"
            [tax]
            tax_year = 2025
            filing_status = "married_filing_separately"
            "#,
        )
        .expect_err("unsupported status");

        assert!(matches!(err, ProfileFileError::Toml(_)));
    }

    // =========================================================================
    // [benefits] tests
    // =========================================================================

    #[test]
    fn couple_benefits_table() {
        let profile = ProfileFile::from_toml(
            r#"
            [benefits]
            law_year = 2024

            [benefits.primary]
            birth_year = 1960
            life_expectancy = 85
            claiming_age = { years = 67 }
            benefit_input = { method = "direct_benefit", primary_insurance_amount = "2400" }

            [benefits.spouse]
            birth_year = 1962
            birth_month = 9
            life_expectancy = 90
            claiming_age = { years = 66, months = 6 }
            benefit_input = { method = "estimated_from_earnings", average_annual_earnings = "38000" }
            pension = { monthly_amount = "900", survivor_percentage = "0.5" }
            "#,
        )
        .expect("valid TOML");

        let benefits = profile.benefits().expect("benefits table");
        assert_eq!(benefits.law_year, Some(2024));
        assert_eq!(
            benefits.primary,
            BenefitProfile::with_pia(1960, dec!(2400), 85, Age::years(67))
        );
        let spouse = benefits.spouse.as_ref().expect("spouse");
        assert_eq!(spouse.birth_month, 9);
        assert_eq!(spouse.claiming_age, Age::new(66, 6));
        assert_eq!(
            spouse.benefit_input,
            BenefitInput::EstimatedFromEarnings {
                average_annual_earnings: dec!(38000)
            }
        );
        assert_eq!(spouse.pension_monthly(), dec!(900));
    }

    #[test]
    fn missing_sections_are_reported_by_name() {
        let profile = ProfileFile::from_toml("").expect("empty TOML");

        assert!(matches!(
            profile.tax(),
            Err(ProfileFileError::MissingSection("tax"))
        ));
        assert!(matches!(
            profile.benefits(),
            Err(ProfileFileError::MissingSection("benefits"))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ProfileFile::load(Path::new("/nonexistent/household.toml"))
            .expect_err("no such file");

        assert!(matches!(err, ProfileFileError::Io { .. }));
    }
}
