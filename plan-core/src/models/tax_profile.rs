use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::profile_error::require_non_negative;
use super::{FilingStatus, ProfileError};

/// Income received during the tax year, by character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeComponents {
    /// Wages, salaries and tips already subject to payroll tax (Form W-2).
    pub wages: Decimal,
    /// Interest, pensions, IRA distributions and other non-wage income taxed
    /// at ordinary rates.
    pub ordinary_income: Decimal,
    pub qualified_dividends: Decimal,
    pub short_term_gains: Decimal,
    pub long_term_gains: Decimal,
    /// Net profit from self-employment (Schedule C / F).
    pub self_employment_income: Decimal,
    /// Gross Social Security benefits received (Form SSA-1099, box 5).
    pub social_security_benefits: Decimal,
}

impl IncomeComponents {
    /// Wages plus other ordinary income.
    pub fn ordinary_total(&self) -> Decimal {
        self.wages + self.ordinary_income
    }

    /// Income taxed at the preferential (capital gains) rates.
    pub fn preferential_income(&self) -> Decimal {
        self.qualified_dividends + self.long_term_gains
    }

    /// Income subject to the Net Investment Income Tax.
    pub fn investment_income(&self) -> Decimal {
        self.qualified_dividends + self.short_term_gains + self.long_term_gains
    }
}

/// Which deduction the filer elected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionElection {
    #[default]
    Standard,
    Itemized(Decimal),
}

/// Tax already paid toward the year's liability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payments {
    pub withholding: Decimal,
    pub estimated_payments: Decimal,
}

impl Payments {
    pub fn total(&self) -> Decimal {
        self.withholding + self.estimated_payments
    }
}

/// Prior-year figures used for the estimated-payment safe harbor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorYearTax {
    pub total_tax: Decimal,
    pub adjusted_gross_income: Decimal,
}

/// Everything needed to evaluate one year's federal income tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxProfile {
    pub tax_year: i32,
    pub filing_status: FilingStatus,
    #[serde(default)]
    pub qualifying_children: u32,
    #[serde(default)]
    pub filer_65_or_older: bool,
    /// Ignored unless the filing status is joint.
    #[serde(default)]
    pub spouse_65_or_older: bool,
    #[serde(default)]
    pub income: IncomeComponents,
    #[serde(default)]
    pub deduction: DeductionElection,
    /// Self-employment income comes from a specified service trade or business.
    #[serde(default)]
    pub specified_service_business: bool,
    #[serde(default)]
    pub payments: Payments,
    #[serde(default)]
    pub prior_year: Option<PriorYearTax>,
}

impl TaxProfile {
    /// Creates a profile with no income, the standard deduction and no payments.
    pub fn new(
        tax_year: i32,
        filing_status: FilingStatus,
    ) -> Self {
        Self {
            tax_year,
            filing_status,
            qualifying_children: 0,
            filer_65_or_older: false,
            spouse_65_or_older: false,
            income: IncomeComponents::default(),
            deduction: DeductionElection::Standard,
            specified_service_business: false,
            payments: Payments::default(),
            prior_year: None,
        }
    }

    /// Number of people on the return who are 65 or older.
    pub fn seniors(&self) -> u32 {
        let spouse = self.filing_status.is_joint() && self.spouse_65_or_older;
        u32::from(self.filer_65_or_older) + u32::from(spouse)
    }

    /// Rejects negative monetary amounts.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NegativeAmount`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let income = &self.income;
        require_non_negative("wages", income.wages)?;
        require_non_negative("ordinary_income", income.ordinary_income)?;
        require_non_negative("qualified_dividends", income.qualified_dividends)?;
        require_non_negative("short_term_gains", income.short_term_gains)?;
        require_non_negative("long_term_gains", income.long_term_gains)?;
        require_non_negative("self_employment_income", income.self_employment_income)?;
        require_non_negative("social_security_benefits", income.social_security_benefits)?;
        if let DeductionElection::Itemized(amount) = self.deduction {
            require_non_negative("itemized_deduction", amount)?;
        }
        require_non_negative("withholding", self.payments.withholding)?;
        require_non_negative("estimated_payments", self.payments.estimated_payments)?;
        if let Some(prior) = &self.prior_year {
            require_non_negative("prior_year.total_tax", prior.total_tax)?;
            require_non_negative(
                "prior_year.adjusted_gross_income",
                prior.adjusted_gross_income,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn seniors_counts_spouse_only_when_joint() {
        let mut profile = TaxProfile::new(2025, FilingStatus::HeadOfHousehold);
        profile.filer_65_or_older = true;
        profile.spouse_65_or_older = true;

        assert_eq!(profile.seniors(), 1);

        profile.filing_status = FilingStatus::MarriedFilingJointly;

        assert_eq!(profile.seniors(), 2);
    }

    #[test]
    fn validate_accepts_zero_profile() {
        let profile = TaxProfile::new(2025, FilingStatus::Single);

        assert_eq!(profile.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_negative_income() {
        let mut profile = TaxProfile::new(2025, FilingStatus::Single);
        profile.income.long_term_gains = dec!(-1);

        assert_eq!(
            profile.validate(),
            Err(ProfileError::NegativeAmount {
                field: "long_term_gains",
                amount: dec!(-1),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_itemized_deduction() {
        let mut profile = TaxProfile::new(2025, FilingStatus::Single);
        profile.deduction = DeductionElection::Itemized(dec!(-500));

        assert_eq!(
            profile.validate(),
            Err(ProfileError::NegativeAmount {
                field: "itemized_deduction",
                amount: dec!(-500),
            })
        );
    }

    #[test]
    fn preferential_and_investment_income_group_components() {
        let income = IncomeComponents {
            qualified_dividends: dec!(1000),
            short_term_gains: dec!(500),
            long_term_gains: dec!(2000),
            ..Default::default()
        };

        assert_eq!(income.preferential_income(), dec!(3000));
        assert_eq!(income.investment_income(), dec!(3500));
    }
}
