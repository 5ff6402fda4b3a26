use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FilingStatus;

/// The portion of an amount that fell into one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
    pub taxable_amount: Decimal,
    pub tax: Decimal,
}

/// Tax owed on an amount plus the per-bracket breakdown, in bracket order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTax {
    pub tax: Decimal,
    pub breakdown: Vec<BracketSlice>,
}

impl BracketTax {
    /// Sum of the amounts taxed across all slices.
    pub fn taxed_amount(&self) -> Decimal {
        self.breakdown.iter().map(|s| s.taxable_amount).sum()
    }

    /// Rate of the highest bracket that received income.
    pub fn marginal_rate(&self) -> Option<Decimal> {
        self.breakdown.last().map(|s| s.tax_rate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionKind {
    Standard,
    Itemized,
}

/// Self-employment tax and its components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfEmploymentTax {
    /// Net profit × net earnings factor (92.35%).
    pub net_earnings: Decimal,
    pub medicare_tax: Decimal,
    /// Net earnings up to what remains of the wage base after wages.
    pub ss_taxable_earnings: Decimal,
    pub social_security_tax: Decimal,
    pub total: Decimal,
    /// Deductible half, taken above the line.
    pub deduction: Decimal,
    /// Net profit was at or below the filing minimum, so nothing is owed.
    pub below_threshold: bool,
}

/// 1040-ES safe-harbor figures for the following year's estimates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatedPaymentPlan {
    /// Smaller of the current-year and prior-year safe harbors.
    pub required_annual_payment: Decimal,
    /// Required payment not covered by withholding.
    pub shortfall: Decimal,
    pub quarterly_installment: Decimal,
    pub payments_required: bool,
}

/// Full liability for one profile and tax year. Built once per evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub tax_year: i32,
    pub filing_status: FilingStatus,

    pub provisional_income: Decimal,
    pub taxable_social_security: Decimal,
    pub adjusted_gross_income: Decimal,

    pub deduction_kind: DeductionKind,
    /// Standard (with age-65 additions) or itemized amount.
    pub deduction: Decimal,
    pub age_65_addition: Decimal,
    pub senior_deduction: Decimal,
    pub qbi_deduction: Decimal,

    pub taxable_income: Decimal,
    pub ordinary_taxable_income: Decimal,
    pub preferential_taxable_income: Decimal,

    pub ordinary_tax: BracketTax,
    pub preferential_tax: BracketTax,
    pub self_employment_tax: SelfEmploymentTax,
    pub net_investment_income_tax: Decimal,
    pub additional_medicare_tax: Decimal,

    pub total_tax_before_credits: Decimal,
    pub child_tax_credit: Decimal,
    pub total_tax: Decimal,

    pub total_payments: Decimal,
    /// Positive when tax is owed, negative for a refund.
    pub balance_due: Decimal,

    pub effective_rate: Decimal,
    pub marginal_rate: Decimal,

    pub estimated_payments: Option<EstimatedPaymentPlan>,
}

impl TaxResult {
    /// Regular income tax: ordinary plus preferential bracket tax.
    pub fn income_tax(&self) -> Decimal {
        self.ordinary_tax.tax + self.preferential_tax.tax
    }

    pub fn is_refund(&self) -> bool {
        self.balance_due < Decimal::ZERO
    }
}
