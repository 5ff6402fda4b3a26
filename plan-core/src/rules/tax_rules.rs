use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{BracketSchedule, FilingStatus};

/// Errors that make a tax year's rule table unusable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxRulesError {
    /// The net earnings factor must be between 0 and 1 (exclusive of 0).
    #[error("net earnings factor must be between 0 and 1, got {0}")]
    InvalidNetEarningsFactor(Decimal),

    #[error("{name} must be between 0 and 1, got {value}")]
    InvalidRate { name: &'static str, value: Decimal },

    #[error("social security wage maximum must be positive, got {0}")]
    InvalidSsWageMax(Decimal),

    #[error("{name} must be non-negative, got {value}")]
    NegativeAmount { name: &'static str, value: Decimal },

    #[error("{status:?}: adjusted Social Security threshold {adjusted} is below base threshold {base}")]
    SocialSecurityThresholds {
        status: FilingStatus,
        base: Decimal,
        adjusted: Decimal,
    },

    #[error("{status:?}: QBI phase-in range must be positive, got {range}")]
    QbiPhaseInRange {
        status: FilingStatus,
        range: Decimal,
    },
}

/// Which of a filing status's two schedules a bracket list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleKind {
    Ordinary,
    Preferential,
}

impl ScheduleKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ordinary" => Some(Self::Ordinary),
            "preferential" => Some(Self::Preferential),
            _ => None,
        }
    }
}

/// Thresholds and schedules that depend on filing status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingStatusRules {
    pub ordinary_brackets: BracketSchedule,
    /// Qualified dividends and long-term gains.
    pub preferential_brackets: BracketSchedule,
    pub standard_deduction: Decimal,
    /// Added to the standard deduction per person 65 or older.
    pub age_65_addition: Decimal,
    /// Provisional income above which up to 50% of benefits are taxable.
    pub ss_base_threshold: Decimal,
    /// Provisional income above which up to 85% of benefits are taxable.
    pub ss_adjusted_threshold: Decimal,
    pub niit_threshold: Decimal,
    pub additional_medicare_threshold: Decimal,
    pub qbi_threshold: Decimal,
    /// Width of the band above `qbi_threshold` over which an SSTB deduction phases out.
    pub qbi_phase_in_range: Decimal,
    pub senior_phase_out_threshold: Decimal,
}

/// Self-employment tax parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfEmploymentRules {
    /// Maximum earnings subject to social security tax (the wage base).
    pub ss_wage_max: Decimal,
    /// Combined employer and employee social security rate, typically 12.4%.
    pub ss_tax_rate: Decimal,
    /// Combined employer and employee Medicare rate, typically 2.9%.
    pub medicare_tax_rate: Decimal,
    /// Share of net profit treated as net earnings, typically 92.35%.
    pub net_earnings_factor: Decimal,
    /// Deductible share of SE tax, typically 50%.
    pub deduction_factor: Decimal,
    /// Net profit at or below this owes no SE tax ($400).
    pub min_se_threshold: Decimal,
}

/// Time-limited deduction for taxpayers 65 and older.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeniorDeduction {
    pub amount_per_person: Decimal,
    /// Reduction per dollar of AGI above the filing-status threshold.
    pub phase_out_rate: Decimal,
}

/// Form 1040-ES safe-harbor parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatedPaymentRules {
    pub current_year_factor: Decimal,
    pub prior_year_factor: Decimal,
    pub high_income_prior_year_factor: Decimal,
    /// Prior-year AGI above which the high-income factor applies.
    pub high_income_agi_threshold: Decimal,
    /// Balance below which no estimated payments are required.
    pub required_payment_threshold: Decimal,
    pub installments: u32,
}

/// The complete rule table for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearRules {
    pub tax_year: i32,
    pub single: FilingStatusRules,
    pub married_filing_jointly: FilingStatusRules,
    pub head_of_household: FilingStatusRules,
    pub self_employment: SelfEmploymentRules,
    pub niit_rate: Decimal,
    pub additional_medicare_rate: Decimal,
    pub qbi_rate: Decimal,
    pub child_tax_credit: Decimal,
    /// Only present for the years the deduction is in law.
    pub senior_deduction: Option<SeniorDeduction>,
    pub estimated_payments: EstimatedPaymentRules,
}

impl TaxYearRules {
    pub fn for_status(
        &self,
        status: FilingStatus,
    ) -> &FilingStatusRules {
        match status {
            FilingStatus::Single => &self.single,
            FilingStatus::MarriedFilingJointly => &self.married_filing_jointly,
            FilingStatus::HeadOfHousehold => &self.head_of_household,
        }
    }

    pub fn for_status_mut(
        &mut self,
        status: FilingStatus,
    ) -> &mut FilingStatusRules {
        match status {
            FilingStatus::Single => &mut self.single,
            FilingStatus::MarriedFilingJointly => &mut self.married_filing_jointly,
            FilingStatus::HeadOfHousehold => &mut self.head_of_household,
        }
    }

    /// Validates rates and thresholds that the calculators depend on.
    ///
    /// Bracket schedules are already valid by construction.
    ///
    /// # Errors
    ///
    /// Returns [`TaxRulesError`] naming the first value outside its valid range.
    pub fn validate(&self) -> Result<(), TaxRulesError> {
        let se = &self.self_employment;
        if se.net_earnings_factor <= Decimal::ZERO || se.net_earnings_factor > Decimal::ONE {
            return Err(TaxRulesError::InvalidNetEarningsFactor(
                se.net_earnings_factor,
            ));
        }
        if se.ss_wage_max <= Decimal::ZERO {
            return Err(TaxRulesError::InvalidSsWageMax(se.ss_wage_max));
        }

        let rates = [
            ("ss_tax_rate", se.ss_tax_rate),
            ("medicare_tax_rate", se.medicare_tax_rate),
            ("deduction_factor", se.deduction_factor),
            ("niit_rate", self.niit_rate),
            ("additional_medicare_rate", self.additional_medicare_rate),
            ("qbi_rate", self.qbi_rate),
            (
                "current_year_factor",
                self.estimated_payments.current_year_factor,
            ),
        ];
        for (name, value) in rates {
            check_unit_rate(name, value)?;
        }
        if let Some(senior) = &self.senior_deduction {
            check_unit_rate("senior phase_out_rate", senior.phase_out_rate)?;
            check_non_negative("senior amount_per_person", senior.amount_per_person)?;
        }

        check_non_negative("min_se_threshold", se.min_se_threshold)?;
        check_non_negative("child_tax_credit", self.child_tax_credit)?;

        for status in FilingStatus::ALL {
            let rules = self.for_status(status);
            check_non_negative("standard_deduction", rules.standard_deduction)?;
            check_non_negative("age_65_addition", rules.age_65_addition)?;
            if rules.ss_adjusted_threshold < rules.ss_base_threshold {
                return Err(TaxRulesError::SocialSecurityThresholds {
                    status,
                    base: rules.ss_base_threshold,
                    adjusted: rules.ss_adjusted_threshold,
                });
            }
            if rules.qbi_phase_in_range <= Decimal::ZERO {
                return Err(TaxRulesError::QbiPhaseInRange {
                    status,
                    range: rules.qbi_phase_in_range,
                });
            }
        }
        Ok(())
    }
}

fn check_unit_rate(
    name: &'static str,
    value: Decimal,
) -> Result<(), TaxRulesError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(TaxRulesError::InvalidRate { name, value });
    }
    Ok(())
}

fn check_non_negative(
    name: &'static str,
    value: Decimal,
) -> Result<(), TaxRulesError> {
    if value < Decimal::ZERO {
        return Err(TaxRulesError::NegativeAmount { name, value });
    }
    Ok(())
}
