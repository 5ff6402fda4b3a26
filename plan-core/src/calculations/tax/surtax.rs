//! Self-employment tax and the two AGI-threshold surtaxes.
//!
//! # Self-employment tax
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Net profit from self-employment |
//! | 2    | Net earnings: step 1 × 92.35% |
//! | 3    | Medicare portion: step 2 × 2.9% |
//! | 4    | Wage base remaining after wages (zero or more) |
//! | 5    | Social security portion: min(step 2, step 4) × 12.4% |
//! | 6    | SE tax: step 3 + step 5 |
//! | 7    | Deductible part: step 6 × 50% |
//!
//! Net profit at or below $400 owes no SE tax.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use plan_core::RuleBook;
//! use plan_core::calculations::tax::SurtaxCalculator;
//!
//! let book = RuleBook::builtin();
//! let rules = book.tax_rules(2025).unwrap();
//! let surtax = SurtaxCalculator::new(rules, &rules.single);
//!
//! let se = surtax.self_employment_tax(dec!(100000.00), dec!(50000.00));
//!
//! assert_eq!(se.total, dec!(14129.55));
//! assert_eq!(se.deduction, dec!(7064.78));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::{non_negative, round_half_up};
use crate::models::SelfEmploymentTax;
use crate::rules::{FilingStatusRules, TaxYearRules};

#[derive(Debug, Clone, Copy)]
pub struct SurtaxCalculator<'a> {
    year: &'a TaxYearRules,
    status: &'a FilingStatusRules,
}

impl<'a> SurtaxCalculator<'a> {
    pub fn new(
        year: &'a TaxYearRules,
        status: &'a FilingStatusRules,
    ) -> Self {
        Self { year, status }
    }

    /// SE tax on `net_profit` given `wages` already subject to social security tax.
    pub fn self_employment_tax(
        &self,
        net_profit: Decimal,
        wages: Decimal,
    ) -> SelfEmploymentTax {
        let rules = &self.year.self_employment;

        if net_profit <= Decimal::ZERO {
            return SelfEmploymentTax::default();
        }
        if net_profit <= rules.min_se_threshold {
            warn!(
                net_profit = %net_profit,
                threshold = %rules.min_se_threshold,
                "SE income at or below minimum threshold; no SE tax due"
            );
            return SelfEmploymentTax {
                below_threshold: true,
                ..SelfEmploymentTax::default()
            };
        }

        let net_earnings = round_half_up(net_profit * rules.net_earnings_factor);
        let medicare_tax = round_half_up(net_earnings * rules.medicare_tax_rate);
        let remaining_base = non_negative(rules.ss_wage_max - wages);
        let ss_taxable_earnings = net_earnings.min(remaining_base);
        let social_security_tax = round_half_up(ss_taxable_earnings * rules.ss_tax_rate);
        let total = round_half_up(medicare_tax + social_security_tax);
        let deduction = round_half_up(total * rules.deduction_factor);

        debug!(
            net_earnings = %net_earnings,
            total = %total,
            deduction = %deduction,
            "self-employment tax"
        );

        SelfEmploymentTax {
            net_earnings,
            medicare_tax,
            ss_taxable_earnings,
            social_security_tax,
            total,
            deduction,
            below_threshold: false,
        }
    }

    /// 3.8% of the smaller of investment income or AGI above the threshold.
    pub fn net_investment_income_tax(
        &self,
        investment_income: Decimal,
        agi: Decimal,
    ) -> Decimal {
        let excess = non_negative(agi - self.status.niit_threshold);
        let base = non_negative(investment_income).min(excess);
        round_half_up(base * self.year.niit_rate)
    }

    /// 0.9% of combined wages and SE net earnings above the threshold.
    pub fn additional_medicare_tax(
        &self,
        wages: Decimal,
        se_net_earnings: Decimal,
    ) -> Decimal {
        let excess =
            non_negative(wages + se_net_earnings - self.status.additional_medicare_threshold);
        round_half_up(excess * self.year.additional_medicare_rate)
    }
}
