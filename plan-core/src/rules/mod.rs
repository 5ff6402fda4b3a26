//! Year-keyed rule tables.
//!
//! A [`RuleBook`] holds one [`TaxYearRules`] per tax year and one
//! [`BenefitRules`] per benefit-law year. The calculators read constants only
//! from these tables, so adding a year means adding data, not code.

mod benefit_rules;
mod builtin;
mod rule_book;
mod tax_rules;

pub use benefit_rules::{BenefitRules, BenefitRulesError, FraStep, MonthlyRate};
pub use rule_book::{RuleBook, RuleBookError};
pub use tax_rules::{
    EstimatedPaymentRules, FilingStatusRules, ScheduleKind, SelfEmploymentRules, SeniorDeduction,
    TaxRulesError, TaxYearRules,
};
