//! Household retirement planning: federal income tax liability and Social
//! Security claiming analysis.
//!
//! All money is [`rust_decimal::Decimal`], rounded half-up to cents at each
//! reported figure. Rule tables live in a [`RuleBook`] keyed by year; the
//! built-in book covers 2024 through 2026.
//!
//! ```
//! use plan_core::{evaluate_tax, FilingStatus, IncomeComponents, RuleBook, TaxProfile};
//! use rust_decimal_macros::dec;
//!
//! let book = RuleBook::builtin();
//! let profile = TaxProfile {
//!     income: IncomeComponents {
//!         wages: dec!(75000),
//!         ..Default::default()
//!     },
//!     ..TaxProfile::new(2024, FilingStatus::Single)
//! };
//!
//! let result = evaluate_tax(&book, &profile).unwrap();
//! assert_eq!(result.taxable_income, dec!(60400));
//! ```

pub mod calculations;
pub mod engine;
pub mod models;
pub mod rules;

pub use engine::{PlanError, evaluate_tax, optimize_benefit};
pub use models::*;
pub use rules::{BenefitRules, RuleBook, RuleBookError, ScheduleKind, TaxYearRules};
