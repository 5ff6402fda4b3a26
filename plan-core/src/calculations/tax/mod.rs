//! Income-tax path: bracket math, deductions, surtaxes and the evaluator
//! that composes them.

mod brackets;
mod deductions;
mod liability;
mod social_security;
mod surtax;

pub use brackets::ProgressiveBracketEngine;
pub use deductions::{DeductionOutcome, DeductionResolver};
pub use liability::TaxLiabilityEvaluator;
pub use social_security::{provisional_income, taxable_social_security};
pub use surtax::SurtaxCalculator;
