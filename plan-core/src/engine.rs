//! The two entry points: [`evaluate_tax`] and [`optimize_benefit`].
//!
//! Both are pure. They validate their inputs, resolve one year's rules and
//! hand off to the calculators; calling either twice with the same inputs
//! yields identical results.

use thiserror::Error;
use tracing::info;

use crate::calculations::benefits::{
    BenefitCurveCalculator, Claimant, ClaimingStrategyEnumerator, PensionOffsetComparator,
    ScenarioAnalyzer, ScheduleProjector,
};
use crate::calculations::tax::TaxLiabilityEvaluator;
use crate::models::{
    BenefitProfile, BenefitReport, PersonSummary, ProfileError, TaxProfile, TaxResult,
};
use crate::rules::{BenefitRules, RuleBook, RuleBookError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error(transparent)]
    Rules(#[from] RuleBookError),

    #[error("invalid profile: {0}")]
    Profile(#[from] ProfileError),
}

/// Computes the full liability for `profile` using its tax year's rules.
///
/// # Errors
///
/// Returns [`PlanError::Rules`] when the tax year has no rule table and
/// [`PlanError::Profile`] when the profile holds a negative amount.
pub fn evaluate_tax(
    book: &RuleBook,
    profile: &TaxProfile,
) -> Result<TaxResult, PlanError> {
    let rules = book.tax_rules(profile.tax_year)?;
    profile.validate()?;

    info!(
        tax_year = profile.tax_year,
        filing_status = profile.filing_status.as_str(),
        "evaluating tax"
    );
    Ok(TaxLiabilityEvaluator::new(rules).evaluate(profile))
}

/// Claiming analysis for one person, or a couple when `spouse` is given.
///
/// A single person gets scenarios, the break-even table and a schedule.
/// A couple additionally gets the spouse's scenarios, the five named
/// strategies, the best whole-year pair and any pension offset comparisons.
///
/// # Errors
///
/// Returns [`PlanError::Profile`] when either profile is outside the
/// supported ranges in `rules`.
pub fn optimize_benefit(
    rules: &BenefitRules,
    primary: &BenefitProfile,
    spouse: Option<&BenefitProfile>,
) -> Result<BenefitReport, PlanError> {
    primary.validate(rules)?;
    if let Some(spouse) = spouse {
        spouse.validate(rules)?;
    }

    info!(
        law_year = rules.law_year,
        couple = spouse.is_some(),
        "optimizing benefit claim"
    );

    let curve = BenefitCurveCalculator::new(rules);
    let analyzer = ScenarioAnalyzer::new(curve);
    let enumerator = ClaimingStrategyEnumerator::new(curve);
    let projector = ScheduleProjector::new(enumerator);
    let offsets = PensionOffsetComparator::new(curve);

    let primary = Claimant::resolve(primary, &curve);
    let spouse = spouse.map(|s| Claimant::resolve(s, &curve));

    let scenarios = analyzer.scenarios(&primary);
    let optimal_age = ScenarioAnalyzer::optimal_age(&scenarios).unwrap_or(primary.claiming_age);
    let break_even_table = analyzer.break_even_table(&primary);
    let schedule = projector.project(&primary, spouse.as_ref());

    let primary_summary = summarize(&enumerator, &primary, spouse.as_ref());
    let spouse_summary = spouse
        .as_ref()
        .map(|s| summarize(&enumerator, s, Some(&primary)));
    let spouse_scenarios = spouse.as_ref().map(|s| analyzer.scenarios(s));

    let strategies = spouse
        .as_ref()
        .map(|s| enumerator.enumerate(&primary, s));
    let optimal_strategy = strategies
        .as_deref()
        .and_then(|all| all.iter().find(|s| s.optimal))
        .map(|s| s.kind);
    let best_pair = spouse
        .as_ref()
        .and_then(|s| enumerator.exhaustive_search(&primary, s));

    let pension_offsets = match &spouse {
        Some(s) => [
            offsets.compare(&primary, s, true),
            offsets.compare(s, &primary, false),
        ]
        .into_iter()
        .flatten()
        .collect(),
        None => Vec::new(),
    };

    Ok(BenefitReport {
        law_year: rules.law_year,
        primary: primary_summary,
        spouse: spouse_summary,
        scenarios,
        spouse_scenarios,
        optimal_age,
        break_even_table,
        strategies,
        optimal_strategy,
        best_pair,
        schedule,
        pension_offsets,
    })
}

fn summarize(
    enumerator: &ClaimingStrategyEnumerator<'_>,
    person: &Claimant,
    partner: Option<&Claimant>,
) -> PersonSummary {
    let own_monthly = enumerator.own_monthly(person);
    let effective_monthly = match partner {
        Some(p) => enumerator.effective_monthly(person, p, person.claiming_age),
        None => own_monthly,
    };
    PersonSummary {
        primary_insurance_amount: person.primary_insurance_amount,
        full_retirement_age: person.full_retirement_age,
        claiming_age: person.claiming_age,
        own_monthly,
        effective_monthly,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{
        Age, FilingStatus, HouseholdState, IncomeComponents, NonCoveredPension, StrategyKind,
    };

    fn book() -> RuleBook {
        RuleBook::builtin()
    }

    // =========================================================================
    // evaluate_tax tests
    // =========================================================================

    #[test]
    fn evaluate_tax_rejects_unknown_year() {
        let profile = TaxProfile::new(2019, FilingStatus::Single);

        assert_eq!(
            evaluate_tax(&book(), &profile),
            Err(PlanError::Rules(RuleBookError::UnknownTaxYear(2019)))
        );
    }

    #[test]
    fn evaluate_tax_rejects_negative_income() {
        let profile = TaxProfile {
            income: IncomeComponents {
                long_term_gains: dec!(-10),
                ..Default::default()
            },
            ..TaxProfile::new(2025, FilingStatus::Single)
        };

        assert!(matches!(
            evaluate_tax(&book(), &profile),
            Err(PlanError::Profile(ProfileError::NegativeAmount { .. }))
        ));
    }

    #[test]
    fn evaluate_tax_is_idempotent() {
        let book = book();
        let profile = TaxProfile {
            income: IncomeComponents {
                ordinary_income: dec!(85000),
                qualified_dividends: dec!(4000),
                self_employment_income: dec!(12000),
                social_security_benefits: dec!(9000),
                ..Default::default()
            },
            ..TaxProfile::new(2026, FilingStatus::MarriedFilingJointly)
        };

        assert_eq!(evaluate_tax(&book, &profile), evaluate_tax(&book, &profile));
    }

    // =========================================================================
    // optimize_benefit tests
    // =========================================================================

    fn rules() -> BenefitRules {
        book().benefit_rules(2025).cloned().expect("2025 built in")
    }

    #[test]
    fn single_person_report_has_no_couple_sections() {
        let profile = BenefitProfile::with_pia(1960, dec!(2000), 85, Age::years(67));

        let report = optimize_benefit(&rules(), &profile, None).expect("valid profile");

        assert_eq!(report.scenarios.len(), 9);
        assert_eq!(report.break_even_table.len(), 3);
        assert_eq!(report.optimal_age, Age::years(70));
        assert_eq!(report.strategies, None);
        assert_eq!(report.optimal_strategy, None);
        assert_eq!(report.best_pair, None);
        assert_eq!(report.spouse, None);
        assert!(report.pension_offsets.is_empty());
        assert_eq!(report.primary.own_monthly, dec!(2000.00));
        assert!(report
            .schedule
            .iter()
            .all(|r| r.state == HouseholdState::Receiving));
    }

    #[test]
    fn couple_report_flags_one_optimal_strategy() {
        let primary = BenefitProfile::with_pia(1960, dec!(2400), 80, Age::years(67));
        let spouse = BenefitProfile::with_pia(1962, dec!(1200), 92, Age::years(67));

        let report = optimize_benefit(&rules(), &primary, Some(&spouse)).expect("valid profiles");

        let strategies = report.strategies.expect("couple");
        assert_eq!(strategies.len(), 5);
        assert_eq!(strategies.iter().filter(|s| s.optimal).count(), 1);
        let flagged = strategies.iter().find(|s| s.optimal).map(|s| s.kind);
        assert_eq!(report.optimal_strategy, flagged);
        assert!(report.best_pair.is_some());
        assert_eq!(report.spouse_scenarios.map(|s| s.len()), Some(9));
    }

    #[test]
    fn couple_report_compares_pension_offset() {
        let primary = BenefitProfile::with_pia(1960, dec!(2400), 85, Age::years(67));
        let spouse = BenefitProfile {
            pension: Some(NonCoveredPension {
                monthly_amount: dec!(900),
                survivor_percentage: dec!(0.5),
            }),
            ..BenefitProfile::with_pia(1960, dec!(300), 88, Age::years(67))
        };

        let report = optimize_benefit(&rules(), &primary, Some(&spouse)).expect("valid profiles");

        assert_eq!(report.pension_offsets.len(), 1);
        assert!(!report.pension_offsets[0].pensioner_is_primary);
        assert_eq!(report.pension_offsets[0].annual_savings, dec!(7200.00));
    }

    #[test]
    fn optimize_benefit_rejects_claiming_age_outside_window() {
        let profile = BenefitProfile::with_pia(1960, dec!(2000), 85, Age::years(71));

        assert!(matches!(
            optimize_benefit(&rules(), &profile, None),
            Err(PlanError::Profile(ProfileError::ClaimingAgeOutOfRange { .. }))
        ));
    }

    #[test]
    fn optimize_benefit_validates_spouse() {
        let primary = BenefitProfile::with_pia(1960, dec!(2000), 85, Age::years(67));
        let spouse = BenefitProfile::with_pia(1890, dec!(1000), 85, Age::years(67));

        assert!(matches!(
            optimize_benefit(&rules(), &primary, Some(&spouse)),
            Err(PlanError::Profile(ProfileError::BirthYearOutOfRange { year: 1890, .. }))
        ));
    }

    #[test]
    fn optimize_benefit_is_idempotent() {
        let rules = rules();
        let primary = BenefitProfile::with_pia(1958, dec!(2600), 84, Age::new(66, 8));
        let spouse = BenefitProfile::with_pia(1961, dec!(1100), 90, Age::years(62));

        assert_eq!(
            optimize_benefit(&rules, &primary, Some(&spouse)),
            optimize_benefit(&rules, &primary, Some(&spouse))
        );
    }

    #[test]
    fn strategy_kinds_cover_the_menu() {
        assert_eq!(StrategyKind::ALL.len(), 5);
    }
}
