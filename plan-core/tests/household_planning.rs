//! End-to-end checks through the two public entry points.

use plan_core::{
    Age, BenefitProfile, BracketSchedule, DeductionElection, FilingStatus, HouseholdState,
    IncomeComponents, PlanError, RuleBook, RuleBookError, ScheduleKind, TaxProfile,
    evaluate_tax, optimize_benefit,
};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn two_tier_book() -> RuleBook {
    let mut book = RuleBook::builtin();
    let schedule = BracketSchedule::from_edges(&[dec!(10000)], &[dec!(0.10), dec!(0.22)])
        .expect("valid schedule");
    book.replace_schedule(2025, FilingStatus::Single, ScheduleKind::Ordinary, schedule)
        .expect("2025 is built in");
    book
}

// =============================================================================
// Tax path
// =============================================================================

#[test]
fn two_tier_schedule_taxes_15000_at_2100() {
    let profile = TaxProfile {
        income: IncomeComponents {
            ordinary_income: dec!(15000),
            ..Default::default()
        },
        deduction: DeductionElection::Itemized(dec!(0)),
        ..TaxProfile::new(2025, FilingStatus::Single)
    };

    let result = evaluate_tax(&two_tier_book(), &profile).expect("valid profile");

    assert_eq!(result.taxable_income, dec!(15000));
    assert_eq!(result.ordinary_tax.tax, dec!(2100.00));
    assert_eq!(result.ordinary_tax.breakdown.len(), 2);
    assert_eq!(result.total_tax, dec!(2100.00));
    assert_eq!(result.marginal_rate, dec!(0.22));
}

#[test]
fn breakdowns_sum_to_taxable_portions() {
    let book = RuleBook::builtin();
    let profile = TaxProfile {
        income: IncomeComponents {
            wages: dec!(118000),
            ordinary_income: dec!(24500),
            qualified_dividends: dec!(6200),
            short_term_gains: dec!(3100),
            long_term_gains: dec!(58000),
            self_employment_income: dec!(21000),
            social_security_benefits: dec!(24000),
        },
        filer_65_or_older: true,
        spouse_65_or_older: true,
        qualifying_children: 1,
        ..TaxProfile::new(2025, FilingStatus::MarriedFilingJointly)
    };

    let result = evaluate_tax(&book, &profile).expect("valid profile");

    assert_eq!(
        result.ordinary_tax.taxed_amount(),
        result.ordinary_taxable_income
    );
    assert_eq!(
        result.preferential_tax.taxed_amount(),
        result.preferential_taxable_income
    );
    assert_eq!(
        result.ordinary_taxable_income + result.preferential_taxable_income,
        result.taxable_income
    );
}

#[test]
fn zero_income_owes_nothing() {
    let result = evaluate_tax(
        &RuleBook::builtin(),
        &TaxProfile::new(2026, FilingStatus::HeadOfHousehold),
    )
    .expect("valid profile");

    assert_eq!(result.total_tax, dec!(0));
    assert_eq!(result.effective_rate, dec!(0));
    assert_eq!(result.balance_due, dec!(0));
    assert!(result.ordinary_tax.breakdown.is_empty());
}

#[test]
fn unknown_year_is_refused_rather_than_guessed() {
    let profile = TaxProfile::new(2027, FilingStatus::Single);

    assert_eq!(
        evaluate_tax(&RuleBook::builtin(), &profile),
        Err(PlanError::Rules(RuleBookError::UnknownTaxYear(2027)))
    );
}

// =============================================================================
// Benefit path
// =============================================================================

#[test]
fn claiming_at_62_and_70_for_1960_birth_year() {
    let book = RuleBook::builtin();
    let rules = book.benefit_rules(2025).expect("2025 built in");
    let profile = BenefitProfile::with_pia(1960, dec!(2000), 85, Age::years(67));

    let report = optimize_benefit(rules, &profile, None).expect("valid profile");

    let at = |years: u32| {
        report
            .scenarios
            .iter()
            .find(|s| s.claiming_age == Age::years(years))
            .map(|s| s.monthly_benefit)
    };
    assert_eq!(report.primary.full_retirement_age, Age::years(67));
    assert_eq!(at(62), Some(dec!(1400.00)));
    assert_eq!(at(67), Some(dec!(2000.00)));
    assert_eq!(at(70), Some(dec!(2480.00)));
}

#[test]
fn surviving_spouse_collects_the_higher_benefit() {
    let book = RuleBook::builtin();
    let rules = book.benefit_rules(2025).expect("2025 built in");
    let a = BenefitProfile::with_pia(1960, dec!(2400), 80, Age::years(67));
    let b = BenefitProfile::with_pia(1960, dec!(1200), 90, Age::years(67));

    let report = optimize_benefit(rules, &a, Some(&b)).expect("valid profiles");

    let survivor_rows: Vec<_> = report
        .schedule
        .iter()
        .filter(|r| r.year >= 1960 + 80)
        .collect();
    assert!(!survivor_rows.is_empty());
    for row in survivor_rows {
        assert_eq!(row.state, HouseholdState::SurvivorOnly);
        assert_eq!(
            row.spouse.as_ref().map(|s| s.social_security),
            Some(dec!(2400.00))
        );
        assert_eq!(row.annual_total, dec!(28800.00));
    }
}

#[test]
fn young_widow_gets_reduced_survivor_benefit_until_fra() {
    let book = RuleBook::builtin();
    let rules = book.benefit_rules(2025).expect("2025 built in");
    let a = BenefitProfile::with_pia(1960, dec!(2400), 70, Age::years(67));
    let b = BenefitProfile::with_pia(1965, dec!(1200), 85, Age::years(62));

    let report = optimize_benefit(rules, &a, Some(&b)).expect("valid profiles");

    let survivor_amount = |year: i32| {
        report
            .schedule
            .iter()
            .find(|r| r.year == year)
            .and_then(|r| r.spouse.as_ref())
            .map(|s| s.social_security)
    };
    assert_eq!(survivor_amount(2029), Some(dec!(840.00)));
    assert_eq!(survivor_amount(2030), Some(dec!(2204.57)));
    assert_eq!(survivor_amount(2032), Some(dec!(2400.00)));
}

#[test]
fn both_entry_points_are_idempotent() {
    let book = RuleBook::builtin();
    let tax = TaxProfile {
        income: IncomeComponents {
            ordinary_income: dec!(64000),
            long_term_gains: dec!(12000),
            ..Default::default()
        },
        ..TaxProfile::new(2024, FilingStatus::Single)
    };
    let rules = book.benefit_rules(2024).expect("2024 built in");
    let a = BenefitProfile::with_pia(1957, dec!(2150), 86, Age::new(66, 6));
    let b = BenefitProfile::with_pia(1959, dec!(980), 91, Age::years(63));

    assert_eq!(evaluate_tax(&book, &tax), evaluate_tax(&book, &tax));
    assert_eq!(
        optimize_benefit(rules, &a, Some(&b)),
        optimize_benefit(rules, &a, Some(&b))
    );
}
