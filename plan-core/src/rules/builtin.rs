//! Compiled-in rule tables for tax years and benefit-law years 2024 to 2026.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::benefit_rules::{BenefitRules, FraStep, MonthlyRate};
use super::tax_rules::{
    EstimatedPaymentRules, FilingStatusRules, SelfEmploymentRules, SeniorDeduction, TaxYearRules,
};
use crate::models::{Age, BracketSchedule};

const ORDINARY_RATES: [Decimal; 7] = [
    dec!(0.10),
    dec!(0.12),
    dec!(0.22),
    dec!(0.24),
    dec!(0.32),
    dec!(0.35),
    dec!(0.37),
];

const PREFERENTIAL_RATES: [Decimal; 3] = [dec!(0.00), dec!(0.15), dec!(0.20)];

/// Per-status figures that change from year to year.
struct StatusTable {
    ordinary_edges: [Decimal; 6],
    preferential_edges: [Decimal; 2],
    standard_deduction: Decimal,
    age_65_addition: Decimal,
    qbi_threshold: Decimal,
    qbi_phase_in_range: Decimal,
}

/// Thresholds fixed in statute rather than indexed.
struct StatusThresholds {
    ss_base: Decimal,
    ss_adjusted: Decimal,
    surtax: Decimal,
    senior_phase_out: Decimal,
}

const SINGLE_THRESHOLDS: StatusThresholds = StatusThresholds {
    ss_base: dec!(25000),
    ss_adjusted: dec!(34000),
    surtax: dec!(200000),
    senior_phase_out: dec!(75000),
};

const JOINT_THRESHOLDS: StatusThresholds = StatusThresholds {
    ss_base: dec!(32000),
    ss_adjusted: dec!(44000),
    surtax: dec!(250000),
    senior_phase_out: dec!(150000),
};

fn status_rules(
    table: StatusTable,
    thresholds: &StatusThresholds,
) -> FilingStatusRules {
    FilingStatusRules {
        ordinary_brackets: BracketSchedule::from_edges_unchecked(
            &table.ordinary_edges,
            &ORDINARY_RATES,
        ),
        preferential_brackets: BracketSchedule::from_edges_unchecked(
            &table.preferential_edges,
            &PREFERENTIAL_RATES,
        ),
        standard_deduction: table.standard_deduction,
        age_65_addition: table.age_65_addition,
        ss_base_threshold: thresholds.ss_base,
        ss_adjusted_threshold: thresholds.ss_adjusted,
        niit_threshold: thresholds.surtax,
        additional_medicare_threshold: thresholds.surtax,
        qbi_threshold: table.qbi_threshold,
        qbi_phase_in_range: table.qbi_phase_in_range,
        senior_phase_out_threshold: thresholds.senior_phase_out,
    }
}

fn tax_year(
    tax_year: i32,
    [single, joint, head]: [StatusTable; 3],
    ss_wage_max: Decimal,
    child_tax_credit: Decimal,
    senior_deduction: Option<SeniorDeduction>,
) -> TaxYearRules {
    TaxYearRules {
        tax_year,
        single: status_rules(single, &SINGLE_THRESHOLDS),
        married_filing_jointly: status_rules(joint, &JOINT_THRESHOLDS),
        head_of_household: status_rules(head, &SINGLE_THRESHOLDS),
        self_employment: SelfEmploymentRules {
            ss_wage_max,
            ss_tax_rate: dec!(0.124),
            medicare_tax_rate: dec!(0.029),
            net_earnings_factor: dec!(0.9235),
            deduction_factor: dec!(0.50),
            min_se_threshold: dec!(400),
        },
        niit_rate: dec!(0.038),
        additional_medicare_rate: dec!(0.009),
        qbi_rate: dec!(0.20),
        child_tax_credit,
        senior_deduction,
        estimated_payments: EstimatedPaymentRules {
            current_year_factor: dec!(0.90),
            prior_year_factor: dec!(1.00),
            high_income_prior_year_factor: dec!(1.10),
            high_income_agi_threshold: dec!(150000),
            required_payment_threshold: dec!(1000),
            installments: 4,
        },
    }
}

fn senior_deduction() -> Option<SeniorDeduction> {
    Some(SeniorDeduction {
        amount_per_person: dec!(6000),
        phase_out_rate: dec!(0.06),
    })
}

pub(super) fn tax_years() -> Vec<TaxYearRules> {
    vec![
        tax_year(
            2024,
            [
                StatusTable {
                    ordinary_edges: [
                        dec!(11600),
                        dec!(47150),
                        dec!(100525),
                        dec!(191950),
                        dec!(243725),
                        dec!(609350),
                    ],
                    preferential_edges: [dec!(47025), dec!(518900)],
                    standard_deduction: dec!(14600),
                    age_65_addition: dec!(1950),
                    qbi_threshold: dec!(191950),
                    qbi_phase_in_range: dec!(50000),
                },
                StatusTable {
                    ordinary_edges: [
                        dec!(23200),
                        dec!(94300),
                        dec!(201050),
                        dec!(383900),
                        dec!(487450),
                        dec!(731200),
                    ],
                    preferential_edges: [dec!(94050), dec!(583750)],
                    standard_deduction: dec!(29200),
                    age_65_addition: dec!(1550),
                    qbi_threshold: dec!(383900),
                    qbi_phase_in_range: dec!(100000),
                },
                StatusTable {
                    ordinary_edges: [
                        dec!(16550),
                        dec!(63100),
                        dec!(100500),
                        dec!(191950),
                        dec!(243700),
                        dec!(609350),
                    ],
                    preferential_edges: [dec!(63000), dec!(551350)],
                    standard_deduction: dec!(21900),
                    age_65_addition: dec!(1950),
                    qbi_threshold: dec!(191950),
                    qbi_phase_in_range: dec!(50000),
                },
            ],
            dec!(168600),
            dec!(2000),
            None,
        ),
        tax_year(
            2025,
            [
                StatusTable {
                    ordinary_edges: [
                        dec!(11925),
                        dec!(48475),
                        dec!(103350),
                        dec!(197300),
                        dec!(250525),
                        dec!(626350),
                    ],
                    preferential_edges: [dec!(48350), dec!(533400)],
                    standard_deduction: dec!(15750),
                    age_65_addition: dec!(2000),
                    qbi_threshold: dec!(197300),
                    qbi_phase_in_range: dec!(50000),
                },
                StatusTable {
                    ordinary_edges: [
                        dec!(23850),
                        dec!(96950),
                        dec!(206700),
                        dec!(394600),
                        dec!(501050),
                        dec!(751600),
                    ],
                    preferential_edges: [dec!(96700), dec!(600050)],
                    standard_deduction: dec!(31500),
                    age_65_addition: dec!(1600),
                    qbi_threshold: dec!(394600),
                    qbi_phase_in_range: dec!(100000),
                },
                StatusTable {
                    ordinary_edges: [
                        dec!(17000),
                        dec!(64850),
                        dec!(103350),
                        dec!(197300),
                        dec!(250500),
                        dec!(626350),
                    ],
                    preferential_edges: [dec!(64750), dec!(566700)],
                    standard_deduction: dec!(23625),
                    age_65_addition: dec!(2000),
                    qbi_threshold: dec!(197300),
                    qbi_phase_in_range: dec!(50000),
                },
            ],
            dec!(176100),
            dec!(2200),
            senior_deduction(),
        ),
        tax_year(
            2026,
            [
                StatusTable {
                    ordinary_edges: [
                        dec!(12400),
                        dec!(50400),
                        dec!(105700),
                        dec!(201775),
                        dec!(256225),
                        dec!(640600),
                    ],
                    preferential_edges: [dec!(49450), dec!(545500)],
                    standard_deduction: dec!(16100),
                    age_65_addition: dec!(2050),
                    qbi_threshold: dec!(201775),
                    qbi_phase_in_range: dec!(75000),
                },
                StatusTable {
                    ordinary_edges: [
                        dec!(24800),
                        dec!(100800),
                        dec!(211400),
                        dec!(403550),
                        dec!(512450),
                        dec!(768700),
                    ],
                    preferential_edges: [dec!(98900), dec!(613700)],
                    standard_deduction: dec!(32200),
                    age_65_addition: dec!(1650),
                    qbi_threshold: dec!(403550),
                    qbi_phase_in_range: dec!(150000),
                },
                StatusTable {
                    ordinary_edges: [
                        dec!(17700),
                        dec!(67450),
                        dec!(105700),
                        dec!(201750),
                        dec!(256200),
                        dec!(640600),
                    ],
                    preferential_edges: [dec!(66200), dec!(579600)],
                    standard_deduction: dec!(24150),
                    age_65_addition: dec!(2050),
                    qbi_threshold: dec!(201775),
                    qbi_phase_in_range: dec!(75000),
                },
            ],
            dec!(184500),
            dec!(2200),
            senior_deduction(),
        ),
    ]
}

fn fra_schedule() -> Vec<FraStep> {
    let mut steps = vec![FraStep {
        through_birth_year: 1954,
        age: Age::years(66),
    }];
    // Two months per birth year from 1955 through 1959.
    for (offset, year) in (1955..=1959).enumerate() {
        steps.push(FraStep {
            through_birth_year: year,
            age: Age::new(66, 2 * (offset as u32 + 1)),
        });
    }
    steps.push(FraStep {
        through_birth_year: 1960,
        age: Age::years(67),
    });
    steps
}

fn benefit_year(
    law_year: i32,
    bend_points: [Decimal; 2],
) -> BenefitRules {
    BenefitRules {
        law_year,
        fra_schedule: fra_schedule(),
        early_reduction_first: MonthlyRate::new(5, 9),
        early_reduction_months: 36,
        early_reduction_beyond: MonthlyRate::new(5, 12),
        delayed_increase: MonthlyRate::new(2, 3),
        spousal_reduction_first: MonthlyRate::new(25, 36),
        spousal_reduction_beyond: MonthlyRate::new(5, 12),
        spousal_fraction: dec!(0.5),
        survivor_max_reduction: dec!(0.285),
        survivor_earliest_age: Age::years(60),
        offset_fraction: dec!(2) / dec!(3),
        bend_points,
        pia_factors: [dec!(0.90), dec!(0.32), dec!(0.15)],
        earliest_claiming_age: Age::years(62),
        latest_claiming_age: Age::years(70),
        break_even_horizon: 100,
        min_birth_year: 1943,
        max_birth_year: 2015,
        min_life_expectancy: 62,
        max_life_expectancy: 120,
    }
}

pub(super) fn benefit_years() -> Vec<BenefitRules> {
    vec![
        benefit_year(2024, [dec!(1174), dec!(7078)]),
        benefit_year(2025, [dec!(1226), dec!(7391)]),
        benefit_year(2026, [dec!(1286), dec!(7749)]),
    ]
}
