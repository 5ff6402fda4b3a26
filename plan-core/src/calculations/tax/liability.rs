//! Full-year liability for one [`TaxProfile`].
//!
//! The evaluator runs the components in dependency order:
//!
//! 1. SE tax, whose deductible half feeds provisional income and AGI
//! 2. Taxable Social Security from provisional income
//! 3. AGI
//! 4. Base deduction, senior deduction, then QBI against the remainder
//! 5. Taxable income split into ordinary and preferential parts
//! 6. Ordinary bracket tax, then preferential tax stacked above it
//! 7. NIIT and Additional Medicare Tax
//! 8. Child tax credit, limited to regular income tax
//! 9. Payments, balance, rates and the optional estimated-payment plan

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::brackets::ProgressiveBracketEngine;
use super::deductions::DeductionResolver;
use super::social_security::{provisional_income, taxable_social_security};
use super::surtax::SurtaxCalculator;
use crate::calculations::common::{non_negative, round_half_up, round_rate};
use crate::models::{EstimatedPaymentPlan, PriorYearTax, TaxProfile, TaxResult};
use crate::rules::TaxYearRules;

#[derive(Debug, Clone, Copy)]
pub struct TaxLiabilityEvaluator<'a> {
    rules: &'a TaxYearRules,
}

impl<'a> TaxLiabilityEvaluator<'a> {
    pub fn new(rules: &'a TaxYearRules) -> Self {
        Self { rules }
    }

    /// Evaluates `profile` against this evaluator's tax year.
    ///
    /// The profile is expected to have passed [`TaxProfile::validate`].
    pub fn evaluate(
        &self,
        profile: &TaxProfile,
    ) -> TaxResult {
        let status_rules = self.rules.for_status(profile.filing_status);
        let income = &profile.income;
        let surtax = SurtaxCalculator::new(self.rules, status_rules);
        let deductions = DeductionResolver::new(self.rules, status_rules);

        let self_employment_tax =
            surtax.self_employment_tax(income.self_employment_income, income.wages);

        let provisional_income = provisional_income(income, self_employment_tax.deduction);
        let taxable_social_security = taxable_social_security(
            provisional_income,
            income.social_security_benefits,
            status_rules,
        );

        let adjusted_gross_income = round_half_up(
            income.ordinary_total()
                + income.short_term_gains
                + income.preferential_income()
                + income.self_employment_income
                - self_employment_tax.deduction
                + taxable_social_security,
        );

        let base = deductions.base_deduction(profile);
        let senior_deduction =
            deductions.senior_deduction(profile.seniors(), adjusted_gross_income);
        let taxable_before_qbi =
            non_negative(adjusted_gross_income - base.amount - senior_deduction);
        if adjusted_gross_income < base.amount + senior_deduction {
            warn!(
                agi = %adjusted_gross_income,
                deductions = %(base.amount + senior_deduction),
                "deductions exceed AGI; taxable income is zero"
            );
        }

        let qualified_business_income =
            non_negative(income.self_employment_income - self_employment_tax.deduction);
        let qbi_deduction = deductions.qbi_deduction(
            qualified_business_income,
            taxable_before_qbi,
            profile.specified_service_business,
        );

        let taxable_income = round_half_up(non_negative(taxable_before_qbi - qbi_deduction));
        let preferential_taxable_income = income.preferential_income().min(taxable_income);
        let ordinary_taxable_income = taxable_income - preferential_taxable_income;

        let ordinary_tax = ProgressiveBracketEngine::new(&status_rules.ordinary_brackets)
            .tax_on_amount(ordinary_taxable_income);
        let preferential_tax = ProgressiveBracketEngine::new(&status_rules.preferential_brackets)
            .tax_stacked_on(ordinary_taxable_income, preferential_taxable_income);

        let net_investment_income_tax =
            surtax.net_investment_income_tax(income.investment_income(), adjusted_gross_income);
        let additional_medicare_tax =
            surtax.additional_medicare_tax(income.wages, self_employment_tax.net_earnings);

        let income_tax = ordinary_tax.tax + preferential_tax.tax;
        let total_tax_before_credits = round_half_up(
            income_tax
                + self_employment_tax.total
                + net_investment_income_tax
                + additional_medicare_tax,
        );
        let child_tax_credit = round_half_up(
            (self.rules.child_tax_credit * Decimal::from(profile.qualifying_children))
                .min(income_tax),
        );
        let total_tax = total_tax_before_credits - child_tax_credit;

        let total_payments = round_half_up(profile.payments.total());
        let balance_due = total_tax - total_payments;

        let effective_rate = if adjusted_gross_income > Decimal::ZERO {
            round_rate(total_tax / adjusted_gross_income)
        } else {
            Decimal::ZERO
        };
        let marginal_rate = ordinary_tax
            .marginal_rate()
            .unwrap_or_else(|| status_rules.ordinary_brackets.bottom_rate());

        let withholding = profile.payments.withholding;
        let estimated_payments = profile
            .prior_year
            .as_ref()
            .map(|prior| self.estimated_payment_plan(total_tax, withholding, prior));

        debug!(
            tax_year = self.rules.tax_year,
            agi = %adjusted_gross_income,
            taxable_income = %taxable_income,
            total_tax = %total_tax,
            "evaluated tax liability"
        );

        TaxResult {
            tax_year: self.rules.tax_year,
            filing_status: profile.filing_status,
            provisional_income,
            taxable_social_security,
            adjusted_gross_income,
            deduction_kind: base.kind,
            deduction: base.amount,
            age_65_addition: base.age_65_addition,
            senior_deduction,
            qbi_deduction,
            taxable_income,
            ordinary_taxable_income,
            preferential_taxable_income,
            ordinary_tax,
            preferential_tax,
            self_employment_tax,
            net_investment_income_tax,
            additional_medicare_tax,
            total_tax_before_credits,
            child_tax_credit,
            total_tax,
            total_payments,
            balance_due,
            effective_rate,
            marginal_rate,
            estimated_payments,
        }
    }

    /// Safe-harbor plan: the smaller of 90% of this year's tax or the prior
    /// year's tax (110% above the high-income AGI line), less withholding.
    fn estimated_payment_plan(
        &self,
        total_tax: Decimal,
        withholding: Decimal,
        prior: &PriorYearTax,
    ) -> EstimatedPaymentPlan {
        let rules = &self.rules.estimated_payments;

        let current_year = round_half_up(total_tax * rules.current_year_factor);
        let prior_factor = if prior.adjusted_gross_income > rules.high_income_agi_threshold {
            rules.high_income_prior_year_factor
        } else {
            rules.prior_year_factor
        };
        let prior_year = round_half_up(prior.total_tax * prior_factor);
        let required_annual_payment = current_year.min(prior_year);

        let shortfall = non_negative(required_annual_payment - withholding);
        let unpaid = non_negative(total_tax - withholding);
        let payments_required =
            shortfall > Decimal::ZERO && unpaid >= rules.required_payment_threshold;
        let quarterly_installment = if rules.installments == 0 {
            shortfall
        } else {
            round_half_up(shortfall / Decimal::from(rules.installments))
        };

        EstimatedPaymentPlan {
            required_annual_payment,
            shortfall,
            quarterly_installment,
            payments_required,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{
        BracketSchedule, DeductionElection, DeductionKind, FilingStatus, IncomeComponents,
        Payments,
    };
    use crate::rules::{RuleBook, ScheduleKind};

    fn rules_2025() -> TaxYearRules {
        RuleBook::builtin()
            .tax_rules(2025)
            .cloned()
            .expect("2025 built in")
    }

    fn single(income: IncomeComponents) -> TaxProfile {
        TaxProfile {
            income,
            ..TaxProfile::new(2025, FilingStatus::Single)
        }
    }

    // =========================================================================
    // Basic composition
    // =========================================================================

    #[test]
    fn two_tier_schedule_with_no_deduction() {
        let mut book = RuleBook::builtin();
        let schedule = BracketSchedule::from_edges(&[dec!(10000)], &[dec!(0.10), dec!(0.22)])
            .expect("valid schedule");
        book.replace_schedule(2025, FilingStatus::Single, ScheduleKind::Ordinary, schedule)
            .expect("2025 exists");
        let rules = book.tax_rules(2025).expect("2025 exists");
        let profile = TaxProfile {
            deduction: DeductionElection::Itemized(dec!(0)),
            ..single(IncomeComponents {
                ordinary_income: dec!(15000),
                ..Default::default()
            })
        };

        let result = TaxLiabilityEvaluator::new(rules).evaluate(&profile);

        assert_eq!(result.taxable_income, dec!(15000.00));
        assert_eq!(result.ordinary_tax.tax, dec!(2100.00));
        assert_eq!(result.total_tax, dec!(2100.00));
    }

    #[test]
    fn zero_income_owes_zero() {
        let rules = rules_2025();

        let result = TaxLiabilityEvaluator::new(&rules).evaluate(&single(Default::default()));

        assert_eq!(result.adjusted_gross_income, dec!(0));
        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.total_tax, dec!(0));
        assert_eq!(result.effective_rate, dec!(0));
        assert_eq!(result.marginal_rate, dec!(0.10));
    }

    #[test]
    fn wage_earner_with_standard_deduction() {
        let rules = rules_2025();
        let profile = TaxProfile {
            payments: Payments {
                withholding: dec!(6000),
                estimated_payments: dec!(0),
            },
            ..single(IncomeComponents {
                wages: dec!(75000),
                ..Default::default()
            })
        };

        let result = TaxLiabilityEvaluator::new(&rules).evaluate(&profile);

        // 75,000 - 15,750 = 59,250 taxable.
        // 1,192.50 + 4,386.00 + 0.22 × 10,775 = 7,949.00.
        assert_eq!(result.deduction_kind, DeductionKind::Standard);
        assert_eq!(result.taxable_income, dec!(59250.00));
        assert_eq!(result.ordinary_tax.tax, dec!(7949.00));
        assert_eq!(result.total_tax, dec!(7949.00));
        assert_eq!(result.balance_due, dec!(1949.00));
        assert!(!result.is_refund());
        assert_eq!(result.marginal_rate, dec!(0.22));
        assert_eq!(result.effective_rate, dec!(0.1060));
    }

    #[test]
    fn overpayment_gives_negative_balance() {
        let rules = rules_2025();
        let profile = TaxProfile {
            payments: Payments {
                withholding: dec!(10000),
                estimated_payments: dec!(500),
            },
            ..single(IncomeComponents {
                wages: dec!(75000),
                ..Default::default()
            })
        };

        let result = TaxLiabilityEvaluator::new(&rules).evaluate(&profile);

        assert_eq!(result.total_payments, dec!(10500.00));
        assert_eq!(result.balance_due, dec!(-2551.00));
        assert!(result.is_refund());
    }

    // =========================================================================
    // Preferential stacking
    // =========================================================================

    #[test]
    fn gains_stack_above_ordinary_income() {
        let rules = rules_2025();
        let profile = single(IncomeComponents {
            ordinary_income: dec!(55750),
            long_term_gains: dec!(20000),
            ..Default::default()
        });

        let result = TaxLiabilityEvaluator::new(&rules).evaluate(&profile);

        // Ordinary taxable 40,000; gains fill 8,350 at 0% and 11,650 at 15%.
        assert_eq!(result.ordinary_taxable_income, dec!(40000.00));
        assert_eq!(result.preferential_taxable_income, dec!(20000));
        assert_eq!(result.preferential_tax.tax, dec!(1747.50));
        assert_eq!(
            result.ordinary_tax.taxed_amount(),
            result.ordinary_taxable_income
        );
        assert_eq!(
            result.preferential_tax.taxed_amount(),
            result.preferential_taxable_income
        );
    }

    #[test]
    fn deduction_absorbs_ordinary_before_gains() {
        let rules = rules_2025();
        let profile = single(IncomeComponents {
            ordinary_income: dec!(5000),
            qualified_dividends: dec!(30000),
            ..Default::default()
        });

        let result = TaxLiabilityEvaluator::new(&rules).evaluate(&profile);

        // Taxable 19,250 is all preferential and sits in the 0% band.
        assert_eq!(result.taxable_income, dec!(19250.00));
        assert_eq!(result.preferential_taxable_income, dec!(19250.00));
        assert_eq!(result.ordinary_taxable_income, dec!(0));
        assert_eq!(result.total_tax, dec!(0));
    }

    // =========================================================================
    // Social Security, SE, surtaxes
    // =========================================================================

    #[test]
    fn taxable_social_security_enters_agi() {
        let rules = rules_2025();
        let profile = single(IncomeComponents {
            ordinary_income: dec!(20000),
            social_security_benefits: dec!(20000),
            ..Default::default()
        });

        let result = TaxLiabilityEvaluator::new(&rules).evaluate(&profile);

        // Provisional 30,000 → 2,500 taxable.
        assert_eq!(result.provisional_income, dec!(30000.00));
        assert_eq!(result.taxable_social_security, dec!(2500.00));
        assert_eq!(result.adjusted_gross_income, dec!(22500.00));
    }

    #[test]
    fn self_employment_income_pays_se_tax_and_gets_qbi() {
        let rules = rules_2025();
        let profile = single(IncomeComponents {
            self_employment_income: dec!(100000),
            ..Default::default()
        });

        let result = TaxLiabilityEvaluator::new(&rules).evaluate(&profile);

        assert_eq!(result.self_employment_tax.total, dec!(14129.55));
        assert_eq!(result.adjusted_gross_income, dec!(92935.22));
        // 20% of 92,935.22 vs 20% of 77,185.22.
        assert_eq!(result.qbi_deduction, dec!(15437.04));
        assert_eq!(result.taxable_income, dec!(61748.18));
    }

    #[test]
    fn high_income_investor_pays_niit() {
        let rules = rules_2025();
        let profile = single(IncomeComponents {
            ordinary_income: dec!(200000),
            long_term_gains: dec!(50000),
            ..Default::default()
        });

        let result = TaxLiabilityEvaluator::new(&rules).evaluate(&profile);

        assert_eq!(result.net_investment_income_tax, dec!(1900.00));
        assert_eq!(result.additional_medicare_tax, dec!(0));
    }

    #[test]
    fn additional_medicare_applies_to_wages_not_retirement_income() {
        let rules = rules_2025();
        let retiree = single(IncomeComponents {
            ordinary_income: dec!(250000),
            ..Default::default()
        });
        let employee = single(IncomeComponents {
            wages: dec!(250000),
            ..Default::default()
        });

        let evaluator = TaxLiabilityEvaluator::new(&rules);
        let retiree = evaluator.evaluate(&retiree);
        let employee = evaluator.evaluate(&employee);

        assert_eq!(retiree.additional_medicare_tax, dec!(0));
        // 0.9% of 50,000 over the 200,000 threshold.
        assert_eq!(employee.additional_medicare_tax, dec!(450.00));
        assert_eq!(retiree.ordinary_tax, employee.ordinary_tax);
    }

    #[test]
    fn only_wages_use_up_the_social_security_wage_base() {
        let rules = rules_2025();
        let with_pension = single(IncomeComponents {
            ordinary_income: dec!(180000),
            self_employment_income: dec!(50000),
            ..Default::default()
        });
        let with_wages = single(IncomeComponents {
            wages: dec!(180000),
            self_employment_income: dec!(50000),
            ..Default::default()
        });

        let evaluator = TaxLiabilityEvaluator::new(&rules);
        let with_pension = evaluator.evaluate(&with_pension).self_employment_tax;
        let with_wages = evaluator.evaluate(&with_wages).self_employment_tax;

        assert_eq!(with_pension.ss_taxable_earnings, dec!(46175.00));
        assert_eq!(with_wages.ss_taxable_earnings, dec!(0));
        assert!(with_pension.total > with_wages.total);
    }

    #[test]
    fn child_credit_is_limited_to_income_tax() {
        let rules = rules_2025();
        let profile = TaxProfile {
            qualifying_children: 3,
            income: IncomeComponents {
                ordinary_income: dec!(30000),
                ..Default::default()
            },
            ..TaxProfile::new(2025, FilingStatus::HeadOfHousehold)
        };

        let result = TaxLiabilityEvaluator::new(&rules).evaluate(&profile);

        // Taxable 6,375 at 10% = 637.50, well under 3 × 2,200.
        assert_eq!(result.income_tax(), dec!(637.50));
        assert_eq!(result.child_tax_credit, dec!(637.50));
        assert_eq!(result.total_tax, dec!(0.00));
    }

    // =========================================================================
    // Estimated payment plan
    // =========================================================================

    #[test]
    fn no_plan_without_prior_year() {
        let rules = rules_2025();
        let result = TaxLiabilityEvaluator::new(&rules).evaluate(&single(Default::default()));

        assert_eq!(result.estimated_payments, None);
    }

    #[test]
    fn plan_uses_smaller_safe_harbor() {
        let rules = rules_2025();
        let profile = TaxProfile {
            prior_year: Some(PriorYearTax {
                total_tax: dec!(5000),
                adjusted_gross_income: dec!(70000),
            }),
            ..single(IncomeComponents {
                wages: dec!(75000),
                ..Default::default()
            })
        };

        let plan = TaxLiabilityEvaluator::new(&rules)
            .evaluate(&profile)
            .estimated_payments
            .expect("prior year given");

        // 90% of 7,949.00 = 7,154.10 vs 5,000.
        assert_eq!(
            plan,
            EstimatedPaymentPlan {
                required_annual_payment: dec!(5000.00),
                shortfall: dec!(5000.00),
                quarterly_installment: dec!(1250.00),
                payments_required: true,
            }
        );
    }

    #[test]
    fn plan_applies_110_percent_for_high_prior_agi() {
        let rules = rules_2025();
        let profile = TaxProfile {
            prior_year: Some(PriorYearTax {
                total_tax: dec!(5000),
                adjusted_gross_income: dec!(160000),
            }),
            ..single(IncomeComponents {
                wages: dec!(75000),
                ..Default::default()
            })
        };

        let plan = TaxLiabilityEvaluator::new(&rules)
            .evaluate(&profile)
            .estimated_payments
            .expect("prior year given");

        assert_eq!(plan.required_annual_payment, dec!(5500.00));
    }

    #[test]
    fn plan_not_required_when_withholding_covers_it() {
        let rules = rules_2025();
        let profile = TaxProfile {
            payments: Payments {
                withholding: dec!(7500),
                estimated_payments: dec!(0),
            },
            prior_year: Some(PriorYearTax {
                total_tax: dec!(7000),
                adjusted_gross_income: dec!(70000),
            }),
            ..single(IncomeComponents {
                wages: dec!(75000),
                ..Default::default()
            })
        };

        let plan = TaxLiabilityEvaluator::new(&rules)
            .evaluate(&profile)
            .estimated_payments
            .expect("prior year given");

        assert_eq!(plan.shortfall, dec!(0));
        assert!(!plan.payments_required);
    }
}
