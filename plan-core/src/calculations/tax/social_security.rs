use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::calculations::common::{half, non_negative, round_half_up};
use crate::models::IncomeComponents;
use crate::rules::FilingStatusRules;

/// Provisional income: every income component except benefits, with net
/// self-employment income (after the deductible half of SE tax) counted at
/// one half, plus half of the gross benefit.
pub fn provisional_income(
    income: &IncomeComponents,
    se_tax_deduction: Decimal,
) -> Decimal {
    let net_self_employment = non_negative(income.self_employment_income - se_tax_deduction);
    round_half_up(
        income.ordinary_total()
            + income.short_term_gains
            + income.preferential_income()
            + half(net_self_employment)
            + half(income.social_security_benefits),
    )
}

/// Taxable share of `benefits` under the three-tier inclusion rule.
///
/// ```
/// use rust_decimal_macros::dec;
/// use plan_core::RuleBook;
/// use plan_core::calculations::tax::taxable_social_security;
///
/// let book = RuleBook::builtin();
/// let single = &book.tax_rules(2025).unwrap().single;
///
/// assert_eq!(taxable_social_security(dec!(24000), dec!(20000), single), dec!(0.00));
/// assert_eq!(taxable_social_security(dec!(30000), dec!(20000), single), dec!(2500.00));
/// ```
pub fn taxable_social_security(
    provisional_income: Decimal,
    benefits: Decimal,
    rules: &FilingStatusRules,
) -> Decimal {
    if benefits <= Decimal::ZERO || provisional_income <= rules.ss_base_threshold {
        return Decimal::ZERO;
    }

    let first_tier = half(benefits).min(half(provisional_income - rules.ss_base_threshold));
    if provisional_income <= rules.ss_adjusted_threshold {
        return round_half_up(first_tier);
    }

    let first_tier_cap =
        half(benefits).min(half(rules.ss_adjusted_threshold - rules.ss_base_threshold));
    let second_tier = dec!(0.85) * (provisional_income - rules.ss_adjusted_threshold);
    round_half_up((dec!(0.85) * benefits).min(second_tier + first_tier_cap))
}
