//! Plain-text rendering of engine results.

use std::fmt::{self, Write};

use plan_core::{
    BenefitReport, BracketTax, ClaimingScenario, DeductionKind, PersonSummary, RuleBook,
    TaxResult,
};

use crate::utils::{format_currency, format_percent, opt_age_display};

const RULE: &str = "────────────────────────────────────────────────────────────";

fn line(
    out: &mut impl Write,
    label: &str,
    value: impl fmt::Display,
) -> fmt::Result {
    writeln!(out, "  {label:<34}{value:>20}")
}

fn heading(
    out: &mut impl Write,
    title: &str,
) -> fmt::Result {
    writeln!(out, "{title}")?;
    writeln!(out, "{RULE}")
}

// ─── tax ─────────────────────────────────────────────────────────────────────

pub fn render_tax(
    out: &mut impl Write,
    result: &TaxResult,
) -> fmt::Result {
    heading(
        out,
        &format!("{} federal tax ({})", result.tax_year, result.filing_status.label()),
    )?;
    line(out, "Provisional income", format_currency(result.provisional_income))?;
    line(out, "Taxable Social Security", format_currency(result.taxable_social_security))?;
    line(out, "Adjusted gross income", format_currency(result.adjusted_gross_income))?;
    let deduction_label = match result.deduction_kind {
        DeductionKind::Standard => "Standard deduction",
        DeductionKind::Itemized => "Itemized deduction",
    };
    line(out, deduction_label, format_currency(result.deduction))?;
    if !result.senior_deduction.is_zero() {
        line(out, "Senior deduction", format_currency(result.senior_deduction))?;
    }
    if !result.qbi_deduction.is_zero() {
        line(out, "QBI deduction", format_currency(result.qbi_deduction))?;
    }
    line(out, "Taxable income", format_currency(result.taxable_income))?;
    writeln!(out)?;

    render_breakdown(out, "Ordinary brackets", &result.ordinary_tax)?;
    render_breakdown(out, "Preferential brackets", &result.preferential_tax)?;

    line(out, "Income tax", format_currency(result.income_tax()))?;
    if !result.self_employment_tax.total.is_zero() {
        line(out, "Self-employment tax", format_currency(result.self_employment_tax.total))?;
    }
    if !result.net_investment_income_tax.is_zero() {
        line(out, "Net investment income tax", format_currency(result.net_investment_income_tax))?;
    }
    if !result.additional_medicare_tax.is_zero() {
        line(out, "Additional Medicare tax", format_currency(result.additional_medicare_tax))?;
    }
    if !result.child_tax_credit.is_zero() {
        line(out, "Child tax credit", format_currency(-result.child_tax_credit))?;
    }
    line(out, "Total tax", format_currency(result.total_tax))?;
    line(out, "Payments", format_currency(result.total_payments))?;
    if result.is_refund() {
        line(out, "Refund", format_currency(-result.balance_due))?;
    } else {
        line(out, "Balance due", format_currency(result.balance_due))?;
    }
    line(out, "Effective rate", format_percent(result.effective_rate))?;
    line(out, "Marginal rate", format_percent(result.marginal_rate))?;

    if let Some(plan) = &result.estimated_payments {
        writeln!(out)?;
        writeln!(out, "Estimated payments")?;
        line(out, "Required annual payment", format_currency(plan.required_annual_payment))?;
        line(out, "Shortfall after withholding", format_currency(plan.shortfall))?;
        line(out, "Quarterly installment", format_currency(plan.quarterly_installment))?;
        line(out, "Payments required", if plan.payments_required { "yes" } else { "no" })?;
    }
    Ok(())
}

fn render_breakdown(
    out: &mut impl Write,
    title: &str,
    tax: &BracketTax,
) -> fmt::Result {
    if tax.breakdown.is_empty() {
        return Ok(());
    }
    writeln!(out, "{title}")?;
    for slice in &tax.breakdown {
        writeln!(
            out,
            "    {:>7} on {:>16} = {:>14}",
            format_percent(slice.tax_rate),
            format_currency(slice.taxable_amount),
            format_currency(slice.tax)
        )?;
    }
    writeln!(out)
}

// ─── benefits ────────────────────────────────────────────────────────────────

pub fn render_benefits(
    out: &mut impl Write,
    report: &BenefitReport,
) -> fmt::Result {
    heading(out, &format!("Social Security claiming ({} rules)", report.law_year))?;
    render_person(out, "Primary", &report.primary)?;
    if let Some(spouse) = &report.spouse {
        render_person(out, "Spouse", spouse)?;
    }
    writeln!(out)?;

    render_scenarios(out, "Primary claiming ages", &report.scenarios)?;
    line(out, "Best single claiming age", report.optimal_age)?;
    writeln!(out)?;
    if let Some(scenarios) = &report.spouse_scenarios {
        render_scenarios(out, "Spouse claiming ages", scenarios)?;
    }

    writeln!(out, "Break-even")?;
    for entry in &report.break_even_table {
        writeln!(
            out,
            "    {:>6} vs {:<6} {:>10}",
            entry.earlier_age.to_string(),
            entry.later_age.to_string(),
            opt_age_display(entry.break_even_age)
        )?;
    }
    writeln!(out)?;

    if let Some(strategies) = &report.strategies {
        writeln!(out, "Couple strategies")?;
        for strategy in strategies {
            writeln!(
                out,
                "  {} {:<36}{:>12}/mo {:>16}",
                if strategy.optimal { "*" } else { " " },
                strategy.kind.label(),
                format_currency(strategy.combined_monthly),
                format_currency(strategy.lifetime_value)
            )?;
        }
        if let Some(pair) = &report.best_pair {
            writeln!(
                out,
                "  Best of all pairs: primary {}, spouse {} ({})",
                pair.primary_claiming_age,
                pair.spouse_claiming_age,
                format_currency(pair.lifetime_value)
            )?;
        }
        writeln!(out)?;
    }

    for offset in &report.pension_offsets {
        let who = if offset.pensioner_is_primary { "primary" } else { "spouse" };
        writeln!(out, "Pension offset ({who})")?;
        line(out, "Spousal benefit", format_currency(offset.spousal_without_offset))?;
        line(out, "With two-thirds offset", format_currency(offset.spousal_with_offset))?;
        line(out, "Annual difference", format_currency(offset.annual_savings))?;
        writeln!(out)?;
    }

    render_schedule(out, report)
}

fn render_person(
    out: &mut impl Write,
    who: &str,
    person: &PersonSummary,
) -> fmt::Result {
    writeln!(
        out,
        "  {who}: PIA {}, FRA {}, claiming at {} → {}/mo",
        format_currency(person.primary_insurance_amount),
        person.full_retirement_age,
        person.claiming_age,
        format_currency(person.effective_monthly)
    )
}

fn render_scenarios(
    out: &mut impl Write,
    title: &str,
    scenarios: &[ClaimingScenario],
) -> fmt::Result {
    writeln!(out, "{title}")?;
    writeln!(
        out,
        "    {:>4} {:>14} {:>12} {:>16}",
        "age", "monthly", "break-even", "to life exp."
    )?;
    for s in scenarios {
        writeln!(
            out,
            "    {:>4} {:>14} {:>12} {:>16}",
            s.claiming_age.to_string(),
            format_currency(s.monthly_benefit),
            opt_age_display(s.break_even_vs_earliest),
            format_currency(s.cumulative_at_life_expectancy)
        )?;
    }
    Ok(())
}

fn render_schedule(
    out: &mut impl Write,
    report: &BenefitReport,
) -> fmt::Result {
    if report.schedule.is_empty() {
        return writeln!(out, "No benefit years before the assumed death.");
    }
    writeln!(out, "Yearly schedule")?;
    for row in &report.schedule {
        let ages = match &row.spouse {
            Some(spouse) => format!(
                "{}/{}",
                row.primary.age.map_or("—".to_string(), |a| a.to_string()),
                spouse.age.map_or("—".to_string(), |a| a.to_string())
            ),
            None => row.primary.age.map_or("—".to_string(), |a| a.to_string()),
        };
        writeln!(
            out,
            "    {} {:>7} {:<16}{:>16}",
            row.year,
            ages,
            row.state.label(),
            format_currency(row.annual_total)
        )?;
    }
    Ok(())
}

// ─── years ───────────────────────────────────────────────────────────────────

pub fn render_years(
    out: &mut impl Write,
    book: &RuleBook,
) -> fmt::Result {
    let list = |years: Vec<i32>| {
        years
            .iter()
            .map(i32::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    writeln!(out, "Tax years:          {}", list(book.tax_years().collect()))?;
    writeln!(out, "Benefit-law years:  {}", list(book.benefit_years().collect()))
}
