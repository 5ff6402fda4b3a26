use rust_decimal::Decimal;

use super::Claimant;
use super::break_even::BreakEvenSolver;
use super::curve::BenefitCurveCalculator;
use crate::calculations::common::round_half_up;
use crate::models::{Age, BreakEvenEntry, ClaimingScenario};

/// Single-person claiming analysis over the whole-year claiming ages.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioAnalyzer<'a> {
    curve: BenefitCurveCalculator<'a>,
    solver: BreakEvenSolver<'a>,
}

impl<'a> ScenarioAnalyzer<'a> {
    pub fn new(curve: BenefitCurveCalculator<'a>) -> Self {
        Self {
            curve,
            solver: BreakEvenSolver::new(curve),
        }
    }

    /// One scenario per whole-year claiming age, youngest first.
    pub fn scenarios(
        &self,
        claimant: &Claimant,
    ) -> Vec<ClaimingScenario> {
        let rules = self.curve.rules();
        let earliest = rules.earliest_claiming_age;
        let earliest_monthly = self.monthly_at(claimant, earliest);
        let death_age = claimant.life_expectancy_age();

        rules
            .whole_year_claiming_ages()
            .map(|claiming_age| {
                let monthly_benefit = self.monthly_at(claimant, claiming_age);
                let break_even_vs_earliest = (claiming_age > earliest)
                    .then(|| {
                        self.solver.crossing(
                            earliest_monthly,
                            earliest,
                            monthly_benefit,
                            claiming_age,
                        )
                    })
                    .flatten();

                ClaimingScenario {
                    claiming_age,
                    monthly_benefit,
                    annual_benefit: monthly_benefit * Decimal::from(12),
                    break_even_vs_earliest,
                    cumulative_at_life_expectancy: round_half_up(BreakEvenSolver::cumulative(
                        monthly_benefit,
                        claiming_age,
                        death_age,
                    )),
                }
            })
            .collect()
    }

    /// Claiming age with the largest cumulative total; ties go to the
    /// younger age.
    pub fn optimal_age(scenarios: &[ClaimingScenario]) -> Option<Age> {
        scenarios
            .iter()
            .max_by(|a, b| {
                a.cumulative_at_life_expectancy
                    .cmp(&b.cumulative_at_life_expectancy)
                    .then_with(|| b.claiming_age.cmp(&a.claiming_age))
            })
            .map(|s| s.claiming_age)
    }

    /// Earliest vs FRA (rounded up to a whole year), earliest vs latest,
    /// and FRA vs latest.
    pub fn break_even_table(
        &self,
        claimant: &Claimant,
    ) -> Vec<BreakEvenEntry> {
        let rules = self.curve.rules();
        let earliest = rules.earliest_claiming_age;
        let latest = rules.latest_claiming_age;
        let fra = Age::years(claimant.full_retirement_age.ceil_years()).min(latest);

        [(earliest, fra), (earliest, latest), (fra, latest)]
            .into_iter()
            .map(|(earlier_age, later_age)| BreakEvenEntry {
                earlier_age,
                later_age,
                break_even_age: self.solver.solve(
                    claimant.primary_insurance_amount,
                    claimant.full_retirement_age,
                    earlier_age,
                    later_age,
                ),
            })
            .collect()
    }

    fn monthly_at(
        &self,
        claimant: &Claimant,
        claiming_age: Age,
    ) -> Decimal {
        self.curve.monthly_benefit(
            claimant.primary_insurance_amount,
            claimant.full_retirement_age,
            claiming_age,
        )
    }
}
