//! Couple claiming strategies.
//!
//! Every strategy is scored the same way:
//!
//! ```text
//! lifetime = combined × 12 × years_both_alive + survivor × 12 × years_survivor_only
//! ```
//!
//! `years_both_alive` runs from the later claiming age to the earlier life
//! expectancy. `years_survivor_only` runs from there to the later life
//! expectancy. Ages are compared as ages, not calendar years.

use rust_decimal::Decimal;
use tracing::debug;

use super::Claimant;
use super::curve::BenefitCurveCalculator;
use crate::calculations::common::{non_negative, round_half_up};
use crate::models::{Age, ClaimingPair, CoupleStrategy, StrategyKind};

/// Monthly figures and score for one pair of claiming ages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PairScore {
    primary_monthly: Decimal,
    spouse_monthly: Decimal,
    combined_monthly: Decimal,
    survivor_monthly: Decimal,
    lifetime_value: Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct ClaimingStrategyEnumerator<'a> {
    curve: BenefitCurveCalculator<'a>,
}

impl<'a> ClaimingStrategyEnumerator<'a> {
    pub fn new(curve: BenefitCurveCalculator<'a>) -> Self {
        Self { curve }
    }

    pub fn curve(&self) -> BenefitCurveCalculator<'a> {
        self.curve
    }

    /// Own benefit at the person's chosen claiming age.
    pub fn own_monthly(
        &self,
        person: &Claimant,
    ) -> Decimal {
        self.curve.monthly_benefit(
            person.primary_insurance_amount,
            person.full_retirement_age,
            person.claiming_age,
        )
    }

    /// Greater of own benefit or spousal benefit on the partner's record.
    pub fn effective_monthly(
        &self,
        person: &Claimant,
        partner: &Claimant,
        claiming_age: Age,
    ) -> Decimal {
        let own = self.curve.monthly_benefit(
            person.primary_insurance_amount,
            person.full_retirement_age,
            claiming_age,
        );
        self.curve.spousal_benefit(
            own,
            partner.primary_insurance_amount,
            person.full_retirement_age,
            claiming_age,
        )
    }

    /// The five named strategies, with exactly one flagged optimal.
    ///
    /// The higher earner is the person with the larger PIA; on a tie it is
    /// the primary person.
    pub fn enumerate(
        &self,
        primary: &Claimant,
        spouse: &Claimant,
    ) -> Vec<CoupleStrategy> {
        let rules = self.curve.rules();
        let earliest = rules.earliest_claiming_age;
        let latest = rules.latest_claiming_age;
        let primary_is_higher = primary.primary_insurance_amount >= spouse.primary_insurance_amount;

        let (higher, lower) = if primary_is_higher {
            (primary, spouse)
        } else {
            (spouse, primary)
        };

        let mut strategies: Vec<CoupleStrategy> = StrategyKind::ALL
            .into_iter()
            .map(|kind| {
                let (higher_age, lower_age) = match kind {
                    StrategyKind::BothEarliest => (earliest, earliest),
                    StrategyKind::BothAtFullRetirementAge => {
                        (higher.full_retirement_age, lower.full_retirement_age)
                    }
                    StrategyKind::BothLatest => (latest, latest),
                    StrategyKind::HigherLatestLowerEarliest => (latest, earliest),
                    StrategyKind::HigherLatestLowerFullRetirementAge => {
                        (latest, lower.full_retirement_age)
                    }
                };
                let (primary_age, spouse_age) = if primary_is_higher {
                    (higher_age, lower_age)
                } else {
                    (lower_age, higher_age)
                };

                let score = self.score(primary, spouse, primary_age, spouse_age);
                CoupleStrategy {
                    kind,
                    primary_claiming_age: primary_age,
                    spouse_claiming_age: spouse_age,
                    primary_monthly: score.primary_monthly,
                    spouse_monthly: score.spouse_monthly,
                    combined_monthly: score.combined_monthly,
                    survivor_monthly: score.survivor_monthly,
                    lifetime_value: score.lifetime_value,
                    optimal: false,
                }
            })
            .collect();

        if let Some(best) = first_max_index(strategies.iter().map(|s| s.lifetime_value)) {
            strategies[best].optimal = true;
            debug!(
                strategy = %strategies[best].kind,
                lifetime_value = %strategies[best].lifetime_value,
                "optimal couple strategy"
            );
        }
        strategies
    }

    /// Best of every whole-year claiming-age pair, scored like the named
    /// strategies. Ties go to the pair enumerated first (primary age, then
    /// spouse age, ascending).
    pub fn exhaustive_search(
        &self,
        primary: &Claimant,
        spouse: &Claimant,
    ) -> Option<ClaimingPair> {
        let rules = self.curve.rules();
        let pairs: Vec<(Age, Age, PairScore)> = rules
            .whole_year_claiming_ages()
            .flat_map(|primary_age| {
                rules
                    .whole_year_claiming_ages()
                    .map(move |spouse_age| (primary_age, spouse_age))
            })
            .map(|(primary_age, spouse_age)| {
                (
                    primary_age,
                    spouse_age,
                    self.score(primary, spouse, primary_age, spouse_age),
                )
            })
            .collect();

        let best = first_max_index(pairs.iter().map(|(_, _, score)| score.lifetime_value))?;
        let (primary_claiming_age, spouse_claiming_age, score) = pairs[best];
        Some(ClaimingPair {
            primary_claiming_age,
            spouse_claiming_age,
            combined_monthly: score.combined_monthly,
            survivor_monthly: score.survivor_monthly,
            lifetime_value: score.lifetime_value,
        })
    }

    fn score(
        &self,
        primary: &Claimant,
        spouse: &Claimant,
        primary_age: Age,
        spouse_age: Age,
    ) -> PairScore {
        let primary_monthly = self.effective_monthly(primary, spouse, primary_age);
        let spouse_monthly = self.effective_monthly(spouse, primary, spouse_age);
        let combined_monthly = primary_monthly + spouse_monthly;
        let survivor_monthly = primary_monthly.max(spouse_monthly);

        let first_death = primary.life_expectancy.min(spouse.life_expectancy);
        let last_death = primary.life_expectancy.max(spouse.life_expectancy);
        let both_start = primary_age.max(spouse_age).as_years();
        let years_both_alive = non_negative(Decimal::from(first_death) - both_start);
        let survivor_start = both_start.max(Decimal::from(first_death));
        let years_survivor_only = non_negative(Decimal::from(last_death) - survivor_start);

        let twelve = Decimal::from(12);
        let lifetime_value = round_half_up(
            combined_monthly * twelve * years_both_alive
                + survivor_monthly * twelve * years_survivor_only,
        );

        PairScore {
            primary_monthly,
            spouse_monthly,
            combined_monthly,
            survivor_monthly,
            lifetime_value,
        }
    }
}

/// Index of the first maximum.
fn first_max_index(values: impl Iterator<Item = Decimal>) -> Option<usize> {
    values
        .enumerate()
        .fold(None::<(usize, Decimal)>, |best, (index, value)| match best {
            Some((_, best_value)) if best_value >= value => best,
            _ => Some((index, value)),
        })
        .map(|(index, _)| index)
}
