//! Year-by-year household projection.
//!
//! Each person is in one of three states in a given year (see
//! [`Claimant::status_in`]); the household state is derived from the pair by
//! [`household_state`]. Rows run from the earliest claim year up to the year
//! before the last death year.
//!
//! In a survivor-only year the survivor's Social Security is the larger of
//! their own effective benefit and the survivor benefit on the deceased's
//! effective benefit, reduced when the survivor is younger than their own
//! FRA. It applies once the survivor has reached their own claim year. The
//! deceased person's pension continues at its survivor percentage, provided
//! it had started before death.

use rust_decimal::Decimal;
use tracing::debug;

use super::Claimant;
use super::curve::BenefitCurveCalculator;
use super::strategies::ClaimingStrategyEnumerator;
use crate::models::{Age, HouseholdState, PersonStatus, PersonYear, YearlyScheduleRow};

/// Household state for a couple's two person states, or a single person's
/// state when `spouse` is `None`. `None` once everyone is deceased.
pub fn household_state(
    primary: PersonStatus,
    spouse: Option<PersonStatus>,
) -> Option<HouseholdState> {
    use PersonStatus::{Deceased, PreClaim, Receiving};

    let state = match (primary, spouse) {
        (Deceased, None) | (Deceased, Some(Deceased)) => return None,
        (PreClaim, None) => HouseholdState::PreClaim,
        (Receiving, None) => HouseholdState::Receiving,
        (Deceased, Some(_)) | (_, Some(Deceased)) => HouseholdState::SurvivorOnly,
        (PreClaim, Some(PreClaim)) => HouseholdState::PreClaim,
        (Receiving, Some(Receiving)) => HouseholdState::BothReceiving,
        (PreClaim, Some(Receiving)) | (Receiving, Some(PreClaim)) => {
            HouseholdState::OnePreClaimOneReceiving
        }
    };
    Some(state)
}

/// A person's fixed monthly amounts for the projection.
#[derive(Debug, Clone, Copy)]
struct Entitlement<'c> {
    claimant: &'c Claimant,
    /// Greater of own or spousal benefit at the chosen claiming age.
    effective_monthly: Decimal,
}

impl Entitlement<'_> {
    fn year(
        &self,
        year: i32,
        other: Option<&Entitlement<'_>>,
        curve: &BenefitCurveCalculator<'_>,
    ) -> PersonYear {
        let claimant = self.claimant;
        let status = claimant.status_in(year);
        let other_deceased = other
            .map(|o| o.claimant.status_in(year) == PersonStatus::Deceased)
            .unwrap_or(false);

        let (social_security, pension) = match status {
            PersonStatus::PreClaim => (Decimal::ZERO, Decimal::ZERO),
            PersonStatus::Receiving => {
                let social_security = match other {
                    Some(o) if other_deceased => {
                        let survivor = curve.survivor_benefit(
                            o.effective_monthly,
                            claimant.full_retirement_age,
                            Age::years(claimant.age_in(year).unwrap_or_default()),
                        );
                        self.effective_monthly.max(survivor)
                    }
                    _ => self.effective_monthly,
                };
                (social_security, claimant.pension_monthly)
            }
            PersonStatus::Deceased => {
                let continuation = if claimant.ever_claims() {
                    claimant.pension_monthly * claimant.pension_survivor_percentage
                } else {
                    Decimal::ZERO
                };
                (Decimal::ZERO, continuation)
            }
        };

        PersonYear {
            age: claimant.age_in(year),
            social_security,
            pension,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScheduleProjector<'a> {
    enumerator: ClaimingStrategyEnumerator<'a>,
}

impl<'a> ScheduleProjector<'a> {
    pub fn new(enumerator: ClaimingStrategyEnumerator<'a>) -> Self {
        Self { enumerator }
    }

    /// Projection for a single person or a couple at their chosen claiming
    /// ages.
    pub fn project(
        &self,
        primary: &Claimant,
        spouse: Option<&Claimant>,
    ) -> Vec<YearlyScheduleRow> {
        let primary_entitlement = Entitlement {
            claimant: primary,
            effective_monthly: match spouse {
                Some(s) => self
                    .enumerator
                    .effective_monthly(primary, s, primary.claiming_age),
                None => self.enumerator.own_monthly(primary),
            },
        };
        let spouse_entitlement = spouse.map(|s| Entitlement {
            claimant: s,
            effective_monthly: self.enumerator.effective_monthly(s, primary, s.claiming_age),
        });

        let start = spouse.map_or(primary.claim_year, |s| primary.claim_year.min(s.claim_year));
        let end = spouse.map_or(primary.death_year, |s| primary.death_year.max(s.death_year));

        let curve = self.enumerator.curve();
        let rows: Vec<YearlyScheduleRow> = (start..end)
            .map_while(|year| {
                let state = household_state(
                    primary.status_in(year),
                    spouse.map(|s| s.status_in(year)),
                )?;
                let primary_year =
                    primary_entitlement.year(year, spouse_entitlement.as_ref(), &curve);
                let spouse_year = spouse_entitlement
                    .as_ref()
                    .map(|s| s.year(year, Some(&primary_entitlement), &curve));
                let monthly = primary_year.monthly_total()
                    + spouse_year
                        .as_ref()
                        .map_or(Decimal::ZERO, PersonYear::monthly_total);

                Some(YearlyScheduleRow {
                    year,
                    primary: primary_year,
                    spouse: spouse_year,
                    state,
                    annual_total: monthly * Decimal::from(12),
                })
            })
            .collect();

        debug!(start, end, rows = rows.len(), "projected schedule");
        rows
    }
}
