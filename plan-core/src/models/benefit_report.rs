use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Age;

/// Outcome of claiming at one whole-year age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimingScenario {
    pub claiming_age: Age,
    pub monthly_benefit: Decimal,
    pub annual_benefit: Decimal,
    /// Age at which this claim overtakes claiming at the earliest age.
    pub break_even_vs_earliest: Option<Age>,
    /// Total received from the claiming age to the assumed death.
    pub cumulative_at_life_expectancy: Decimal,
}

/// Break-even between two claiming ages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakEvenEntry {
    pub earlier_age: Age,
    pub later_age: Age,
    pub break_even_age: Option<Age>,
}

/// The fixed menu of couple strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    BothEarliest,
    BothAtFullRetirementAge,
    BothLatest,
    HigherLatestLowerEarliest,
    HigherLatestLowerFullRetirementAge,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        Self::BothEarliest,
        Self::BothAtFullRetirementAge,
        Self::BothLatest,
        Self::HigherLatestLowerEarliest,
        Self::HigherLatestLowerFullRetirementAge,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::BothEarliest => "Both claim at 62",
            Self::BothAtFullRetirementAge => "Both claim at FRA",
            Self::BothLatest => "Both claim at 70",
            Self::HigherLatestLowerEarliest => "Higher earner at 70, lower at 62",
            Self::HigherLatestLowerFullRetirementAge => "Higher earner at 70, lower at FRA",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One named couple strategy, scored by lifetime household value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoupleStrategy {
    pub kind: StrategyKind,
    pub primary_claiming_age: Age,
    pub spouse_claiming_age: Age,
    /// Greater of own or spousal benefit.
    pub primary_monthly: Decimal,
    pub spouse_monthly: Decimal,
    pub combined_monthly: Decimal,
    pub survivor_monthly: Decimal,
    pub lifetime_value: Decimal,
    pub optimal: bool,
}

/// Best pair found by scoring every whole-year claiming-age combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimingPair {
    pub primary_claiming_age: Age,
    pub spouse_claiming_age: Age,
    pub combined_monthly: Decimal,
    pub survivor_monthly: Decimal,
    pub lifetime_value: Decimal,
}

/// Where one person stands in a given calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonStatus {
    PreClaim,
    Receiving,
    Deceased,
}

/// Household state for one schedule year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseholdState {
    PreClaim,
    BothReceiving,
    OnePreClaimOneReceiving,
    SurvivorOnly,
    /// One-person household collecting benefits.
    Receiving,
}

impl HouseholdState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PreClaim => "Pre-claim",
            Self::BothReceiving => "Both receiving",
            Self::OnePreClaimOneReceiving => "One receiving",
            Self::SurvivorOnly => "Survivor only",
            Self::Receiving => "Receiving",
        }
    }
}

impl fmt::Display for HouseholdState {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One person's monthly amounts in a schedule year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonYear {
    /// `None` once the person is deceased.
    pub age: Option<u32>,
    pub social_security: Decimal,
    /// Own pension while alive; the survivor continuation of it afterwards.
    pub pension: Decimal,
}

impl PersonYear {
    pub fn monthly_total(&self) -> Decimal {
        self.social_security + self.pension
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyScheduleRow {
    pub year: i32,
    pub primary: PersonYear,
    pub spouse: Option<PersonYear>,
    pub state: HouseholdState,
    pub annual_total: Decimal,
}

/// Spousal benefit with and without the legacy pension offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PensionOffsetComparison {
    /// The pension holder is the primary person (otherwise the spouse).
    pub pensioner_is_primary: bool,
    pub pension_monthly: Decimal,
    pub spousal_without_offset: Decimal,
    pub offset_amount: Decimal,
    pub spousal_with_offset: Decimal,
    pub monthly_savings: Decimal,
    pub annual_savings: Decimal,
}

/// Resolved figures for one person at their chosen claiming age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSummary {
    pub primary_insurance_amount: Decimal,
    pub full_retirement_age: Age,
    pub claiming_age: Age,
    /// Own benefit at the claiming age.
    pub own_monthly: Decimal,
    /// Greater of own or spousal benefit (own benefit for a single person).
    pub effective_monthly: Decimal,
}

/// Everything produced by one benefit optimization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitReport {
    pub law_year: i32,
    pub primary: PersonSummary,
    pub spouse: Option<PersonSummary>,
    pub scenarios: Vec<ClaimingScenario>,
    pub spouse_scenarios: Option<Vec<ClaimingScenario>>,
    /// Claiming age with the highest cumulative benefit at life expectancy.
    pub optimal_age: Age,
    pub break_even_table: Vec<BreakEvenEntry>,
    pub strategies: Option<Vec<CoupleStrategy>>,
    pub optimal_strategy: Option<StrategyKind>,
    pub best_pair: Option<ClaimingPair>,
    pub schedule: Vec<YearlyScheduleRow>,
    pub pension_offsets: Vec<PensionOffsetComparison>,
}
