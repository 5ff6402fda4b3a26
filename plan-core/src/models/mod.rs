mod age;
mod benefit_profile;
mod benefit_report;
mod filing_status;
mod profile_error;
mod tax_bracket;
mod tax_profile;
mod tax_result;

pub use age::Age;
pub use benefit_profile::{BenefitInput, BenefitProfile, NonCoveredPension};
pub use benefit_report::{
    BenefitReport, BreakEvenEntry, ClaimingPair, ClaimingScenario, CoupleStrategy,
    HouseholdState, PensionOffsetComparison, PersonStatus, PersonSummary, PersonYear,
    StrategyKind, YearlyScheduleRow,
};
pub use filing_status::FilingStatus;
pub use profile_error::ProfileError;
pub use tax_bracket::{BracketSchedule, BracketScheduleError, TaxBracket};
pub use tax_profile::{DeductionElection, IncomeComponents, Payments, PriorYearTax, TaxProfile};
pub use tax_result::{
    BracketSlice, BracketTax, DeductionKind, EstimatedPaymentPlan, SelfEmploymentTax, TaxResult,
};
