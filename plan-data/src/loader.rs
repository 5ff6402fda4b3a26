use std::collections::BTreeMap;
use std::io::Read;

use plan_core::calculations::tax::ProgressiveBracketEngine;
use plan_core::{
    BracketSchedule, BracketScheduleError, FilingStatus, RuleBook, RuleBookError, ScheduleKind,
    TaxBracket,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading bracket schedules.
#[derive(Debug, Error)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("invalid schedule '{0}' (expected X, Y-1 or Z)")]
    InvalidSchedule(String),

    #[error("invalid schedule kind '{0}' (expected ordinary or preferential)")]
    InvalidKind(String),

    #[error("{tax_year} schedule {schedule} ({kind}): {source}")]
    Schedule {
        tax_year: i32,
        schedule: String,
        kind: String,
        #[source]
        source: BracketScheduleError,
    },

    #[error(
        "{tax_year} schedule {schedule} ({kind}): base tax at {min_income} is {found}, \
         brackets below it add up to {expected}"
    )]
    BaseTaxMismatch {
        tax_year: i32,
        schedule: String,
        kind: String,
        min_income: Decimal,
        expected: Decimal,
        found: Decimal,
    },

    #[error(transparent)]
    Rules(#[from] RuleBookError),
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// One row of a bracket CSV.
///
/// - `tax_year`: the tax year the schedule belongs to (e.g. 2025)
/// - `schedule`: the IRS rate-schedule code (X, Y-1, Z)
/// - `kind`: `ordinary` or `preferential`
/// - `min_income` / `max_income`: bracket bounds, `max_income` empty for the top bracket
/// - `base_tax`: optional; when present it must equal the tax on `min_income`
/// - `rate`: marginal rate as a decimal (e.g. 0.10 for 10%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub tax_year: i32,
    pub schedule: String,
    pub kind: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub base_tax: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Reads bracket CSV data and swaps the matching schedules in a [`RuleBook`].
///
/// Every `(tax_year, schedule, kind)` group in the input replaces one
/// schedule. Nothing is written to the book unless every group validates.
pub struct BracketLoader;

impl BracketLoader {
    /// Parse bracket records from any reader, in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Replace the schedules named in `records` and return how many were
    /// replaced.
    ///
    /// Brackets within a group may appear in any order; they are sorted by
    /// lower bound before validation. Unknown tax years are rejected rather
    /// than created, since a year needs its full rule table.
    pub fn load(
        book: &mut RuleBook,
        records: &[BracketRecord],
    ) -> Result<usize, BracketLoaderError> {
        let mut groups: BTreeMap<(i32, &str, &str), Vec<&BracketRecord>> = BTreeMap::new();
        for record in records {
            groups
                .entry((record.tax_year, &record.schedule, &record.kind))
                .or_default()
                .push(record);
        }

        let mut staged = Vec::with_capacity(groups.len());
        for ((tax_year, schedule, kind), mut group) in groups {
            let status = FilingStatus::from_schedule(schedule)
                .ok_or_else(|| BracketLoaderError::InvalidSchedule(schedule.to_string()))?;
            let schedule_kind = ScheduleKind::parse(kind)
                .ok_or_else(|| BracketLoaderError::InvalidKind(kind.to_string()))?;
            book.tax_rules(tax_year)?;

            group.sort_by(|a, b| a.min_income.cmp(&b.min_income));
            let brackets = group
                .iter()
                .map(|r| TaxBracket {
                    min_income: r.min_income,
                    max_income: r.max_income,
                    tax_rate: r.rate,
                })
                .collect();
            let bracket_schedule =
                BracketSchedule::new(brackets).map_err(|source| BracketLoaderError::Schedule {
                    tax_year,
                    schedule: schedule.to_string(),
                    kind: kind.to_string(),
                    source,
                })?;

            check_base_tax(&bracket_schedule, &group).map_err(|(min_income, expected, found)| {
                BracketLoaderError::BaseTaxMismatch {
                    tax_year,
                    schedule: schedule.to_string(),
                    kind: kind.to_string(),
                    min_income,
                    expected,
                    found,
                }
            })?;

            debug!(tax_year, schedule, kind, brackets = group.len(), "staged schedule");
            staged.push((tax_year, status, schedule_kind, bracket_schedule));
        }

        let replaced = staged.len();
        for (tax_year, status, kind, schedule) in staged {
            book.replace_schedule(tax_year, status, kind, schedule)?;
        }
        info!(schedules = replaced, records = records.len(), "loaded bracket schedules");
        Ok(replaced)
    }
}

/// Compares each stated base tax against the tax the schedule computes at
/// that bracket's lower bound. Returns `(min_income, expected, found)` for
/// the first disagreement.
fn check_base_tax(
    schedule: &BracketSchedule,
    sorted: &[&BracketRecord],
) -> Result<(), (Decimal, Decimal, Decimal)> {
    let engine = ProgressiveBracketEngine::new(schedule);
    for record in sorted {
        let Some(found) = record.base_tax else {
            continue;
        };
        let expected = engine.tax_on_amount(record.min_income).tax;
        if expected != found {
            return Err((record.min_income, expected, found));
        }
    }
    Ok(())
}
