use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use plan_core::{RuleBook, evaluate_tax, optimize_benefit};
use plan_data::BracketLoader;
use tracing::{debug, info};

use crate::profile::ProfileFile;
use crate::report;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Household retirement planner.
///
/// Evaluates federal income tax for a year and analyses Social Security
/// claiming ages for one person or a couple, from a TOML profile.
#[derive(Debug, Parser)]
#[command(name = "household-planner", version)]
pub struct Cli {
    /// More log output (repeat for more). `RUST_LOG` overrides this.
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Also append log output to this file.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate the `[tax]` table of a profile.
    Tax {
        /// TOML profile with a `[tax]` table.
        #[arg(long, value_name = "PATH")]
        profile: PathBuf,

        /// CSV of bracket schedules replacing the built-in ones.
        #[arg(long, value_name = "PATH")]
        brackets: Option<PathBuf>,
    },

    /// Analyse the `[benefits]` table of a profile.
    Benefits {
        /// TOML profile with a `[benefits]` table.
        #[arg(long, value_name = "PATH")]
        profile: PathBuf,

        /// Benefit-law year; overrides the profile's `law_year`.
        #[arg(long)]
        law_year: Option<i32>,
    },

    /// List the years with built-in rule tables.
    Years,
}

// ─── commands ────────────────────────────────────────────────────────────────

/// Runs one command and returns the rendered report.
pub fn run(command: &Command) -> Result<String> {
    let mut book = RuleBook::builtin();
    let mut out = String::new();

    match command {
        Command::Tax { profile, brackets } => {
            if let Some(path) = brackets {
                let file = File::open(path)
                    .with_context(|| format!("cannot open brackets '{}'", path.display()))?;
                let records = BracketLoader::parse(file)
                    .with_context(|| format!("cannot parse brackets '{}'", path.display()))?;
                let replaced = BracketLoader::load(&mut book, &records)?;
                info!(path = %path.display(), schedules = replaced, "replaced bracket schedules");
            }

            let profile = ProfileFile::load(profile)?;
            let result = evaluate_tax(&book, profile.tax()?)?;
            report::render_tax(&mut out, &result)?;
        }
        Command::Benefits { profile, law_year } => {
            let profile = ProfileFile::load(profile)?;
            let section = profile.benefits()?;
            let year = law_year
                .or(section.law_year)
                .or_else(|| book.latest_benefit_year())
                .context("no benefit-law years are available")?;
            debug!(law_year = year, "selected benefit rules");

            let rules = book.benefit_rules(year)?;
            let result = optimize_benefit(rules, &section.primary, section.spouse.as_ref())?;
            report::render_benefits(&mut out, &result)?;
        }
        Command::Years => report::render_years(&mut out, &book)?,
    }

    Ok(out)
}
