//! Loads replacement bracket schedules into a [`plan_core::RuleBook`].

mod loader;

pub use loader::{BracketLoader, BracketLoaderError, BracketRecord};
