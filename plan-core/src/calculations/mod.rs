//! Calculation components for the tax path and the benefit path.
//!
//! Both paths read their constants from [`crate::rules`] and share the
//! rounding helpers in [`common`]. Calculators are cheap borrowed views over
//! one year's rules and hold no state between calls.

pub mod benefits;
pub mod common;
pub mod tax;
