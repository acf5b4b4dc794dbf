//! Tax calculation logic.
//!
//! [`income_tax`] holds the progressive income tax calculator; [`common`]
//! holds the decimal rounding helpers it relies on.

pub mod common;
pub mod income_tax;

pub use income_tax::{IncomeTaxCalculator, calculate};
