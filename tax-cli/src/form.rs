//! Form-style amount entry.
//!
//! Amounts arrive as free text. Thousands separators, spaces and a leading
//! `R` are ignored; empty or unparseable text counts as zero so that a
//! calculation can always run.

use rust_decimal::Decimal;
use tax_core::TaxCalculationInput;
use thiserror::Error;
use tracing::warn;

/// Error returned when text cannot be parsed as an amount.
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseAmountError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

fn normalize_amount_input(s: &str) -> String {
    let trimmed = s.trim();
    let without_symbol = trimmed
        .strip_prefix('R')
        .or_else(|| trimmed.strip_prefix('r'))
        .unwrap_or(trimmed);
    without_symbol
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect()
}

/// Parses text into an amount. Empty input is zero.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| ParseAmountError {
        input: s.to_string(),
        source: e,
    })
}

/// Parses text into an amount, falling back to zero (with a warning) when
/// the text is not a number.
pub fn coerce_amount(
    field: &'static str,
    s: &str,
) -> Decimal {
    parse_amount(s).unwrap_or_else(|error| {
        warn!(field, %error, "amount treated as 0");
        Decimal::ZERO
    })
}

/// The four text fields a user fills in before calculating.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxForm {
    pub annual_income: String,
    pub retirement_contributions: String,
    pub medical_aid_contributions: String,
    pub other_deductions: String,
}

impl TaxForm {
    pub fn to_input(&self) -> TaxCalculationInput {
        TaxCalculationInput {
            annual_income: coerce_amount("annual_income", &self.annual_income),
            retirement_contributions: coerce_amount(
                "retirement_contributions",
                &self.retirement_contributions,
            ),
            medical_aid_contributions: coerce_amount(
                "medical_aid_contributions",
                &self.medical_aid_contributions,
            ),
            other_deductions: coerce_amount("other_deductions", &self.other_deductions),
        }
    }
}
