use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Annual amounts supplied by the caller for a single calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculationInput {
    pub annual_income: Decimal,
    pub retirement_contributions: Decimal,
    /// Collected for completeness; the medical credit is a fixed schedule
    /// and does not depend on this amount.
    pub medical_aid_contributions: Decimal,
    pub other_deductions: Decimal,
}

impl TaxCalculationInput {
    /// Returns a copy with every negative amount clamped to zero.
    pub fn sanitized(&self) -> Self {
        Self {
            annual_income: clamp_field("annual_income", self.annual_income),
            retirement_contributions: clamp_field(
                "retirement_contributions",
                self.retirement_contributions,
            ),
            medical_aid_contributions: clamp_field(
                "medical_aid_contributions",
                self.medical_aid_contributions,
            ),
            other_deductions: clamp_field("other_deductions", self.other_deductions),
        }
    }
}

fn clamp_field(
    field: &'static str,
    value: Decimal,
) -> Decimal {
    if value < Decimal::ZERO {
        warn!(field, %value, "negative amount clamped to zero");
        Decimal::ZERO
    } else {
        value
    }
}
