use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Full breakdown produced by one tax calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculationResult {
    pub gross_annual_income: Decimal,
    pub gross_monthly_income: Decimal,

    /// Income after the capped retirement deduction and other deductions.
    pub taxable_income: Decimal,

    /// Rate of the bracket the taxable income fell into (0 when nothing is taxable).
    pub marginal_rate: Decimal,
    pub tax_before_credits: Decimal,

    /// Tax after medical credits, never negative.
    pub annual_tax: Decimal,
    pub monthly_tax: Decimal,

    pub net_annual_income: Decimal,
    pub net_monthly_income: Decimal,

    /// Annual tax as a percentage of gross income.
    pub effective_tax_rate_percent: Decimal,

    pub retirement_deduction_applied: Decimal,
    pub medical_credits_applied: Decimal,
}
