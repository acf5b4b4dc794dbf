use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Limits on the deductible portion of retirement fund contributions.
///
/// The deductible amount is the smaller of `income_fraction` of annual
/// income and `annual_cap`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetirementDeductionLimits {
    pub income_fraction: Decimal,
    pub annual_cap: Decimal,
}

impl RetirementDeductionLimits {
    /// Largest deduction allowed for the given annual income.
    pub fn max_deduction(
        &self,
        annual_income: Decimal,
    ) -> Decimal {
        (annual_income * self.income_fraction).min(self.annual_cap)
    }
}
