use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::MONTHS_PER_YEAR;

/// Fixed monthly medical scheme fees tax credits.
///
/// The annual offset only counts the main member and the first dependent.
/// `additional_dependent_monthly` is carried so the full schedule can be
/// displayed, but no calculation applies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCreditSchedule {
    pub main_member_monthly: Decimal,
    pub first_dependent_monthly: Decimal,
    pub additional_dependent_monthly: Decimal,
}

impl TaxCreditSchedule {
    /// Annual credit subtracted from tax before credits.
    pub fn annual_medical_credits(&self) -> Decimal {
        (self.main_member_monthly + self.first_dependent_monthly) * MONTHS_PER_YEAR
    }

    /// Returns the name and value of the first negative amount, if any.
    pub(crate) fn first_negative(&self) -> Option<(&'static str, Decimal)> {
        [
            ("main_member_monthly", self.main_member_monthly),
            ("first_dependent_monthly", self.first_dependent_monthly),
            ("additional_dependent_monthly", self.additional_dependent_monthly),
        ]
        .into_iter()
        .find(|(_, amount)| *amount < Decimal::ZERO)
    }
}
