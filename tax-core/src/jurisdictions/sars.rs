//! South African Revenue Service (SARS) individual income tax tables.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::{RetirementDeductionLimits, TaxBracket, TaxCreditSchedule, TaxTable, TaxTableError};

pub const JURISDICTION: &str = "SARS";

/// `(lower_bound, upper_bound, marginal_rate, cumulative_fixed_amount)` for
/// the 2024/2025 year of assessment. `None` marks the unbounded top bracket.
const BRACKETS_2025: [(Decimal, Option<Decimal>, Decimal, Decimal); 7] = [
    (dec!(0), Some(dec!(237100)), dec!(0.18), dec!(0)),
    (dec!(237101), Some(dec!(370500)), dec!(0.26), dec!(42678)),
    (dec!(370501), Some(dec!(512800)), dec!(0.31), dec!(77362)),
    (dec!(512801), Some(dec!(673000)), dec!(0.36), dec!(121475)),
    (dec!(673001), Some(dec!(857900)), dec!(0.39), dec!(179147)),
    (dec!(857901), Some(dec!(1817000)), dec!(0.41), dec!(251258)),
    (dec!(1817001), None, dec!(0.45), dec!(644489)),
];

/// Monthly medical scheme fees tax credits.
pub fn medical_credits_2025() -> TaxCreditSchedule {
    TaxCreditSchedule {
        main_member_monthly: dec!(364),
        first_dependent_monthly: dec!(364),
        additional_dependent_monthly: dec!(246),
    }
}

/// Retirement fund contributions: 27.5% of income, at most R350 000 a year.
pub fn retirement_limits() -> RetirementDeductionLimits {
    RetirementDeductionLimits {
        income_fraction: dec!(0.275),
        annual_cap: dec!(350000),
    }
}

/// The 2024/2025 income tax brackets.
pub fn brackets_2025() -> Vec<TaxBracket> {
    BRACKETS_2025
        .iter()
        .map(|&(lower, upper, rate, fixed)| TaxBracket {
            lower_bound: lower,
            upper_bound: upper,
            marginal_rate: rate,
            cumulative_fixed_amount: fixed,
        })
        .collect()
}

/// Complete table for the 2024/2025 year of assessment.
///
/// # Errors
///
/// Returns [`TaxTableError`] only if the constants above are edited into an
/// inconsistent state; callers treat this as a fatal configuration error.
pub fn tax_year_2025() -> Result<TaxTable, TaxTableError> {
    debug!("building SARS 2024/2025 tax table");
    TaxTable::from_brackets(
        JURISDICTION,
        "2024/2025",
        brackets_2025(),
        medical_credits_2025(),
        retirement_limits(),
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn built_in_table_is_valid() {
        let table = tax_year_2025().expect("built-in table should validate");

        assert_eq!(table.jurisdiction, "SARS");
        assert_eq!(table.tax_year, "2024/2025");
        assert_eq!(table.brackets().len(), 7);
    }

    #[test]
    fn top_bracket_is_unbounded() {
        let table = tax_year_2025().unwrap();
        let top = table.brackets().brackets().last().unwrap();

        assert!(top.is_unbounded());
        assert_eq!(top.lower_bound, dec!(1817001));
        assert_eq!(top.marginal_rate, dec!(0.45));
        assert_eq!(top.cumulative_fixed_amount, dec!(644489));
    }

    #[test]
    fn annual_medical_credits() {
        assert_eq!(medical_credits_2025().annual_medical_credits(), dec!(8736));
    }
}
