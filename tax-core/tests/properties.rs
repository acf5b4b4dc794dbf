//! Property checks for the income tax calculator against the SARS table.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tax_core::jurisdictions::sars;
use tax_core::{IncomeTaxCalculator, TaxCalculationInput, TaxTable, calculate};

fn table() -> TaxTable {
    sars::tax_year_2025().expect("built-in table should validate")
}

/// Whole-rand amounts up to R5 million.
fn rands() -> impl Strategy<Value = Decimal> {
    (0u64..5_000_000).prop_map(Decimal::from)
}

/// Amounts with cents, up to R5 million.
fn amounts() -> impl Strategy<Value = Decimal> {
    (0i64..500_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn inputs() -> impl Strategy<Value = TaxCalculationInput> {
    (amounts(), amounts(), amounts(), amounts()).prop_map(
        |(annual_income, retirement_contributions, medical_aid_contributions, other_deductions)| {
            TaxCalculationInput {
                annual_income,
                retirement_contributions,
                medical_aid_contributions,
                other_deductions,
            }
        },
    )
}

proptest! {
    #[test]
    fn annual_tax_is_never_negative(input in inputs()) {
        let result = calculate(&input, &table());

        prop_assert!(result.annual_tax >= Decimal::ZERO);
    }

    #[test]
    fn net_income_identity_holds(input in inputs()) {
        let result = calculate(&input, &table());

        prop_assert_eq!(result.net_annual_income, input.annual_income - result.annual_tax);
    }

    #[test]
    fn retirement_deduction_is_capped(input in inputs()) {
        let result = calculate(&input, &table());

        let cap = (input.annual_income * dec!(0.275)).min(dec!(350000));
        prop_assert_eq!(
            result.retirement_deduction_applied,
            input.retirement_contributions.min(cap)
        );
    }

    #[test]
    fn nothing_taxable_means_no_tax(income in amounts(), extra in amounts()) {
        let input = TaxCalculationInput {
            annual_income: income,
            other_deductions: income + extra,
            ..Default::default()
        };

        let result = calculate(&input, &table());

        prop_assert_eq!(result.taxable_income, Decimal::ZERO);
        prop_assert_eq!(result.annual_tax, Decimal::ZERO);
        prop_assert_eq!(result.effective_tax_rate_percent, Decimal::ZERO);
    }

    #[test]
    fn tax_is_non_decreasing_in_whole_rands(income in rands(), step in 1u64..50_000) {
        let table = table();
        let calculator = IncomeTaxCalculator::new(&table);

        let lower = calculator.tax_for_taxable_income(income);
        let higher = calculator.tax_for_taxable_income(income + Decimal::from(step));

        prop_assert!(higher >= lower, "tax({}) = {} > tax({}) = {}", income, lower, income + Decimal::from(step), higher);
    }

    #[test]
    fn one_rand_more_costs_at_most_the_top_rate(income in rands()) {
        let table = table();
        let calculator = IncomeTaxCalculator::new(&table);

        let delta = calculator.tax_for_taxable_income(income + Decimal::ONE)
            - calculator.tax_for_taxable_income(income);

        prop_assert!(delta >= Decimal::ZERO);
        prop_assert!(delta <= dec!(0.46), "jump of {} at {}", delta, income);
    }

    #[test]
    fn calculation_is_idempotent(input in inputs()) {
        let table = table();

        prop_assert_eq!(calculate(&input, &table), calculate(&input, &table));
    }
}

#[test]
fn calculator_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<IncomeTaxCalculator<'static>>();
    assert_send_sync::<TaxTable>();
}

#[test]
fn concurrent_calculations_agree() {
    let table = table();
    let input = TaxCalculationInput {
        annual_income: dec!(650000),
        retirement_contributions: dec!(60000),
        ..Default::default()
    };
    let expected = calculate(&input, &table);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| calculate(&input, &table)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
