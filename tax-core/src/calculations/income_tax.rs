//! Progressive income tax calculation.
//!
//! The calculator follows the same sequence for every request:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Retirement deduction: contributions, capped at the smaller of a fraction of income or a fixed annual cap |
//! | 2    | Taxable income: income minus the retirement deduction and other deductions, floored at 0 |
//! | 3    | Tax before credits: the bracket's cumulative fixed amount plus the marginal rate on income above its lower bound |
//! | 4    | Annual tax: tax before credits minus the annual medical credits, floored at 0 |
//! | 5    | Derived figures: monthly tax, net income, effective rate |
//!
//! Negative inputs are clamped to zero rather than rejected, so a calculation
//! against a validated [`TaxTable`] always produces a result.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::jurisdictions::sars;
//! use tax_core::{IncomeTaxCalculator, TaxCalculationInput};
//!
//! let table = sars::tax_year_2025().unwrap();
//! let calculator = IncomeTaxCalculator::new(&table);
//!
//! let result = calculator.calculate(&TaxCalculationInput {
//!     annual_income: dec!(200000),
//!     ..Default::default()
//! });
//!
//! assert_eq!(result.tax_before_credits, dec!(36000.00));
//! assert_eq!(result.medical_credits_applied, dec!(8736));
//! assert_eq!(result.annual_tax, dec!(27264.00));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{clamp_non_negative, monthly, percentage_of, round_half_up};
use crate::{TaxCalculationInput, TaxCalculationResult, TaxTable};

/// Calculates the full tax breakdown for `input` against `table`.
///
/// Shorthand for `IncomeTaxCalculator::new(table).calculate(input)`.
pub fn calculate(
    input: &TaxCalculationInput,
    table: &TaxTable,
) -> TaxCalculationResult {
    IncomeTaxCalculator::new(table).calculate(input)
}

/// Calculator for progressive income tax against one jurisdiction's table.
///
/// Holds only a shared reference to the table, so one calculator can serve
/// any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct IncomeTaxCalculator<'a> {
    table: &'a TaxTable,
}

impl<'a> IncomeTaxCalculator<'a> {
    pub fn new(table: &'a TaxTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a TaxTable {
        self.table
    }

    /// Runs every calculation step and returns the breakdown.
    pub fn calculate(
        &self,
        input: &TaxCalculationInput,
    ) -> TaxCalculationResult {
        let input = input.sanitized();
        let annual_income = input.annual_income;

        let retirement_deduction =
            self.retirement_deduction(annual_income, input.retirement_contributions);

        let taxable_income =
            self.taxable_income(annual_income, retirement_deduction, input.other_deductions);

        let marginal_rate = self.marginal_rate(taxable_income);
        let tax_before_credits = self.tax_for_taxable_income(taxable_income);

        let medical_credits = self.medical_credits();
        let annual_tax = self.tax_after_credits(tax_before_credits, medical_credits);

        let net_annual_income = annual_income - annual_tax;

        debug!(
            %annual_income,
            %retirement_deduction,
            %taxable_income,
            %tax_before_credits,
            %annual_tax,
            "calculated income tax"
        );

        TaxCalculationResult {
            gross_annual_income: annual_income,
            gross_monthly_income: monthly(annual_income),
            taxable_income,
            marginal_rate,
            tax_before_credits,
            annual_tax,
            monthly_tax: monthly(annual_tax),
            net_annual_income,
            net_monthly_income: monthly(net_annual_income),
            effective_tax_rate_percent: percentage_of(annual_tax, annual_income),
            retirement_deduction_applied: retirement_deduction,
            medical_credits_applied: medical_credits,
        }
    }

    /// Tax owed on `taxable_income` before any credits, rounded to cents.
    ///
    /// Only the slice of income above the matching bracket's lower bound is
    /// taxed at that bracket's rate; everything below is covered by its
    /// cumulative fixed amount.
    pub fn tax_for_taxable_income(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        match self.table.brackets().bracket_for(taxable_income) {
            Some(bracket) => round_half_up(
                bracket.cumulative_fixed_amount
                    + (taxable_income - bracket.lower_bound) * bracket.marginal_rate,
            ),
            None => Decimal::ZERO,
        }
    }

    /// Contributions allowed as a deduction; anything above the cap is ignored.
    fn retirement_deduction(
        &self,
        annual_income: Decimal,
        contributions: Decimal,
    ) -> Decimal {
        let cap = self.table.retirement().max_deduction(annual_income);
        contributions.min(cap)
    }

    fn taxable_income(
        &self,
        annual_income: Decimal,
        retirement_deduction: Decimal,
        other_deductions: Decimal,
    ) -> Decimal {
        clamp_non_negative(round_half_up(
            annual_income - retirement_deduction - other_deductions,
        ))
    }

    fn marginal_rate(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        self.table
            .brackets()
            .bracket_for(taxable_income)
            .map_or(Decimal::ZERO, |b| b.marginal_rate)
    }

    fn medical_credits(&self) -> Decimal {
        self.table.credits().annual_medical_credits()
    }

    fn tax_after_credits(
        &self,
        tax_before_credits: Decimal,
        credits: Decimal,
    ) -> Decimal {
        clamp_non_negative(tax_before_credits - credits)
    }
}
