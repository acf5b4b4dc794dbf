//! Tabular presentation of calculation results and tax tables.

use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};
use tax_core::{
    BracketSchedule, RateBand, TaxCalculationResult, TaxTable,
    calculations::common::monthly,
};
use tax_data::BatchEntry;

use crate::format::{format_percent, format_rand, format_rate};

/// Headline figure shown above the breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct SummaryCard {
    #[tabled(rename = "Summary")]
    pub label: &'static str,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct BreakdownRow {
    #[tabled(rename = "Description")]
    pub description: &'static str,
    #[tabled(rename = "Annual Amount")]
    pub annual: String,
    #[tabled(rename = "Monthly Amount")]
    pub monthly: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct BracketRow {
    #[tabled(rename = "Taxable Income (Annual)")]
    pub range: String,
    #[tabled(rename = "Tax Rate")]
    pub rate: String,
    #[tabled(rename = "Fixed Amount")]
    pub fixed_amount: String,
    #[tabled(rename = "Band")]
    pub band: RateBand,
}

#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct ScheduleRow {
    #[tabled(rename = "Setting")]
    pub setting: &'static str,
    #[tabled(rename = "Value")]
    pub value: String,
}

/// One calculated line of a batch run; also the CSV output layout.
#[derive(Debug, Clone, PartialEq, Eq, Tabled, Serialize)]
pub struct BatchRow {
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Gross Income")]
    pub gross_annual_income: String,
    #[tabled(rename = "Taxable Income")]
    pub taxable_income: String,
    #[tabled(rename = "Annual Tax")]
    pub annual_tax: String,
    #[tabled(rename = "Monthly Tax")]
    pub monthly_tax: String,
    #[tabled(rename = "Net Monthly")]
    pub net_monthly_income: String,
    #[tabled(rename = "Effective Rate")]
    pub effective_tax_rate: String,
}

pub fn summary_cards(result: &TaxCalculationResult) -> Vec<SummaryCard> {
    vec![
        SummaryCard {
            label: "Annual Tax Liability",
            value: format_rand(result.annual_tax),
        },
        SummaryCard {
            label: "Effective Tax Rate",
            value: format_percent(result.effective_tax_rate_percent),
        },
        SummaryCard {
            label: "Net Monthly Income",
            value: format_rand(result.net_monthly_income),
        },
        SummaryCard {
            label: "Retirement Deduction",
            value: format_rand(result.retirement_deduction_applied),
        },
    ]
}

pub fn breakdown_rows(result: &TaxCalculationResult) -> Vec<BreakdownRow> {
    let row = |description, annual, monthly_amount| BreakdownRow {
        description,
        annual: format_rand(annual),
        monthly: format_rand(monthly_amount),
    };

    vec![
        row(
            "Gross Income",
            result.gross_annual_income,
            result.gross_monthly_income,
        ),
        row(
            "Taxable Income",
            result.taxable_income,
            monthly(result.taxable_income),
        ),
        row("Tax Liability", result.annual_tax, result.monthly_tax),
        row(
            "Medical Tax Credits",
            result.medical_credits_applied,
            monthly(result.medical_credits_applied),
        ),
        row(
            "Net Income",
            result.net_annual_income,
            result.net_monthly_income,
        ),
    ]
}

pub fn bracket_rows(schedule: &BracketSchedule) -> Vec<BracketRow> {
    schedule
        .brackets()
        .iter()
        .map(|bracket| {
            let upper = bracket
                .upper_bound
                .map_or_else(|| "Above".to_string(), format_rand);
            let fixed_amount = if bracket.cumulative_fixed_amount.is_zero() {
                "-".to_string()
            } else {
                format_rand(bracket.cumulative_fixed_amount)
            };

            BracketRow {
                range: format!("{} - {}", format_rand(bracket.lower_bound), upper),
                rate: format_rate(bracket.marginal_rate),
                fixed_amount,
                band: RateBand::for_rate(bracket.marginal_rate),
            }
        })
        .collect()
}

/// Credit schedule and retirement limits of a table.
pub fn schedule_rows(table: &TaxTable) -> Vec<ScheduleRow> {
    let credits = table.credits();
    let retirement = table.retirement();

    vec![
        ScheduleRow {
            setting: "Medical credit, main member (monthly)",
            value: format_rand(credits.main_member_monthly),
        },
        ScheduleRow {
            setting: "Medical credit, first dependent (monthly)",
            value: format_rand(credits.first_dependent_monthly),
        },
        ScheduleRow {
            setting: "Medical credit, additional dependents (monthly, not applied)",
            value: format_rand(credits.additional_dependent_monthly),
        },
        ScheduleRow {
            setting: "Medical credits applied (annual)",
            value: format_rand(credits.annual_medical_credits()),
        },
        ScheduleRow {
            setting: "Retirement deduction limit",
            value: format!(
                "{} of income, at most {}",
                format_rate(retirement.income_fraction),
                format_rand(retirement.annual_cap)
            ),
        },
    ]
}

pub fn batch_row(
    entry: &BatchEntry,
    result: &TaxCalculationResult,
) -> BatchRow {
    BatchRow {
        label: entry.label.clone(),
        gross_annual_income: format_rand(result.gross_annual_income),
        taxable_income: format_rand(result.taxable_income),
        annual_tax: format_rand(result.annual_tax),
        monthly_tax: format_rand(result.monthly_tax),
        net_monthly_income: format_rand(result.net_monthly_income),
        effective_tax_rate: format_percent(result.effective_tax_rate_percent),
    }
}

/// Renders rows as a rounded-border table with right-aligned values.
pub fn render_table<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string()
}
