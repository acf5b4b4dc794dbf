//! Command-line surface of the calculator.

use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tax_core::{
    IncomeTaxCalculator, TaxCalculationInput, TaxCalculationResult, TaxTable,
    jurisdictions::sars,
};
use tax_data::{input_loader, load_table};
use tracing::{debug, info};

use crate::{
    form::TaxForm,
    report::{
        batch_row, bracket_rows, breakdown_rows, render_table, schedule_rows, summary_cards,
    },
};

/// Progressive income tax calculator for South African individuals.
///
/// Uses the built-in SARS 2024/2025 table unless `--table` points at a
/// TOML or CSV table file.
#[derive(Debug, Parser)]
#[command(name = "tax-calc", version)]
pub struct Cli {
    /// Tax table file (.toml or .csv) to use instead of the built-in table.
    #[arg(long, global = true)]
    pub table: Option<PathBuf>,

    /// Tax year to select from a CSV table holding several years.
    #[arg(long, global = true)]
    pub tax_year: Option<String>,

    /// Log filter, e.g. `debug` or `info,tax_core=trace`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Append log output to this file as well as stderr.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Calculate tax for one set of amounts.
    Calculate(CalculateArgs),
    /// Show the bracket schedule, credits and retirement limits.
    Brackets,
    /// Calculate tax for every row of a CSV file.
    Batch(BatchArgs),
    /// Load and validate a tax table file.
    Validate {
        /// Table file (.toml or .csv).
        path: PathBuf,
    },
}

/// Amounts are entered as text, the way a form field would hold them:
/// `R1,250,000` and `1 250 000` are both accepted, and anything that is not
/// a number counts as 0.
#[derive(Debug, Clone, Args)]
pub struct CalculateArgs {
    /// Annual gross income.
    #[arg(long, allow_hyphen_values = true)]
    pub income: String,

    /// Annual retirement fund contributions.
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub retirement: String,

    /// Annual medical aid contributions.
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub medical_aid: String,

    /// Other annual deductions.
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub other_deductions: String,

    /// Output as JSON instead of formatted tables.
    #[arg(long)]
    pub json: bool,
}

impl CalculateArgs {
    fn to_form(&self) -> TaxForm {
        TaxForm {
            annual_income: self.income.clone(),
            retirement_contributions: self.retirement.clone(),
            medical_aid_contributions: self.medical_aid.clone(),
            other_deductions: self.other_deductions.clone(),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct BatchArgs {
    /// CSV file with an `annual_income` column and optional `label`,
    /// `retirement_contributions`, `medical_aid_contributions` and
    /// `other_deductions` columns.
    pub file: PathBuf,

    /// Write results as CSV instead of a table.
    #[arg(long)]
    pub csv: bool,
}

#[derive(Debug, Serialize)]
struct CalculationReport<'a> {
    jurisdiction: &'a str,
    tax_year: &'a str,
    input: &'a TaxCalculationInput,
    result: &'a TaxCalculationResult,
}

/// Runs `cli.command`, writing its report to `out`.
pub fn run(
    cli: &Cli,
    out: &mut impl Write,
) -> Result<()> {
    match &cli.command {
        Command::Calculate(args) => {
            let table = resolve_table(cli)?;
            calculate(&table, args, out)
        }
        Command::Brackets => {
            let table = resolve_table(cli)?;
            brackets(&table, out)
        }
        Command::Batch(args) => {
            let table = resolve_table(cli)?;
            batch(&table, args, out)
        }
        Command::Validate { path } => {
            let table = load_table(path, cli.tax_year.as_deref())
                .with_context(|| format!("table '{}' is invalid", path.display()))?;
            writeln!(
                out,
                "{}: valid {} {} table with {} brackets",
                path.display(),
                table.jurisdiction,
                table.tax_year,
                table.brackets().len()
            )?;
            Ok(())
        }
    }
}

fn resolve_table(cli: &Cli) -> Result<TaxTable> {
    match &cli.table {
        Some(path) => load_table(path, cli.tax_year.as_deref())
            .with_context(|| format!("failed to load tax table '{}'", path.display())),
        None => {
            debug!("using built-in SARS table");
            sars::tax_year_2025().context("built-in SARS table is inconsistent")
        }
    }
}

fn heading(
    table: &TaxTable,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "{} {}", table.jurisdiction, table.tax_year)?;
    Ok(())
}

fn calculate(
    table: &TaxTable,
    args: &CalculateArgs,
    out: &mut impl Write,
) -> Result<()> {
    let input = args.to_form().to_input();
    let result = IncomeTaxCalculator::new(table).calculate(&input);

    if args.json {
        let report = CalculationReport {
            jurisdiction: &table.jurisdiction,
            tax_year: &table.tax_year,
            input: &input,
            result: &result,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    heading(table, out)?;
    writeln!(out, "{}", render_table(&summary_cards(&result)))?;
    writeln!(out, "{}", render_table(&breakdown_rows(&result)))?;
    Ok(())
}

fn brackets(
    table: &TaxTable,
    out: &mut impl Write,
) -> Result<()> {
    heading(table, out)?;
    writeln!(out, "{}", render_table(&bracket_rows(table.brackets())))?;
    writeln!(out, "{}", render_table(&schedule_rows(table)))?;
    Ok(())
}

fn batch(
    table: &TaxTable,
    args: &BatchArgs,
    out: &mut impl Write,
) -> Result<()> {
    let entries = input_loader::load_from_file(&args.file)
        .with_context(|| format!("failed to load batch file '{}'", args.file.display()))?;
    let calculator = IncomeTaxCalculator::new(table);

    let rows: Vec<_> = entries
        .iter()
        .map(|entry| batch_row(entry, &calculator.calculate(&entry.input)))
        .collect();
    info!(rows = rows.len(), file = %args.file.display(), "batch calculated");

    if args.csv {
        let mut writer = csv::Writer::from_writer(&mut *out);
        for row in &rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    } else {
        heading(table, out)?;
        writeln!(out, "{}", render_table(&rows))?;
    }
    Ok(())
}
