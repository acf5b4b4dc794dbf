//! CSV loader for batches of tax calculation inputs.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter.
//!
//! | Column                      | Required | Notes                          |
//! |-----------------------------|----------|--------------------------------|
//! | `label`                     | no       | Defaults to `row N`            |
//! | `annual_income`             | yes      | Empty cell is 0                |
//! | `retirement_contributions`  | no       | Empty cell or missing is 0     |
//! | `medical_aid_contributions` | no       | Empty cell or missing is 0     |
//! | `other_deductions`          | no       | Empty cell or missing is 0     |
//!
//! ```csv
//! label,annual_income,retirement_contributions,medical_aid_contributions,other_deductions
//! junior,200000,,,
//! senior,500000,100000,36000,
//! ```

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use tax_core::TaxCalculationInput;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    label: Option<String>,
    #[serde(deserialize_with = "deserialize_amount")]
    annual_income: Decimal,
    #[serde(default, deserialize_with = "deserialize_amount")]
    retirement_contributions: Decimal,
    #[serde(default, deserialize_with = "deserialize_amount")]
    medical_aid_contributions: Decimal,
    #[serde(default, deserialize_with = "deserialize_amount")]
    other_deductions: Decimal,
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    trimmed
        .replace(',', "")
        .parse::<Decimal>()
        .map_err(|e| serde::de::Error::custom(format!("invalid amount '{trimmed}': {e}")))
}

/// Errors that can occur while loading calculation inputs.
#[derive(Debug, thiserror::Error)]
pub enum InputLoaderError {
    /// Bad structure, missing `annual_income` column, or an unparseable amount.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One labelled calculation request from a batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub label: String,
    pub input: TaxCalculationInput,
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> BatchEntry {
    let label = row
        .label
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| format!("row {row_number}"));

    BatchEntry {
        label,
        input: TaxCalculationInput {
            annual_income: row.annual_income,
            retirement_contributions: row.retirement_contributions,
            medical_aid_contributions: row.medical_aid_contributions,
            other_deductions: row.other_deductions,
        },
    }
}

/// Parse CSV text and return the entries in file order.
pub fn load_from_str(input: &str) -> Result<Vec<BatchEntry>, InputLoaderError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            Ok(convert_row(row, idx + 1))
        })
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<BatchEntry>, InputLoaderError> {
    let contents = std::fs::read_to_string(path).map_err(|source| InputLoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const MINIMAL_CSV: &str = "\
annual_income
200000
";

    const FULL_CSV: &str = "\
label,annual_income,retirement_contributions,medical_aid_contributions,other_deductions
senior,500000,100000,36000,2500.50
";

    const SPARSE_CSV: &str = "\
label,annual_income,retirement_contributions,medical_aid_contributions,other_deductions
,\"1,250,000\",,,
part-time,,,,
";

    #[test]
    fn minimal_csv_defaults_missing_columns() {
        let entries = load_from_str(MINIMAL_CSV).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, "row 1");
        assert_eq!(
            entries[0].input,
            TaxCalculationInput {
                annual_income: dec!(200000),
                ..Default::default()
            }
        );
    }

    #[test]
    fn full_csv_populates_every_field() {
        let entries = load_from_str(FULL_CSV).unwrap();

        assert_eq!(
            entries[0],
            BatchEntry {
                label: "senior".to_string(),
                input: TaxCalculationInput {
                    annual_income: dec!(500000),
                    retirement_contributions: dec!(100000),
                    medical_aid_contributions: dec!(36000),
                    other_deductions: dec!(2500.50),
                },
            }
        );
    }

    #[test]
    fn empty_cells_are_zero_and_commas_are_ignored() {
        let entries = load_from_str(SPARSE_CSV).unwrap();

        assert_eq!(entries[0].label, "row 1");
        assert_eq!(entries[0].input.annual_income, dec!(1250000));
        assert_eq!(entries[1].label, "part-time");
        assert_eq!(entries[1].input, TaxCalculationInput::default());
    }

    #[test]
    fn invalid_amount_is_a_parse_error() {
        let csv = "annual_income,other_deductions\n100000,lots\n";

        let err = load_from_str(csv).expect_err("non-numeric amount");

        assert!(err.to_string().contains("invalid amount 'lots'"), "unexpected error: {err}");
    }

    #[test]
    fn missing_income_column_is_a_parse_error() {
        let csv = "retirement_contributions\n5000\n";

        let err = load_from_str(csv).expect_err("annual_income missing");

        assert!(matches!(err, InputLoaderError::Parse(_)));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let csv = "annual_income,other_deductions\n100000\n";

        assert!(load_from_str(csv).is_err());
    }
}
