//! Tax table files.
//!
//! Two formats are accepted:
//!
//! - **TOML** (`.toml`): a complete table with brackets, medical credits and
//!   retirement limits. Fractional values may be quoted to keep them exact.
//! - **CSV** (`.csv`): brackets only, in the [`BracketLoader`] layout. The
//!   built-in SARS credit schedule and retirement limits are used alongside.
//!
//! ```toml
//! jurisdiction = "SARS"
//! tax_year = "2024/2025"
//!
//! [[brackets]]
//! lower_bound = 0
//! upper_bound = 237100
//! marginal_rate = "0.18"
//! cumulative_fixed_amount = 0
//!
//! [[brackets]]
//! lower_bound = 237101
//! marginal_rate = "0.26"
//! cumulative_fixed_amount = 42678
//!
//! [credits]
//! main_member_monthly = 364
//! first_dependent_monthly = 364
//! additional_dependent_monthly = 246
//!
//! [retirement]
//! income_fraction = "0.275"
//! annual_cap = 350000
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tax_core::jurisdictions::sars;
use tax_core::{TaxTable, TaxTableError};
use thiserror::Error;
use tracing::info;

use crate::loader::{BracketLoader, BracketLoaderError};

#[derive(Debug, Error)]
pub enum TableFileError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid table file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Brackets(#[from] BracketLoaderError),

    #[error("invalid tax table: {0}")]
    Table(#[from] TaxTableError),

    #[error("unsupported table format '{}' (expected .toml or .csv)", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Parses a complete tax table from TOML text.
pub fn parse_toml(input: &str) -> Result<TaxTable, TableFileError> {
    Ok(toml::from_str(input)?)
}

/// Builds a table from CSV bracket data plus the built-in SARS credits and
/// retirement limits. `tax_year` may be omitted when the CSV holds one year.
pub fn parse_csv(
    input: &str,
    tax_year: Option<&str>,
) -> Result<TaxTable, TableFileError> {
    let records = BracketLoader::parse(input.as_bytes())?;
    let tax_year = match tax_year {
        Some(year) => year.to_string(),
        None => BracketLoader::single_tax_year(&records)?,
    };
    let schedule = BracketLoader::schedule(&records, &tax_year)?;

    Ok(TaxTable::new(
        sars::JURISDICTION,
        tax_year,
        schedule,
        sars::medical_credits_2025(),
        sars::retirement_limits(),
    )?)
}

/// Loads and validates a tax table from `path`, choosing the format by
/// file extension.
pub fn load_table(
    path: &Path,
    tax_year: Option<&str>,
) -> Result<TaxTable, TableFileError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let read = || {
        fs::read_to_string(path).map_err(|source| TableFileError::Io {
            path: path.to_path_buf(),
            source,
        })
    };

    let table = match extension.as_deref() {
        Some("toml") => parse_toml(&read()?)?,
        Some("csv") => parse_csv(&read()?, tax_year)?,
        _ => return Err(TableFileError::UnsupportedFormat(path.to_path_buf())),
    };

    info!(
        path = %path.display(),
        jurisdiction = %table.jurisdiction,
        tax_year = %table.tax_year,
        brackets = table.brackets().len(),
        "loaded tax table"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const MINIMAL_TOML: &str = r#"
jurisdiction = "Testland"
tax_year = "2030"

[[brackets]]
lower_bound = 0
upper_bound = 1000
marginal_rate = "0.10"
cumulative_fixed_amount = 0

[[brackets]]
lower_bound = 1000
marginal_rate = "0.20"
cumulative_fixed_amount = 100

[credits]
main_member_monthly = 10
first_dependent_monthly = 5
additional_dependent_monthly = 0

[retirement]
income_fraction = "0.1"
annual_cap = 500
"#;

    #[test]
    fn parse_toml_builds_table() {
        let table = parse_toml(MINIMAL_TOML).expect("valid table");

        assert_eq!(table.jurisdiction, "Testland");
        assert_eq!(table.tax_year, "2030");
        assert_eq!(table.brackets().len(), 2);
        assert_eq!(table.brackets().brackets()[1].upper_bound, None);
        assert_eq!(table.credits().annual_medical_credits(), dec!(180));
        assert_eq!(table.retirement().annual_cap, dec!(500));
    }

    #[test]
    fn parse_toml_rejects_inconsistent_fixed_amount() {
        let input = MINIMAL_TOML.replace("cumulative_fixed_amount = 100", "cumulative_fixed_amount = 150");

        let err = parse_toml(&input).expect_err("fixed amount mismatch");

        assert!(
            err.to_string().contains("cumulative fixed amount"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn parse_toml_rejects_missing_section() {
        let input = MINIMAL_TOML.replace("[retirement]", "[pension]");

        let err = parse_toml(&input).expect_err("retirement section missing");

        assert!(matches!(err, TableFileError::Toml(_)));
    }

    #[test]
    fn parse_csv_uses_single_year_and_sars_credits() {
        let csv = "tax_year,lower_bound,upper_bound,marginal_rate,cumulative_fixed_amount
2030,0,1000,0.10,0
2030,1001,,0.20,100
";

        let table = parse_csv(csv, None).expect("valid csv table");

        assert_eq!(table.tax_year, "2030");
        assert_eq!(table.credits(), &sars::medical_credits_2025());
        assert_eq!(table.retirement(), &sars::retirement_limits());
    }

    #[test]
    fn load_table_rejects_unknown_extension() {
        let err = load_table(Path::new("table.json"), None).expect_err("json unsupported");

        assert!(matches!(err, TableFileError::UnsupportedFormat(_)));
    }

    #[test]
    fn load_table_reports_missing_file() {
        let err = load_table(Path::new("/does/not/exist.toml"), None).expect_err("missing");

        assert!(matches!(err, TableFileError::Io { .. }));
    }
}
