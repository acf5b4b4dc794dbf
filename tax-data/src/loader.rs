use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{BracketSchedule, BracketScheduleError, TaxBracket};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading tax bracket data.
#[derive(Debug, Error)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Tax year '{0}' not found in bracket data")]
    TaxYearNotFound(String),

    #[error("Bracket data covers several tax years ({}); pick one", .0.join(", "))]
    MultipleTaxYears(Vec<String>),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(#[from] BracketScheduleError),
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the tax brackets CSV file.
///
/// - `tax_year`: The year of assessment label (e.g., `2024/2025`)
/// - `lower_bound`: Inclusive lower edge of the bracket
/// - `upper_bound`: Upper edge of the bracket (empty for unbounded)
/// - `marginal_rate`: The marginal tax rate as a decimal (e.g., 0.18 for 18%)
/// - `cumulative_fixed_amount`: Tax owed on all income below `lower_bound`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    pub tax_year: String,
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub marginal_rate: Decimal,
    pub cumulative_fixed_amount: Decimal,
}

impl From<&TaxBracketRecord> for TaxBracket {
    fn from(record: &TaxBracketRecord) -> Self {
        TaxBracket {
            lower_bound: record.lower_bound,
            upper_bound: record.upper_bound,
            marginal_rate: record.marginal_rate,
            cumulative_fixed_amount: record.cumulative_fixed_amount,
        }
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for tax bracket tables stored as CSV.
pub struct BracketLoader;

impl BracketLoader {
    /// Parse tax bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or a
    /// byte slice. Records are returned in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxBracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxBracketRecord = result?;
            records.push(record);
        }

        debug!(count = records.len(), "parsed bracket records");
        Ok(records)
    }

    /// Distinct tax years in the order they first appear.
    pub fn tax_years(records: &[TaxBracketRecord]) -> Vec<String> {
        let mut years: Vec<String> = Vec::new();
        for record in records {
            if !years.contains(&record.tax_year) {
                years.push(record.tax_year.clone());
            }
        }
        years
    }

    /// Returns the only tax year in `records`.
    ///
    /// # Errors
    ///
    /// [`BracketLoaderError::MultipleTaxYears`] when more than one year is
    /// present, [`BracketLoaderError::TaxYearNotFound`] when there are none.
    pub fn single_tax_year(records: &[TaxBracketRecord]) -> Result<String, BracketLoaderError> {
        let mut years = Self::tax_years(records);
        match years.len() {
            0 => Err(BracketLoaderError::TaxYearNotFound(String::new())),
            1 => Ok(years.remove(0)),
            _ => Err(BracketLoaderError::MultipleTaxYears(years)),
        }
    }

    /// Build a validated schedule from the records for `tax_year`.
    ///
    /// Records are sorted by lower bound before validation, so file order
    /// within a year does not matter.
    pub fn schedule(
        records: &[TaxBracketRecord],
        tax_year: &str,
    ) -> Result<BracketSchedule, BracketLoaderError> {
        let mut brackets: Vec<TaxBracket> = records
            .iter()
            .filter(|r| r.tax_year == tax_year)
            .map(TaxBracket::from)
            .collect();

        if brackets.is_empty() {
            return Err(BracketLoaderError::TaxYearNotFound(tax_year.to_string()));
        }

        brackets.sort_by(|a, b| a.lower_bound.cmp(&b.lower_bound));
        Ok(BracketSchedule::new(brackets)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const TEST_CSV: &str = r#"tax_year,lower_bound,upper_bound,marginal_rate,cumulative_fixed_amount
2024/2025,0,237100,0.18,0
2024/2025,237101,370500,0.26,42678
2024/2025,370501,512800,0.31,77362
2024/2025,512801,673000,0.36,121475
2024/2025,673001,857900,0.39,179147
2024/2025,857901,1817000,0.41,251258
2024/2025,1817001,,0.45,644489
2023/2024,0,237100,0.18,0
2023/2024,237101,,0.26,42678
"#;

    #[test]
    fn test_parse_csv_single_bracket() {
        let csv = "tax_year,lower_bound,upper_bound,marginal_rate,cumulative_fixed_amount\n2024/2025,0,237100,0.18,0";

        let records = BracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            TaxBracketRecord {
                tax_year: "2024/2025".to_string(),
                lower_bound: dec!(0),
                upper_bound: Some(dec!(237100)),
                marginal_rate: dec!(0.18),
                cumulative_fixed_amount: dec!(0),
            }
        );
    }

    #[test]
    fn test_parse_csv_unbounded_upper() {
        let csv = "tax_year,lower_bound,upper_bound,marginal_rate,cumulative_fixed_amount\n2024/2025,1817001,,0.45,644489";

        let records = BracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].upper_bound, None);
        assert_eq!(records[0].cumulative_fixed_amount, dec!(644489));
    }

    #[test]
    fn test_parse_invalid_csv_missing_column() {
        let csv = "tax_year,lower_bound\n2024/2025,0";

        let err = BracketLoader::parse(csv.as_bytes()).expect_err("Should fail for missing column");

        let BracketLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(msg.contains("missing field"), "Expected 'missing field' in error, got: {}", msg);
    }

    #[test]
    fn test_parse_invalid_csv_bad_decimal() {
        let csv = "tax_year,lower_bound,upper_bound,marginal_rate,cumulative_fixed_amount\n2024/2025,abc,237100,0.18,0";

        let err = BracketLoader::parse(csv.as_bytes()).expect_err("Should fail for invalid decimal");

        assert!(matches!(err, BracketLoaderError::CsvParse(_)));
    }

    #[test]
    fn test_parse_empty_csv() {
        let csv = "tax_year,lower_bound,upper_bound,marginal_rate,cumulative_fixed_amount\n";

        let records = BracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert!(records.is_empty());
    }

    #[test]
    fn test_tax_years_in_file_order() {
        let records = BracketLoader::parse(TEST_CSV.as_bytes()).unwrap();

        assert_eq!(
            BracketLoader::tax_years(&records),
            vec!["2024/2025".to_string(), "2023/2024".to_string()]
        );
    }

    #[test]
    fn test_single_tax_year_rejects_multiple_years() {
        let records = BracketLoader::parse(TEST_CSV.as_bytes()).unwrap();

        let err = BracketLoader::single_tax_year(&records).expect_err("two years present");

        assert!(matches!(err, BracketLoaderError::MultipleTaxYears(ref years) if years.len() == 2));
    }

    #[test]
    fn test_schedule_for_year() {
        let records = BracketLoader::parse(TEST_CSV.as_bytes()).unwrap();

        let schedule = BracketLoader::schedule(&records, "2024/2025").expect("valid schedule");

        assert_eq!(schedule.len(), 7);
        assert_eq!(schedule.brackets()[2].marginal_rate, dec!(0.31));
        assert!(schedule.brackets()[6].is_unbounded());
    }

    #[test]
    fn test_schedule_sorts_records() {
        let csv = "tax_year,lower_bound,upper_bound,marginal_rate,cumulative_fixed_amount
2024/2025,237101,,0.26,42678
2024/2025,0,237100,0.18,0
";
        let records = BracketLoader::parse(csv.as_bytes()).unwrap();

        let schedule = BracketLoader::schedule(&records, "2024/2025").expect("valid schedule");

        assert_eq!(schedule.brackets()[0].lower_bound, dec!(0));
    }

    #[test]
    fn test_schedule_unknown_year() {
        let records = BracketLoader::parse(TEST_CSV.as_bytes()).unwrap();

        let err = BracketLoader::schedule(&records, "1999/2000").expect_err("year absent");

        match err {
            BracketLoaderError::TaxYearNotFound(ref year) => assert_eq!(year, "1999/2000"),
            other => panic!("expected TaxYearNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_schedule_rejects_gap() {
        let csv = "tax_year,lower_bound,upper_bound,marginal_rate,cumulative_fixed_amount
2024/2025,0,237100,0.18,0
2024/2025,300000,,0.26,42678
";
        let records = BracketLoader::parse(csv.as_bytes()).unwrap();

        let err = BracketLoader::schedule(&records, "2024/2025").expect_err("gap should fail");

        assert!(matches!(
            err,
            BracketLoaderError::InvalidSchedule(BracketScheduleError::Gap { index: 1, .. })
        ));
    }
}
