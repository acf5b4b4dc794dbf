use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    BracketSchedule, BracketScheduleError, RetirementDeductionLimits, TaxBracket,
    TaxCreditSchedule,
};

/// Errors raised while assembling a jurisdiction's tax table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxTableError {
    #[error("invalid bracket schedule: {0}")]
    Brackets(#[from] BracketScheduleError),

    #[error("credit amount {field} must be non-negative, got {amount}")]
    NegativeCredit {
        field: &'static str,
        amount: Decimal,
    },

    #[error("retirement income fraction must be between 0 and 1, got {0}")]
    InvalidRetirementFraction(Decimal),

    #[error("retirement deduction cap must be non-negative, got {0}")]
    NegativeRetirementCap(Decimal),
}

/// Everything the calculator needs to know about one jurisdiction and year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTaxTable")]
pub struct TaxTable {
    pub jurisdiction: String,
    pub tax_year: String,
    brackets: BracketSchedule,
    credits: TaxCreditSchedule,
    retirement: RetirementDeductionLimits,
}

impl TaxTable {
    /// Builds a table, validating the credits and retirement limits.
    ///
    /// # Errors
    ///
    /// Returns [`TaxTableError`] if a credit amount is negative, the
    /// retirement fraction is outside [0, 1], or the cap is negative.
    pub fn new(
        jurisdiction: impl Into<String>,
        tax_year: impl Into<String>,
        brackets: BracketSchedule,
        credits: TaxCreditSchedule,
        retirement: RetirementDeductionLimits,
    ) -> Result<Self, TaxTableError> {
        if let Some((field, amount)) = credits.first_negative() {
            return Err(TaxTableError::NegativeCredit { field, amount });
        }
        if retirement.income_fraction < Decimal::ZERO || retirement.income_fraction > Decimal::ONE
        {
            return Err(TaxTableError::InvalidRetirementFraction(
                retirement.income_fraction,
            ));
        }
        if retirement.annual_cap < Decimal::ZERO {
            return Err(TaxTableError::NegativeRetirementCap(retirement.annual_cap));
        }

        Ok(Self {
            jurisdiction: jurisdiction.into(),
            tax_year: tax_year.into(),
            brackets,
            credits,
            retirement,
        })
    }

    /// Same as [`TaxTable::new`] but validates raw brackets first.
    pub fn from_brackets(
        jurisdiction: impl Into<String>,
        tax_year: impl Into<String>,
        brackets: Vec<TaxBracket>,
        credits: TaxCreditSchedule,
        retirement: RetirementDeductionLimits,
    ) -> Result<Self, TaxTableError> {
        let schedule = BracketSchedule::new(brackets)?;
        Self::new(jurisdiction, tax_year, schedule, credits, retirement)
    }

    pub fn brackets(&self) -> &BracketSchedule {
        &self.brackets
    }

    pub fn credits(&self) -> &TaxCreditSchedule {
        &self.credits
    }

    pub fn retirement(&self) -> &RetirementDeductionLimits {
        &self.retirement
    }

    /// Returns a copy of this table with a different bracket schedule.
    pub fn with_brackets(
        &self,
        brackets: BracketSchedule,
    ) -> Self {
        Self {
            brackets,
            ..self.clone()
        }
    }
}

#[derive(Deserialize)]
struct RawTaxTable {
    jurisdiction: String,
    tax_year: String,
    brackets: Vec<TaxBracket>,
    credits: TaxCreditSchedule,
    retirement: RetirementDeductionLimits,
}

impl TryFrom<RawTaxTable> for TaxTable {
    type Error = TaxTableError;

    fn try_from(raw: RawTaxTable) -> Result<Self, Self::Error> {
        Self::from_brackets(
            raw.jurisdiction,
            raw.tax_year,
            raw.brackets,
            raw.credits,
            raw.retirement,
        )
    }
}
