//! Marginal tax brackets and the validated schedule that holds them.
//!
//! A [`BracketSchedule`] can only be built through [`BracketSchedule::new`]
//! (or deserialized, which runs the same checks), so every schedule handed to
//! the calculator is sorted, contiguous, capped by exactly one unbounded
//! bracket, and carries fixed amounts consistent with the rates below them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum difference tolerated between a bracket's published fixed amount
/// and the amount implied by the brackets below it.
pub const FIXED_AMOUNT_TOLERANCE: Decimal = Decimal::ONE;

/// Errors describing a malformed bracket table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketScheduleError {
    /// The table contains no brackets at all.
    #[error("no tax brackets provided")]
    Empty,

    /// The first bracket must start at zero income.
    #[error("first bracket must start at 0, got {0}")]
    FirstLowerBoundNotZero(Decimal),

    /// Marginal rates are fractions in (0, 1].
    #[error("bracket {index}: marginal rate must be in (0, 1], got {rate}")]
    InvalidRate { index: usize, rate: Decimal },

    /// A bounded bracket whose upper edge does not lie above its lower edge.
    #[error("bracket {index}: upper bound {upper} must be above lower bound {lower}")]
    EmptyRange {
        index: usize,
        lower: Decimal,
        upper: Decimal,
    },

    /// Only the last bracket may be unbounded.
    #[error("bracket {index} is unbounded but is not the last bracket")]
    UnboundedBeforeEnd { index: usize },

    /// The last bracket must be unbounded so every income has a bracket.
    #[error("last bracket must be unbounded, got upper bound {0}")]
    BoundedTopBracket(Decimal),

    /// A bracket starts more than one unit above the previous upper edge.
    #[error("gap between bracket {index} (starts at {lower}) and previous upper bound {previous_upper}")]
    Gap {
        index: usize,
        lower: Decimal,
        previous_upper: Decimal,
    },

    /// A bracket starts below the previous upper edge.
    #[error("bracket {index} (starts at {lower}) overlaps previous upper bound {previous_upper}")]
    Overlap {
        index: usize,
        lower: Decimal,
        previous_upper: Decimal,
    },

    /// The published fixed amount disagrees with the brackets below it.
    #[error("bracket {index}: cumulative fixed amount {actual} does not match expected {expected}")]
    FixedAmountMismatch {
        index: usize,
        expected: Decimal,
        actual: Decimal,
    },
}

/// One row of a progressive tax table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive lower edge of the bracket.
    pub lower_bound: Decimal,
    /// Upper edge; `None` for the unbounded top bracket.
    pub upper_bound: Option<Decimal>,
    /// Rate applied to the slice of income inside this bracket.
    pub marginal_rate: Decimal,
    /// Tax owed on all income up to `lower_bound`.
    pub cumulative_fixed_amount: Decimal,
}

impl TaxBracket {
    pub fn is_unbounded(&self) -> bool {
        self.upper_bound.is_none()
    }
}

/// An ordered, validated sequence of [`TaxBracket`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketSchedule {
    brackets: Vec<TaxBracket>,
}

impl BracketSchedule {
    /// Validates `brackets` and wraps them in a schedule.
    ///
    /// Brackets must already be sorted ascending by `lower_bound`.
    ///
    /// # Errors
    ///
    /// Returns the first [`BracketScheduleError`] found.
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, BracketScheduleError> {
        validate(&brackets)?;
        Ok(Self { brackets })
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// Returns the highest bracket whose lower bound lies below
    /// `taxable_income`, or `None` when there is no positive income to tax.
    pub fn bracket_for(
        &self,
        taxable_income: Decimal,
    ) -> Option<&TaxBracket> {
        if taxable_income <= Decimal::ZERO {
            return None;
        }

        self.brackets
            .iter()
            .rev()
            .find(|b| b.lower_bound < taxable_income)
    }
}

impl TryFrom<Vec<TaxBracket>> for BracketSchedule {
    type Error = BracketScheduleError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<BracketSchedule> for Vec<TaxBracket> {
    fn from(schedule: BracketSchedule) -> Self {
        schedule.brackets
    }
}

fn validate(brackets: &[TaxBracket]) -> Result<(), BracketScheduleError> {
    let first = brackets.first().ok_or(BracketScheduleError::Empty)?;
    if first.lower_bound != Decimal::ZERO {
        return Err(BracketScheduleError::FirstLowerBoundNotZero(
            first.lower_bound,
        ));
    }

    let last_index = brackets.len() - 1;
    for (index, bracket) in brackets.iter().enumerate() {
        let rate = bracket.marginal_rate;
        if rate <= Decimal::ZERO || rate > Decimal::ONE {
            return Err(BracketScheduleError::InvalidRate { index, rate });
        }

        match bracket.upper_bound {
            Some(upper) if upper <= bracket.lower_bound => {
                return Err(BracketScheduleError::EmptyRange {
                    index,
                    lower: bracket.lower_bound,
                    upper,
                });
            }
            Some(upper) if index == last_index => {
                return Err(BracketScheduleError::BoundedTopBracket(upper));
            }
            None if index != last_index => {
                return Err(BracketScheduleError::UnboundedBeforeEnd { index });
            }
            _ => {}
        }
    }

    // Every bracket but the last is bounded from here on.
    let mut expected_fixed = Decimal::ZERO;
    let mut slice_start = first.lower_bound;
    for (index, bracket) in brackets.iter().enumerate() {
        if (bracket.cumulative_fixed_amount - expected_fixed).abs() >= FIXED_AMOUNT_TOLERANCE {
            return Err(BracketScheduleError::FixedAmountMismatch {
                index,
                expected: expected_fixed,
                actual: bracket.cumulative_fixed_amount,
            });
        }

        let Some(upper) = bracket.upper_bound else {
            break;
        };

        let next = &brackets[index + 1];
        if next.lower_bound < upper {
            return Err(BracketScheduleError::Overlap {
                index: index + 1,
                lower: next.lower_bound,
                previous_upper: upper,
            });
        }
        if next.lower_bound > upper + Decimal::ONE {
            return Err(BracketScheduleError::Gap {
                index: index + 1,
                lower: next.lower_bound,
                previous_upper: upper,
            });
        }

        expected_fixed += (upper - slice_start) * bracket.marginal_rate;
        slice_start = upper;
    }

    Ok(())
}
