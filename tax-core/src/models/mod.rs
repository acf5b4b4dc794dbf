mod rate_band;
mod retirement_limits;
mod tax_bracket;
mod tax_calculation_input;
mod tax_calculation_result;
mod tax_credit_schedule;
mod tax_table;

pub use rate_band::RateBand;
pub use retirement_limits::RetirementDeductionLimits;
pub use tax_bracket::{BracketSchedule, BracketScheduleError, FIXED_AMOUNT_TOLERANCE, TaxBracket};
pub use tax_calculation_input::TaxCalculationInput;
pub use tax_calculation_result::TaxCalculationResult;
pub use tax_credit_schedule::TaxCreditSchedule;
pub use tax_table::{TaxTable, TaxTableError};
