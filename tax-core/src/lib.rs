pub mod calculations;
pub mod jurisdictions;
pub mod models;

pub use calculations::{IncomeTaxCalculator, calculate};
pub use models::*;
