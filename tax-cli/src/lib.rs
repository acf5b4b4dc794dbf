pub mod commands;
pub mod form;
pub mod format;
pub mod logging;
pub mod report;

pub use commands::{Cli, Command, run};
