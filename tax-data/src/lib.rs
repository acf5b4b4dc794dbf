//! Loaders for tax tables and calculation inputs stored on disk.

pub mod input_loader;
pub mod loader;
pub mod table_file;

pub use input_loader::{BatchEntry, InputLoaderError};
pub use loader::{BracketLoader, BracketLoaderError, TaxBracketRecord};
pub use table_file::{TableFileError, load_table, parse_toml};
