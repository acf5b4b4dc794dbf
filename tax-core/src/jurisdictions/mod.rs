//! Built-in jurisdiction tables.

pub mod sars;
