//! Numeric string conversions.

pub mod conversion;

pub use conversion::{atoi, strtod, strtof, strtol, strtoll, strtoul, strtoull};
