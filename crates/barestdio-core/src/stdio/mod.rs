//! Formatted I/O: the printf formatter and the scanf parser.

pub mod printf;
pub mod scanf;

pub use printf::{
    ArgCursor, FmtArg, FormatFlags, FormatSpec, Sink, format_length, pprint, snprintf, sprintf,
};
pub use scanf::{ScanArg, sscanf, vsscanf};
