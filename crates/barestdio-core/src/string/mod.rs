//! String tokenization utilities.

pub mod strtok;

pub use strtok::Tokenizer;
