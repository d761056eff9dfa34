//! # barestdio-core
//!
//! A minimal formatted I/O engine for hosted environments that have no C
//! standard library: a printf-family formatter, a scanf-family parser, and
//! the numeric string conversions both rely on.
//!
//! The engine never allocates. Callers supply output buffers (or ask for a
//! count-only pass), input buffers, and explicit argument slot lists in
//! place of C variadic argument lists. All functions are pure over
//! caller-owned memory; the one exception is the legacy tokenizer wrapper in
//! [`string::strtok`], which retains a process-wide cursor and is documented
//! accordingly.

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(unsafe_code)]

pub mod stdio;
pub mod stdlib;
pub mod string;
