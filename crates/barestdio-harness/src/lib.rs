//! Conformance testing harness for barestdio.
//!
//! This crate provides:
//! - Fixture schema: JSON-described format/scan cases with expected results
//! - Fixture runner: execute cases against the engine and diff the outcomes
//! - CLI: verify fixture files or evaluate one-off templates from the shell
//!
//! The integration tests under `tests/` drive the runner over the fixture
//! files in `fixtures/`.

#![forbid(unsafe_code)]

pub mod fixtures;
pub mod runner;

pub use fixtures::{CaseSpec, DestSpec, FixtureCase, FixtureSet, HarnessError};
pub use runner::{CaseOutcome, SetSummary, run_case, run_set, scan_once};
