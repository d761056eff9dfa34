//! Fixture schema and loading.
//!
//! A fixture set is a versioned JSON document holding format and scan cases.
//! Argument slots and destination slots are described declaratively so a
//! fixture file can exercise the whole directive grammar without any code
//! changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Harness-level failures (fixture loading, never engine behavior — the
/// engine reports only counts).
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to read fixture file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid fixture JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One formatter argument slot, as described in fixture JSON
/// (externally tagged: `{"int": -5}`, `{"str": null}`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgSpec {
    Int(i32),
    Uint(u32),
    Char(u8),
    Str(Option<String>),
    Ptr(u64),
    /// Expands to the two-slot high/low split consumed by `ll` directives.
    LongLong(u64),
}

/// One parser destination slot to allocate for a scan case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestSpec {
    SChar,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Size,
    /// `%s` destination buffer of the given capacity.
    Str(usize),
    /// `%s` with no destination (skip-and-count).
    StrSkip,
    /// `%c` destination buffer of the given capacity.
    Chars(usize),
}

impl std::str::FromStr for DestSpec {
    type Err = String;

    /// Shell form of a destination slot: a bare kind name for the integer
    /// widths (`int`, `uint`, `long`, ...), `str:<cap>` / `chars:<cap>` for
    /// buffers, `skip` for a skip-and-count `%s` destination.
    fn from_str(s: &str) -> Result<Self, String> {
        let (kind, cap) = match s.split_once(':') {
            Some((kind, cap)) => {
                let cap: usize = cap
                    .parse()
                    .map_err(|_| format!("invalid capacity in destination {s:?}"))?;
                (kind, Some(cap))
            }
            None => (s, None),
        };
        let spec = match (kind, cap) {
            ("schar", None) => DestSpec::SChar,
            ("uchar", None) => DestSpec::UChar,
            ("short", None) => DestSpec::Short,
            ("ushort", None) => DestSpec::UShort,
            ("int", None) => DestSpec::Int,
            ("uint", None) => DestSpec::UInt,
            ("long", None) => DestSpec::Long,
            ("ulong", None) => DestSpec::ULong,
            ("size", None) => DestSpec::Size,
            ("skip", None) => DestSpec::StrSkip,
            ("str", Some(cap)) => DestSpec::Str(cap),
            ("chars", Some(cap)) => DestSpec::Chars(cap),
            _ => return Err(format!("unknown destination spec {s:?}")),
        };
        Ok(spec)
    }
}

/// Expected value of a destination slot after the scan. Slots the case does
/// not expect to be touched use `Untouched`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSpec {
    Int(i64),
    Uint(u64),
    /// NUL-terminated content of a `Str` destination.
    Str(String),
    /// Raw content of a `Chars` destination.
    Bytes(Vec<u8>),
    Untouched,
}

/// What a case exercises: one format call or one parse call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CaseSpec {
    Format {
        template: String,
        args: Vec<ArgSpec>,
        /// Expected rendered text; the expected count is its length.
        expected: String,
    },
    Scan {
        template: String,
        input: String,
        dests: Vec<DestSpec>,
        expected_count: usize,
        expected_values: Vec<ValueSpec>,
    },
}

/// A single fixture test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    #[serde(flatten)]
    pub spec: CaseSpec,
}

/// A collection of fixture cases for a directive family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Family name ("printf" or "scanf").
    pub family: String,
    /// Individual test cases.
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path).map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| HarnessError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
