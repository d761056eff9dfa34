//! Fixture runner: execute cases against the engine and diff the outcomes.

use barestdio_core::stdio::printf::{FmtArg, format_length, sprintf};
use barestdio_core::stdio::scanf::{ScanArg, vsscanf};

use crate::fixtures::{ArgSpec, CaseSpec, DestSpec, FixtureCase, FixtureSet, ValueSpec};

/// Result of one executed case.
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    pub name: String,
    pub passed: bool,
    /// Human-readable mismatch description; empty on success.
    pub detail: String,
}

/// Aggregate over a fixture set.
#[derive(Debug, Clone, Default)]
pub struct SetSummary {
    pub total: usize,
    pub passed: usize,
    pub outcomes: Vec<CaseOutcome>,
}

impl SetSummary {
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }
}

/// Backing storage for one parser destination slot.
#[derive(Debug)]
enum DestCell {
    SChar(i8),
    UChar(u8),
    Short(i16),
    UShort(u16),
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    Size(usize),
    Str(Vec<u8>),
    StrSkip,
    Chars(Vec<u8>),
}

impl DestCell {
    fn new(spec: &DestSpec) -> DestCell {
        match spec {
            DestSpec::SChar => DestCell::SChar(0),
            DestSpec::UChar => DestCell::UChar(0),
            DestSpec::Short => DestCell::Short(0),
            DestSpec::UShort => DestCell::UShort(0),
            DestSpec::Int => DestCell::Int(0),
            DestSpec::UInt => DestCell::UInt(0),
            DestSpec::Long => DestCell::Long(0),
            DestSpec::ULong => DestCell::ULong(0),
            DestSpec::Size => DestCell::Size(0),
            DestSpec::Str(cap) => DestCell::Str(vec![0u8; *cap]),
            DestSpec::StrSkip => DestCell::StrSkip,
            DestSpec::Chars(cap) => DestCell::Chars(vec![0u8; *cap]),
        }
    }

    fn as_arg(&mut self) -> ScanArg<'_> {
        match self {
            DestCell::SChar(v) => ScanArg::SChar(v),
            DestCell::UChar(v) => ScanArg::UChar(v),
            DestCell::Short(v) => ScanArg::Short(v),
            DestCell::UShort(v) => ScanArg::UShort(v),
            DestCell::Int(v) => ScanArg::Int(v),
            DestCell::UInt(v) => ScanArg::UInt(v),
            DestCell::Long(v) => ScanArg::Long(v),
            DestCell::ULong(v) => ScanArg::ULong(v),
            DestCell::Size(v) => ScanArg::Size(v),
            DestCell::Str(buf) => ScanArg::Str(Some(buf.as_mut_slice())),
            DestCell::StrSkip => ScanArg::Str(None),
            DestCell::Chars(buf) => ScanArg::Chars(buf.as_mut_slice()),
        }
    }

    /// Final state of the cell, for shell output.
    fn render(&self) -> String {
        match self {
            DestCell::SChar(v) => v.to_string(),
            DestCell::UChar(v) => v.to_string(),
            DestCell::Short(v) => v.to_string(),
            DestCell::UShort(v) => v.to_string(),
            DestCell::Int(v) => v.to_string(),
            DestCell::UInt(v) => v.to_string(),
            DestCell::Long(v) => v.to_string(),
            DestCell::ULong(v) => v.to_string(),
            DestCell::Size(v) => v.to_string(),
            DestCell::Str(buf) => {
                let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
                format!("{:?}", String::from_utf8_lossy(&buf[..end]))
            }
            DestCell::StrSkip => "(skipped)".to_string(),
            DestCell::Chars(buf) => format!("{:?}", String::from_utf8_lossy(buf)),
        }
    }

    /// Compare the cell's final state against the expectation.
    fn matches(&self, expected: &ValueSpec) -> Result<(), String> {
        let ok = match (self, expected) {
            (_, ValueSpec::Untouched) => true,
            (DestCell::SChar(v), ValueSpec::Int(e)) => i64::from(*v) == *e,
            (DestCell::Short(v), ValueSpec::Int(e)) => i64::from(*v) == *e,
            (DestCell::Int(v), ValueSpec::Int(e)) => i64::from(*v) == *e,
            (DestCell::Long(v), ValueSpec::Int(e)) => *v == *e,
            (DestCell::UChar(v), ValueSpec::Uint(e)) => u64::from(*v) == *e,
            (DestCell::UShort(v), ValueSpec::Uint(e)) => u64::from(*v) == *e,
            (DestCell::UInt(v), ValueSpec::Uint(e)) => u64::from(*v) == *e,
            (DestCell::ULong(v), ValueSpec::Uint(e)) => *v == *e,
            (DestCell::Size(v), ValueSpec::Uint(e)) => *v as u64 == *e,
            (DestCell::Str(buf), ValueSpec::Str(e)) => {
                let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
                &buf[..end] == e.as_bytes()
            }
            (DestCell::Chars(buf), ValueSpec::Bytes(e)) => buf == e,
            (DestCell::StrSkip, _) => true,
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(format!("slot holds {self:?}, expected {expected:?}"))
        }
    }
}

/// Expand fixture argument specs into engine slots (`long_long` becomes the
/// two-slot split pair).
fn build_args(specs: &[ArgSpec]) -> Vec<FmtArg<'_>> {
    let mut args = Vec::with_capacity(specs.len());
    for spec in specs {
        match spec {
            ArgSpec::Int(v) => args.push(FmtArg::Int(*v)),
            ArgSpec::Uint(v) => args.push(FmtArg::Uint(*v)),
            ArgSpec::Char(c) => args.push(FmtArg::Char(*c)),
            ArgSpec::Str(s) => args.push(FmtArg::Str(s.as_deref().map(str::as_bytes))),
            ArgSpec::Ptr(p) => args.push(FmtArg::Ptr(*p as usize)),
            ArgSpec::LongLong(v) => args.extend(FmtArg::split_long_long(*v)),
        }
    }
    args
}

/// Execute one case. Format cases additionally check that the discard-mode
/// count agrees with the written length (the idempotence property).
pub fn run_case(case: &FixtureCase) -> CaseOutcome {
    let (passed, detail) = match &case.spec {
        CaseSpec::Format {
            template,
            args,
            expected,
        } => run_format(template, args, expected),
        CaseSpec::Scan {
            template,
            input,
            dests,
            expected_count,
            expected_values,
        } => run_scan(template, input, dests, *expected_count, expected_values),
    };
    CaseOutcome {
        name: case.name.clone(),
        passed,
        detail,
    }
}

fn run_format(template: &str, args: &[ArgSpec], expected: &str) -> (bool, String) {
    let slots = build_args(args);
    let mut out = vec![0u8; expected.len() + 64];
    let written = sprintf(&mut out, template.as_bytes(), &slots);
    let counted = format_length(template.as_bytes(), &slots);

    if counted != written {
        return (
            false,
            format!("discard-mode count {counted} != write-mode count {written}"),
        );
    }
    let got = String::from_utf8_lossy(&out[..written.min(out.len())]).into_owned();
    if got != expected {
        return (false, format!("rendered {got:?}, expected {expected:?}"));
    }
    (true, String::new())
}

fn run_scan(
    template: &str,
    input: &str,
    dests: &[DestSpec],
    expected_count: usize,
    expected_values: &[ValueSpec],
) -> (bool, String) {
    let mut cells: Vec<DestCell> = dests.iter().map(DestCell::new).collect();
    let count = {
        let mut args: Vec<ScanArg<'_>> = cells.iter_mut().map(DestCell::as_arg).collect();
        vsscanf(input.as_bytes(), template.as_bytes(), &mut args)
    };

    if count != expected_count {
        return (
            false,
            format!("stored {count} directives, expected {expected_count}"),
        );
    }
    for (i, (cell, expected)) in cells.iter().zip(expected_values).enumerate() {
        if let Err(detail) = cell.matches(expected) {
            return (false, format!("destination {i}: {detail}"));
        }
    }
    (true, String::new())
}

/// One-off parse for the CLI: allocate the described destinations, run the
/// scan, and report the stored-directive count alongside each destination's
/// final state (rendered for shell output, in slot order).
pub fn scan_once(template: &str, input: &str, dests: &[DestSpec]) -> (usize, Vec<String>) {
    let mut cells: Vec<DestCell> = dests.iter().map(DestCell::new).collect();
    let count = {
        let mut args: Vec<ScanArg<'_>> = cells.iter_mut().map(DestCell::as_arg).collect();
        vsscanf(input.as_bytes(), template.as_bytes(), &mut args)
    };
    let values = cells.iter().map(DestCell::render).collect();
    (count, values)
}

/// Run every case of a set.
pub fn run_set(set: &FixtureSet) -> SetSummary {
    let mut summary = SetSummary {
        total: set.cases.len(),
        ..Default::default()
    };
    for case in &set.cases {
        let outcome = run_case(case);
        if outcome.passed {
            summary.passed += 1;
        }
        summary.outcomes.push(outcome);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FixtureCase;

    #[test]
    fn format_case_passes() {
        let case = FixtureCase {
            name: "basic".into(),
            spec: CaseSpec::Format {
                template: "%d-%s".into(),
                args: vec![ArgSpec::Int(7), ArgSpec::Str(Some("ok".into()))],
                expected: "7-ok".into(),
            },
        };
        let outcome = run_case(&case);
        assert!(outcome.passed, "{}", outcome.detail);
    }

    #[test]
    fn format_case_mismatch_is_reported() {
        let case = FixtureCase {
            name: "wrong".into(),
            spec: CaseSpec::Format {
                template: "%d".into(),
                args: vec![ArgSpec::Int(7)],
                expected: "8".into(),
            },
        };
        let outcome = run_case(&case);
        assert!(!outcome.passed);
        assert!(outcome.detail.contains("rendered"));
    }

    #[test]
    fn scan_case_passes() {
        let case = FixtureCase {
            name: "scan".into(),
            spec: CaseSpec::Scan {
                template: "%d %s".into(),
                input: "42 foo".into(),
                dests: vec![DestSpec::Int, DestSpec::Str(16)],
                expected_count: 2,
                expected_values: vec![ValueSpec::Int(42), ValueSpec::Str("foo".into())],
            },
        };
        let outcome = run_case(&case);
        assert!(outcome.passed, "{}", outcome.detail);
    }

    #[test]
    fn scan_once_reports_count_and_values() {
        let (count, values) = scan_once(
            "%d %s %x",
            "17 sensor 1a2b",
            &[DestSpec::Int, DestSpec::Str(16), DestSpec::UInt],
        );
        assert_eq!(count, 3);
        assert_eq!(values, vec!["17", "\"sensor\"", "6699"]);
    }

    #[test]
    fn scan_once_renders_untouched_and_skipped_slots() {
        let (count, values) = scan_once(
            "%s %d",
            "skipme x",
            &[DestSpec::StrSkip, DestSpec::Int],
        );
        assert_eq!(count, 1);
        assert_eq!(values, vec!["(skipped)", "0"]);
    }

    #[test]
    fn set_summary_counts_failures() {
        let set = FixtureSet {
            version: "v1".into(),
            family: "printf".into(),
            cases: vec![
                FixtureCase {
                    name: "ok".into(),
                    spec: CaseSpec::Format {
                        template: "%u".into(),
                        args: vec![ArgSpec::Uint(9)],
                        expected: "9".into(),
                    },
                },
                FixtureCase {
                    name: "bad".into(),
                    spec: CaseSpec::Format {
                        template: "%u".into(),
                        args: vec![ArgSpec::Uint(9)],
                        expected: "nope".into(),
                    },
                },
            ],
        };
        let summary = run_set(&set);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed, 1);
        assert!(!summary.all_passed());
        assert_eq!(summary.failures().count(), 1);
    }
}
