//! CLI entrypoint for the barestdio conformance harness.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use barestdio_harness::{DestSpec, FixtureSet, run_set, scan_once};

/// Conformance tooling for barestdio.
#[derive(Debug, Parser)]
#[command(name = "barestdio-harness")]
#[command(about = "Conformance testing harness for barestdio")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run every case in one or more fixture JSON files.
    Verify {
        /// Fixture file paths.
        #[arg(long, required = true, num_args = 1..)]
        fixture: Vec<PathBuf>,
        /// Print per-case outcomes, not just the summary.
        #[arg(long)]
        verbose: bool,
    },
    /// Format a template with integer arguments and print the result.
    Format {
        /// Template string (percent directives).
        template: String,
        /// Integer argument slots, in order.
        args: Vec<i32>,
    },
    /// Parse an input string against a template and print the stored values.
    Scan {
        /// Template string (percent directives).
        template: String,
        /// Input text to parse.
        input: String,
        /// Destination slots, in order: `int`, `uint`, `long`, `ulong`,
        /// `short`, `ushort`, `schar`, `uchar`, `size`, `str:<cap>`,
        /// `chars:<cap>`, or `skip`.
        #[arg(long = "dest", required = true, num_args = 1..)]
        dests: Vec<DestSpec>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Command::Verify { fixture, verbose } => verify(&fixture, verbose),
        Command::Format { template, args } => format_once(&template, &args),
        Command::Scan {
            template,
            input,
            dests,
        } => scan(&template, &input, &dests),
    }
}

fn verify(paths: &[PathBuf], verbose: bool) -> ExitCode {
    let mut all_passed = true;
    for path in paths {
        let set = match FixtureSet::from_file(path) {
            Ok(set) => set,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        };
        let summary = run_set(&set);
        println!(
            "{} ({}): {}/{} passed",
            path.display(),
            set.family,
            summary.passed,
            summary.total
        );
        if verbose {
            for outcome in &summary.outcomes {
                let mark = if outcome.passed { "ok " } else { "FAIL" };
                println!("  [{mark}] {}", outcome.name);
            }
        }
        for failure in summary.failures() {
            println!("  FAIL {}: {}", failure.name, failure.detail);
        }
        all_passed &= summary.all_passed();
    }
    if all_passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn format_once(template: &str, args: &[i32]) -> ExitCode {
    use barestdio_core::stdio::printf::{FmtArg, sprintf};

    let slots: Vec<FmtArg<'_>> = args.iter().map(|&v| FmtArg::Int(v)).collect();
    let mut out = vec![0u8; 4096];
    let n = sprintf(&mut out, template.as_bytes(), &slots);
    println!("{}", String::from_utf8_lossy(&out[..n.min(out.len())]));
    ExitCode::SUCCESS
}

fn scan(template: &str, input: &str, dests: &[DestSpec]) -> ExitCode {
    let (count, values) = scan_once(template, input, dests);
    println!("stored {count}");
    for (i, value) in values.iter().enumerate() {
        println!("  [{i}] {value}");
    }
    ExitCode::SUCCESS
}
