//! `ibnode-conformance`: checks the identity laws over a fixture directory.
//!
//! **Usage:**
//! ```text
//! ibnode-conformance [--fixtures <path>] [--json]
//! ```
//!
//! Log verbosity follows `RUST_LOG`. Exits non-zero if any check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use ibnode_conformance::{run_all, Severity, SuitePaths};
use tracing_subscriber::EnvFilter;

/// Run the ibnode conformance suite.
#[derive(Parser)]
#[command(
    name = "ibnode-conformance",
    about = "Check identity blank node laws against Turtle and N-Triples fixtures"
)]
struct Args {
    /// Fixture directory (default: the fixtures bundled with the suite).
    #[arg(long)]
    fixtures: Option<PathBuf>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let paths = match args.fixtures {
        Some(fixtures) => SuitePaths { fixtures },
        None => SuitePaths::bundled(),
    };

    let report = run_all(&paths)?;
    let failed = report.count(Severity::Failure);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("ibnode Conformance Report");
        println!("=========================");
        println!();
        for result in &report.results {
            println!("{result}");
        }
        println!();
        println!(
            "Summary: {} passed, {} warnings, {} failed",
            report.count(Severity::Pass),
            report.count(Severity::Warning),
            failed
        );
    }

    if failed > 0 {
        eprintln!("Conformance FAILED: {failed} check(s) did not pass.");
        process::exit(1);
    }

    if !args.json {
        println!("Conformance PASSED.");
    }
    Ok(())
}
