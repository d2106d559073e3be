//! ibnode conformance suite.
//!
//! Loads a directory of Turtle and N-Triples fixtures and checks the laws
//! every identity function must satisfy.
//!
//! # Laws
//!
//! | Group | Law |
//! |-------|-----|
//! | `formats` | a Turtle fixture and its N-Triples twin have the same identity |
//! | `invariance` | identity is deterministic, independent of triple order and of blank labels |
//! | `cycles` | every label assignment of a cyclic fixture yields the same identity and cut points |
//! | `versions` | each version tags its identities and refuses identities of the others |
//! | `manifest` | pairs of fixtures declared equal or distinct in `manifest.json` are so |
//!
//! # Entry Point
//!
//! ```no_run
//! use ibnode_conformance::{run_all, SuitePaths};
//!
//! let report = run_all(&SuitePaths::bundled())?;
//! assert!(report.all_passed());
//! # Ok::<(), anyhow::Error>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

pub mod fixtures;
pub mod report;
pub mod validators;

pub use report::{CheckResult, ConformanceReport, Severity};

/// Paths required by the conformance runner.
#[derive(Debug, Clone)]
pub struct SuitePaths {
    /// Directory holding the fixtures and `manifest.json`.
    pub fixtures: PathBuf,
}

impl SuitePaths {
    /// The fixtures shipped with this crate.
    #[must_use]
    pub fn bundled() -> Self {
        Self {
            fixtures: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures"),
        }
    }
}

/// Runs all validators and returns the aggregated report.
///
/// Validators run in this order:
/// 1. Format agreement between Turtle and N-Triples twins
/// 2. Invariance under evaluation, triple order and blank labels
/// 3. Cycle canonicalisation
/// 4. Version separation
/// 5. Manifest cases
///
/// # Errors
///
/// Returns an error if a fixture cannot be read or parsed, or if the
/// manifest is malformed.
pub fn run_all(paths: &SuitePaths) -> anyhow::Result<ConformanceReport> {
    let fixtures = fixtures::discover(&paths.fixtures)?;
    tracing::info!(count = fixtures.len(), dir = %paths.fixtures.display(), "loaded fixtures");

    let mut report = ConformanceReport::new();
    report.extend(validators::formats::validate(&fixtures)?);
    report.extend(validators::invariance::validate(&fixtures)?);
    report.extend(validators::cycles::validate(&fixtures)?);
    report.extend(validators::versions::validate(&fixtures)?);
    report.extend(validators::manifest::validate(&paths.fixtures)?);
    Ok(report)
}
