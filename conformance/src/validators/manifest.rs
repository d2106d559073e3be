//! Declared equalities and distinctions between fixtures.
//!
//! `manifest.json` lists pairs of fixture files, relative to the fixture
//! directory, that must or must not share an identity:
//!
//! ```json
//! {
//!   "cases": [
//!     {
//!       "name": "symmetric knows",
//!       "left": "cases/knows-ab.nt",
//!       "right": "cases/knows-ba.nt",
//!       "expect": "equal",
//!       "symmetric_predicates": ["http://xmlns.com/foaf/0.1/knows"]
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use anyhow::{anyhow, Context};
use ibnode::IdentityFunction;
use serde::Deserialize;

use crate::fixtures::{self, Syntax};
use crate::report::{CheckResult, ConformanceReport};

const LAW: &str = "manifest";

/// File name of the manifest inside the fixture directory.
pub const MANIFEST: &str = "manifest.json";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    cases: Vec<Case>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Case {
    name: String,
    left: String,
    right: String,
    expect: Expect,
    #[serde(default)]
    symmetric_predicates: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Expect {
    Equal,
    Distinct,
}

/// Runs every case of `dir/manifest.json`.
///
/// # Errors
///
/// Returns an error if the manifest is unreadable or malformed, or if a
/// case names a file that cannot be parsed.
pub fn validate(dir: &Path) -> anyhow::Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    let path = dir.join(MANIFEST);
    if !path.exists() {
        report.push(CheckResult::warn(LAW, MANIFEST).with_detail("no manifest found"));
        return Ok(report);
    }
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let manifest: Manifest = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    for case in manifest.cases {
        let mut function = IdentityFunction::default_function()?;
        for predicate in &case.symmetric_predicates {
            function = function.with_symmetric(predicate.as_str());
        }
        let left = load(dir, &case.left)?;
        let right = load(dir, &case.right)?;
        let left_id = function.identify(&left);
        let right_id = function.identify(&right);
        let result = match (left_id, right_id) {
            (Ok(l), Ok(r)) => {
                let held = match case.expect {
                    Expect::Equal => l == r,
                    Expect::Distinct => l != r,
                };
                CheckResult::check(LAW, &case.name, held)
                    .with_detail(format!("{}: {l}", case.left))
                    .with_detail(format!("{}: {r}", case.right))
            }
            (Err(e), _) | (_, Err(e)) => CheckResult::fail(LAW, &case.name).with_detail(e.to_string()),
        };
        report.push(result);
    }
    Ok(report)
}

fn load(dir: &Path, file: &str) -> anyhow::Result<ibnode::Graph> {
    let path = dir.join(file);
    let syntax = Syntax::from_path(&path).ok_or_else(|| anyhow!("Unknown syntax for {file}"))?;
    fixtures::parse(&path, syntax)
}
