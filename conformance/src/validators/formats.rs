//! Turtle and N-Triples twins must agree.

use ibnode::IdentityFunction;

use crate::fixtures::{self, Fixture};
use crate::report::{CheckResult, ConformanceReport, Severity};
use crate::validators::guarded;

const LAW: &str = "formats/twins";

/// Checks every fixture that exists in more than one syntax.
///
/// # Errors
///
/// Returns an error if the identity function cannot be built.
pub fn validate(fixtures: &[Fixture]) -> anyhow::Result<ConformanceReport> {
    let function = IdentityFunction::default_function()?;
    let mut report = ConformanceReport::new();

    for (name, group) in fixtures::twins(fixtures) {
        if group.len() < 2 {
            continue;
        }
        report.push(guarded(LAW, name, || {
            let mut result = CheckResult::pass(LAW, name);
            let mut first = None;
            for fixture in &group {
                let identity = function.identify(&fixture.graph)?;
                result = result.with_detail(format!("{}: {identity}", fixture.label()));
                match first {
                    None => first = Some(identity),
                    Some(expected) if expected != identity => {
                        result.severity = Severity::Failure;
                    }
                    Some(_) => {}
                }
            }
            Ok(result)
        }));
    }

    if report.results.is_empty() {
        report.push(
            CheckResult::warn(LAW, "fixtures")
                .with_detail("no fixture is written in both Turtle and N-Triples"),
        );
    }
    Ok(report)
}
