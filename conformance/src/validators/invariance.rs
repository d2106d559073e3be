//! Identity must not depend on evaluation, triple order or blank labels.

use ibnode::{BlankId, Graph, IdentityFunction};

use crate::fixtures::Fixture;
use crate::report::{CheckResult, ConformanceReport};
use crate::validators::guarded;

/// Checks the invariance laws on every fixture.
///
/// # Errors
///
/// Returns an error if an identity function cannot be built.
pub fn validate(fixtures: &[Fixture]) -> anyhow::Result<ConformanceReport> {
    let function = IdentityFunction::default_function()?;
    let mut report = ConformanceReport::new();

    for fixture in fixtures {
        let subject = fixture.label();
        let graph = &fixture.graph;

        report.push(guarded("invariance/deterministic", &subject, || {
            let fresh = IdentityFunction::default_function()?;
            let first = function.identify(graph)?;
            let again = function.identify(graph)?;
            let uncached = fresh.identify(graph)?;
            Ok(CheckResult::check(
                "invariance/deterministic",
                &subject,
                first == again && first == uncached,
            )
            .with_detail(format!("cached: {first}"))
            .with_detail(format!("fresh:  {uncached}")))
        }));

        report.push(guarded("invariance/order", &subject, || {
            let reversed = reverse(graph);
            let expected = function.identify(graph)?;
            let found = function.identify(&reversed)?;
            Ok(CheckResult::check("invariance/order", &subject, expected == found))
        }));

        if !graph.blank_nodes().is_empty() {
            report.push(guarded("invariance/labels", &subject, || {
                let relabeled = graph.relabel_blanks(mirror);
                let expected = function.identify(graph)?;
                let found = function.identify(&relabeled)?;
                Ok(CheckResult::check("invariance/labels", &subject, expected == found)
                    .with_detail(format!("original:  {expected}"))
                    .with_detail(format!("relabeled: {found}")))
            }));
        }

        report.push(guarded("invariance/identity-of-identity", &subject, || {
            let identity = function.identify(graph)?;
            let rehashed = function.identity_of(identity)?;
            Ok(CheckResult::check(
                "invariance/identity-of-identity",
                &subject,
                identity == rehashed,
            ))
        }));
    }
    Ok(report)
}

/// The same triples inserted in reverse order.
fn reverse(graph: &Graph) -> Graph {
    let triples: Vec<_> = graph.iter().cloned().collect();
    triples.into_iter().rev().collect()
}

/// An injective relabelling that changes every label.
fn mirror(label: &BlankId) -> BlankId {
    let reversed: String = label.as_str().chars().rev().collect();
    BlankId::new(format!("m{reversed}"))
}
