//! Cyclic fixtures must be cut the same way under every labelling.

use ibnode::{BlankId, Graph, IdentityFunction};

use crate::fixtures::Fixture;
use crate::report::{CheckResult, ConformanceReport};
use crate::validators::guarded;

const LAW: &str = "cycles/rotation";

/// Labellings tried per fixture.
const ROTATIONS: usize = 8;

/// Rotates blank labels through every cyclic fixture.
///
/// # Errors
///
/// Returns an error if the identity function cannot be built.
pub fn validate(fixtures: &[Fixture]) -> anyhow::Result<ConformanceReport> {
    let function = IdentityFunction::default_function()?;
    let mut report = ConformanceReport::new();
    let mut cyclic = 0;

    for fixture in fixtures {
        let subject = fixture.label();
        let baseline = match function.inspect(&fixture.graph) {
            Ok(inspection) => inspection,
            Err(e) => {
                report.push(CheckResult::fail(LAW, &subject).with_detail(e.to_string()));
                continue;
            }
        };
        if baseline.cut_points.is_empty() {
            continue;
        }
        cyclic += 1;

        report.push(guarded(LAW, &subject, || {
            let mut result = CheckResult::pass(LAW, &subject).with_detail(format!(
                "{} cut point(s), identity {}",
                baseline.cut_points.len(),
                baseline.identity
            ));
            let labels = sorted_labels(&fixture.graph);
            for shift in 1..labels.len().min(ROTATIONS + 1) {
                let rotated = rotate(&fixture.graph, &labels, shift);
                let inspection = function.inspect(&rotated)?;
                if inspection.identity != baseline.identity
                    || inspection.cut_points != baseline.cut_points
                {
                    result = CheckResult::fail(LAW, &subject)
                        .with_detail(format!("shift {shift}: {}", inspection.identity))
                        .with_detail(format!("expected: {}", baseline.identity));
                    break;
                }
            }
            Ok(result)
        }));
    }

    if cyclic == 0 {
        report.push(
            CheckResult::warn(LAW, "fixtures").with_detail("no fixture contains a blank node cycle"),
        );
    }
    Ok(report)
}

fn sorted_labels(graph: &Graph) -> Vec<BlankId> {
    let mut labels: Vec<BlankId> = graph.blank_nodes().into_iter().cloned().collect();
    labels.sort();
    labels
}

/// Gives the i-th label the name of the (i + shift)-th.
fn rotate(graph: &Graph, labels: &[BlankId], shift: usize) -> Graph {
    graph.relabel_blanks(|label| {
        let position = labels.iter().position(|l| l == label).unwrap_or(0);
        BlankId::new(format!("r{}", (position + shift) % labels.len()))
    })
}
