//! Every version tags its identities and rejects the others'.

use ibnode::{Error, IdentityFunction, Version};

use crate::fixtures::Fixture;
use crate::report::{CheckResult, ConformanceReport, Severity};
use crate::validators::guarded;

/// Computes every fixture under every version.
///
/// # Errors
///
/// Returns an error if an identity function cannot be built.
pub fn validate(fixtures: &[Fixture]) -> anyhow::Result<ConformanceReport> {
    let functions = Version::ALL
        .into_iter()
        .map(IdentityFunction::for_version)
        .collect::<ibnode::Result<Vec<_>>>()?;
    let mut report = ConformanceReport::new();

    for fixture in fixtures {
        let subject = fixture.label();

        report.push(guarded("versions/tagged", &subject, || {
            let mut result = CheckResult::pass("versions/tagged", &subject);
            for function in &functions {
                let identity = function.identify(&fixture.graph)?;
                let text = identity.to_string();
                result = result.with_detail(text.clone());
                if identity.version() != function.version()
                    || !text.starts_with(&format!("{}:", function.version().tag()))
                {
                    result.severity = Severity::Failure;
                }
            }
            Ok(result)
        }));

        report.push(guarded("versions/separated", &subject, || {
            let identities = functions
                .iter()
                .map(|f| f.identify(&fixture.graph))
                .collect::<ibnode::Result<Vec<_>>>()?;
            let mut held = true;
            for (i, function) in functions.iter().enumerate() {
                for (j, other) in identities.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    held &= other.as_bytes() != identities[i].as_bytes();
                    held &= matches!(
                        function.check(other, &fixture.graph),
                        Err(Error::VersionMismatch { .. })
                    );
                }
            }
            Ok(CheckResult::check("versions/separated", &subject, held))
        }));
    }
    Ok(report)
}
