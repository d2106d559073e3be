//! Conformance validators, one module per law group.

pub mod cycles;
pub mod formats;
pub mod invariance;
pub mod manifest;
pub mod versions;

use crate::report::CheckResult;

/// Runs a check, turning an engine error into a failure of `law`.
pub(crate) fn guarded(
    law: &str,
    subject: &str,
    check: impl FnOnce() -> ibnode::Result<CheckResult>,
) -> CheckResult {
    match check() {
        Ok(result) => result,
        Err(e) => CheckResult::fail(law, subject).with_detail(e.to_string()),
    }
}
