//! Conformance results and their aggregation.

use std::fmt;

use serde::Serialize;

/// Outcome of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The law held.
    Pass,
    /// Nothing to check, or a non-blocking observation.
    Warning,
    /// The law was violated.
    Failure,
}

impl Severity {
    /// Fixed-width tag used in text reports.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Severity::Pass => "PASS",
            Severity::Warning => "WARN",
            Severity::Failure => "FAIL",
        }
    }
}

/// One law checked against one fixture (or one manifest case).
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Law identifier, e.g. `invariance/labels`.
    pub law: String,
    /// What the law was checked against.
    pub subject: String,
    /// Outcome.
    pub severity: Severity,
    /// Additional lines, typically the identities involved.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl CheckResult {
    fn new(law: impl Into<String>, subject: impl Into<String>, severity: Severity) -> Self {
        Self {
            law: law.into(),
            subject: subject.into(),
            severity,
            details: Vec::new(),
        }
    }

    /// The law held.
    pub fn pass(law: impl Into<String>, subject: impl Into<String>) -> Self {
        Self::new(law, subject, Severity::Pass)
    }

    /// The law was violated.
    pub fn fail(law: impl Into<String>, subject: impl Into<String>) -> Self {
        Self::new(law, subject, Severity::Failure)
    }

    /// A non-blocking observation.
    pub fn warn(law: impl Into<String>, subject: impl Into<String>) -> Self {
        Self::new(law, subject, Severity::Warning)
    }

    /// Passes when `held`, fails otherwise.
    pub fn check(law: impl Into<String>, subject: impl Into<String>, held: bool) -> Self {
        if held {
            Self::pass(law, subject)
        } else {
            Self::fail(law, subject)
        }
    }

    /// Attaches a detail line.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    /// Whether this result blocks conformance.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}", self.severity.tag(), self.law, self.subject)?;
        for detail in &self.details {
            write!(f, "\n       {detail}")?;
        }
        Ok(())
    }
}

/// All results of a suite run.
#[derive(Debug, Default, Serialize)]
pub struct ConformanceReport {
    /// Results in the order the checks ran.
    pub results: Vec<CheckResult>,
}

impl ConformanceReport {
    /// An empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one result.
    pub fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    /// Appends every result of `other`.
    pub fn extend(&mut self, other: ConformanceReport) {
        self.results.extend(other.results);
    }

    /// Number of results with `severity`.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.results.iter().filter(|r| r.severity == severity).count()
    }

    /// Failed results only.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> + '_ {
        self.results.iter().filter(|r| r.is_failure())
    }

    /// Whether no check failed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failures().next().is_none()
    }
}
