//! Identity function configuration.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::term::Iri;
use crate::version::Version;

/// Default component size above which a cycle is reported as large.
pub const DEFAULT_LARGE_CYCLE_WARNING: usize = 1000;

/// Settings for an [`IdentityFunction`](crate::IdentityFunction).
///
/// Every field has a default, so a configuration document only names what it
/// changes. Unknown fields are rejected.
///
/// ```
/// use ibnode::{Config, Version};
///
/// let config = Config::from_json(r#"{
///     "version": "ibn1-blake3",
///     "symmetric_predicates": ["http://www.w3.org/2002/07/owl#sameAs"]
/// }"#).unwrap();
/// assert_eq!(config.version, Version::Ibn1Blake3);
/// assert!(!config.debug);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Algorithm version.
    pub version: Version,
    /// Predicates whose subject and object may be swapped.
    pub symmetric_predicates: BTreeSet<Iri>,
    /// Record provenance for every computed sub-identity.
    pub debug: bool,
    /// Cache partition; `None` shares the global partition of the version.
    pub cache_scope: Option<String>,
    /// Cyclic component size above which a warning is logged.
    pub large_cycle_warning: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: Version::default(),
            symmetric_predicates: BTreeSet::new(),
            debug: false,
            cache_scope: None,
            large_cycle_warning: DEFAULT_LARGE_CYCLE_WARNING,
        }
    }
}

impl Config {
    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] on malformed JSON, an unknown field, or
    /// an unknown version tag.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Whether `predicate` was declared symmetric.
    #[must_use]
    pub fn is_symmetric(&self, predicate: &Iri) -> bool {
        self.symmetric_predicates.contains(predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(Config::from_json("{}").ok(), Some(Config::default()));
    }

    #[test]
    fn reads_every_field() {
        let config = Config::from_json(
            r#"{
                "version": "ibn1-blake3",
                "symmetric_predicates": ["http://example.org/knows"],
                "debug": true,
                "cache_scope": "worker-1",
                "large_cycle_warning": 10
            }"#,
        );
        let Ok(config) = config else {
            panic!("valid document rejected: {config:?}");
        };
        assert_eq!(config.version, Version::Ibn1Blake3);
        assert!(config.is_symmetric(&Iri::new("http://example.org/knows")));
        assert!(config.debug);
        assert_eq!(config.cache_scope.as_deref(), Some("worker-1"));
        assert_eq!(config.large_cycle_warning, 10);
    }

    #[test]
    fn rejects_unknown_fields_and_versions() {
        assert!(matches!(Config::from_json(r#"{"verison": "ibn1-sha256"}"#), Err(Error::Config(_))));
        assert!(matches!(Config::from_json(r#"{"version": "ibn9"}"#), Err(Error::Config(_))));
    }
}
