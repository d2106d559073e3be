//! Algorithm version tags.
//!
//! A version pins everything that influences an identity: the digest
//! algorithm, the combinator layout, and the cycle cut-point key order.
//! Changing any of these changes every identity, so each change gets a new
//! tag and identities from different tags are never compared.
//!
//! # Wire format (`ibn1-*`)
//!
//! ```text
//! sep        = H(" ")
//! null       = H("")
//! sentinel   = H(0xFF "ibnode:cycle-break" 0xFF)
//! node(iri)  = H(iri)
//! literal    = H(H(value) ‖ node(datatype) ‖ H(lang or ""))
//! pair(p, o) = H(node(p) ‖ sep ‖ o)
//! condensed  = H(sort(pairs)…)
//! embedded   = H(node(s) ‖ condensed)
//! graph      = H(sort(free heads ∪ cut points ∪ embedded named subjects)…)
//! ```
//!
//! Cut-point key, compared in order: elementary cycle count (descending),
//! pending triple count, resolved pair count, sorted pending predicates,
//! sorted resolved pairs, colour-refinement signature, blank label.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which digest function backs a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    /// SHA-256 via the `sha2` crate.
    Sha256,
    /// BLAKE3 via the `blake3` crate.
    Blake3,
}

/// An identity algorithm version.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Version {
    /// First revision, SHA-256 digests.
    #[default]
    #[serde(rename = "ibn1-sha256")]
    Ibn1Sha256,
    /// First revision, BLAKE3 digests.
    #[serde(rename = "ibn1-blake3")]
    Ibn1Blake3,
}

impl Version {
    /// All supported versions, oldest first.
    pub const ALL: [Version; 2] = [Version::Ibn1Sha256, Version::Ibn1Blake3];

    /// Returns the tag used in the textual form of identities.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Version::Ibn1Sha256 => "ibn1-sha256",
            Version::Ibn1Blake3 => "ibn1-blake3",
        }
    }

    /// Returns the digest algorithm this version uses.
    #[must_use]
    pub fn algorithm(self) -> DigestAlgorithm {
        match self {
            Version::Ibn1Sha256 => DigestAlgorithm::Sha256,
            Version::Ibn1Blake3 => DigestAlgorithm::Blake3,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Version {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::ALL
            .into_iter()
            .find(|v| v.tag() == s)
            .ok_or_else(|| crate::Error::MalformedIdentity {
                text: s.to_string(),
                reason: "unknown version tag",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for v in Version::ALL {
            assert_eq!(v.tag().parse::<Version>().ok(), Some(v));
        }
        assert!("ibn0-md5".parse::<Version>().is_err());
    }

    #[test]
    fn serde_uses_tags() {
        let json = serde_json::to_string(&Version::Ibn1Blake3).ok();
        assert_eq!(json.as_deref(), Some("\"ibn1-blake3\""));
    }
}
