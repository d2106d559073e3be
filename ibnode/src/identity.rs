//! The identity value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::digest::DIGEST_LEN;
use crate::error::{Error, Result};
use crate::version::Version;

/// A fixed-length digest identifying a value or a (sub)graph.
///
/// Identities order by digest bytes, which is the order used for every
/// canonical sort. The version tag travels with the digest so identities
/// computed under different algorithms are never confused.
///
/// The textual form is `<version-tag>:<hex>`:
///
/// ```
/// use ibnode::{IdentityFunction, Identity, Value};
///
/// let f = IdentityFunction::default_function().unwrap();
/// let id = f.identity_of(Value::text("hello")).unwrap();
/// let text = id.to_string();
/// assert!(text.starts_with("ibn1-sha256:"));
/// assert_eq!(text.parse::<Identity>().unwrap(), id);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity {
    digest: [u8; DIGEST_LEN],
    version: Version,
}

impl Identity {
    /// Wraps a digest output. Only the digest primitive calls this.
    pub(crate) fn from_digest(digest: [u8; DIGEST_LEN], version: Version) -> Self {
        Self { digest, version }
    }

    /// Returns the digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.digest
    }

    /// Returns the algorithm version this identity was computed under.
    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns the digest as lowercase hex.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.digest)
    }

    /// Reloads a previously computed identity from its hex digest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedIdentity`] unless `digits` is exactly 64 hex
    /// digits.
    pub fn from_hex(version: Version, digits: &str) -> Result<Self> {
        let malformed = |reason| Error::MalformedIdentity {
            text: digits.to_string(),
            reason,
        };
        if digits.len() != DIGEST_LEN * 2 {
            return Err(malformed("expected 64 hex digits"));
        }
        let mut digest = [0u8; DIGEST_LEN];
        hex::decode_to_slice(digits, &mut digest).map_err(|_| malformed("invalid hex digit"))?;
        Ok(Self { digest, version })
    }

    /// Fails with [`Error::VersionMismatch`] unless `other` shares this version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VersionMismatch`] when the versions differ.
    pub fn ensure_same_version(&self, other: &Identity) -> Result<()> {
        if self.version == other.version {
            Ok(())
        } else {
            Err(Error::VersionMismatch {
                expected: self.version,
                found: other.version,
            })
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.version, self.to_hex())
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // short form; the full digest is rarely useful in test output
        let digits = self.to_hex();
        write!(f, "Identity({}:{}…)", self.version, &digits[..12])
    }
}

impl FromStr for Identity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (tag, digits) = s.split_once(':').ok_or_else(|| Error::MalformedIdentity {
            text: s.to_string(),
            reason: "missing version tag",
        })?;
        Identity::from_hex(tag.parse()?, digits)
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(byte: u8, version: Version) -> Identity {
        Identity::from_digest([byte; DIGEST_LEN], version)
    }

    #[test]
    fn orders_by_digest_bytes() {
        let mut ids = vec![id(3, Version::Ibn1Sha256), id(1, Version::Ibn1Sha256), id(2, Version::Ibn1Sha256)];
        ids.sort();
        let firsts: Vec<u8> = ids.iter().map(|i| i.as_bytes()[0]).collect();
        assert_eq!(firsts, vec![1, 2, 3]);
    }

    #[test]
    fn text_round_trip() {
        let a = id(0xab, Version::Ibn1Blake3);
        let text = a.to_string();
        assert_eq!(text, format!("ibn1-blake3:{}", "ab".repeat(32)));
        assert_eq!(text.parse::<Identity>().ok(), Some(a));
    }

    #[test]
    fn rejects_malformed_text() {
        assert!("abab".parse::<Identity>().is_err());
        assert!("ibn1-sha256:abab".parse::<Identity>().is_err());
        assert!(format!("ibn1-sha256:{}", "zz".repeat(32)).parse::<Identity>().is_err());
        assert!(format!("nope:{}", "00".repeat(32)).parse::<Identity>().is_err());
    }

    #[test]
    fn hex_digits_only() {
        let upper = Identity::from_hex(Version::Ibn1Sha256, &"AB".repeat(32));
        assert_eq!(upper.ok(), Some(id(0xab, Version::Ibn1Sha256)));
        // sign characters and multi-byte text of the right length
        let signed = format!("+f{}", "00".repeat(31));
        assert!(matches!(
            Identity::from_hex(Version::Ibn1Sha256, &signed),
            Err(Error::MalformedIdentity { .. })
        ));
        let wide = format!("é{}", "0".repeat(62));
        assert!(Identity::from_hex(Version::Ibn1Sha256, &wide).is_err());
        assert_eq!(id(7, Version::Ibn1Sha256).to_hex(), "07".repeat(32));
    }

    #[test]
    fn version_mismatch_is_reported() {
        let a = id(1, Version::Ibn1Sha256);
        let b = id(1, Version::Ibn1Blake3);
        assert!(a.ensure_same_version(&a).is_ok());
        assert!(matches!(
            a.ensure_same_version(&b),
            Err(Error::VersionMismatch { expected: Version::Ibn1Sha256, found: Version::Ibn1Blake3 })
        ));
    }

    #[test]
    fn serializes_as_text() {
        let a = id(0, Version::Ibn1Sha256);
        let json = serde_json::to_string(&a).ok();
        assert_eq!(json, Some(format!("\"{a}\"")));
        let back: Option<Identity> = json.and_then(|j| serde_json::from_str(&j).ok());
        assert_eq!(back, Some(a));
    }
}
