//! Ordered-identity combinator.
//!
//! Hashes sequences of identities into a single identity. With a separator,
//! the field separator digest is interleaved between items; without one,
//! items are fed back-to-back, which is only unambiguous because every item
//! is itself a fixed-length digest.

use crate::digest::{self, State, FIELD_SEPARATOR};
use crate::error::Result;
use crate::identity::Identity;
use crate::version::Version;

/// Reserved pre-image of the cycle-break sentinel.
///
/// Not valid UTF-8, so no IRI or literal text digests to the same value.
const CYCLE_BREAK_MARKER: &[u8] = b"\xffibnode:cycle-break\xff";

/// Digest-level building blocks shared by every computation of one version.
#[derive(Debug, Clone, Copy)]
pub struct Combinator {
    version: Version,
    separator: Identity,
    null: Identity,
    sentinel: Identity,
}

impl Combinator {
    /// Builds the combinator for `version` after running the digest self-check.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SelfCheck`] if the digest is unusable.
    pub fn new(version: Version) -> Result<Self> {
        digest::self_check_version(version)?;
        let raw = |bytes: &[u8]| {
            let mut s = State::new(version);
            s.update(bytes);
            Identity::from_digest(s.finalize(), version)
        };
        Ok(Self {
            version,
            separator: raw(FIELD_SEPARATOR),
            null: raw(b""),
            sentinel: raw(CYCLE_BREAK_MARKER),
        })
    }

    /// Version whose digest this combinator uses.
    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    /// The field separator digest.
    #[must_use]
    pub fn separator(&self) -> Identity {
        self.separator
    }

    /// The identity of the empty input.
    #[must_use]
    pub fn null(&self) -> Identity {
        self.null
    }

    /// The cycle-break sentinel.
    #[must_use]
    pub fn sentinel(&self) -> Identity {
        self.sentinel
    }

    /// Digests raw bytes.
    #[must_use]
    pub fn digest(&self, bytes: &[u8]) -> Identity {
        let mut s = State::new(self.version);
        s.update(bytes);
        Identity::from_digest(s.finalize(), self.version)
    }

    /// Hashes identities in the given order.
    pub fn ordered<'a, I>(&self, items: I, separator: bool) -> Identity
    where
        I: IntoIterator<Item = &'a Identity>,
    {
        let mut s = State::new(self.version);
        for (i, item) in items.into_iter().enumerate() {
            debug_assert_eq!(item.version(), self.version);
            if separator && i > 0 {
                s.update(self.separator.as_bytes());
            }
            s.update(item.as_bytes());
        }
        Identity::from_digest(s.finalize(), self.version)
    }

    /// Hashes identities after sorting them by byte value.
    pub fn sorted(&self, mut items: Vec<Identity>, separator: bool) -> Identity {
        items.sort_unstable();
        self.ordered(&items, separator)
    }
}
