//! The digest primitive.
//!
//! Every identity in the crate is the output of a [`Cypher`]. Two
//! implementations exist ([`Sha256Cypher`], [`Blake3Cypher`]); the active
//! one is selected by the [`Version`] of the identity function.
//!
//! Before an identity function is used, [`self_check`] verifies that the
//! digest is usable for canonicalization. A digest that fails is a fatal
//! configuration error.

use sha2::Digest as _;

use crate::error::{Error, Result};
use crate::version::{DigestAlgorithm, Version};

/// Length in bytes of every digest.
pub const DIGEST_LEN: usize = 32;

/// Pre-image of the field separator digest.
pub(crate) const FIELD_SEPARATOR: &[u8] = b" ";

/// An incremental fixed-output hash function.
pub trait Cypher: Default {
    /// Feeds bytes into the state.
    fn update(&mut self, bytes: &[u8]);

    /// Consumes the state and returns the digest.
    fn finalize(self) -> [u8; DIGEST_LEN];

    /// Digests a single byte string.
    fn digest(bytes: &[u8]) -> [u8; DIGEST_LEN] {
        let mut c = Self::default();
        c.update(bytes);
        c.finalize()
    }
}

/// SHA-256.
#[derive(Default, Clone)]
pub struct Sha256Cypher(sha2::Sha256);

impl Cypher for Sha256Cypher {
    fn update(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    fn finalize(self) -> [u8; DIGEST_LEN] {
        let mut out = [0u8; DIGEST_LEN];
        out.copy_from_slice(&self.0.finalize());
        out
    }
}

/// BLAKE3 (32-byte output).
#[derive(Default, Clone)]
pub struct Blake3Cypher(blake3::Hasher);

impl Cypher for Blake3Cypher {
    fn update(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    fn finalize(self) -> [u8; DIGEST_LEN] {
        *self.0.finalize().as_bytes()
    }
}

/// Digest state for whichever algorithm a version selects.
pub(crate) enum State {
    Sha256(Sha256Cypher),
    Blake3(Box<Blake3Cypher>),
}

impl State {
    pub(crate) fn new(version: Version) -> Self {
        match version.algorithm() {
            DigestAlgorithm::Sha256 => State::Sha256(Sha256Cypher::default()),
            DigestAlgorithm::Blake3 => State::Blake3(Box::default()),
        }
    }

    pub(crate) fn update(&mut self, bytes: &[u8]) {
        match self {
            State::Sha256(c) => c.update(bytes),
            State::Blake3(c) => c.update(bytes),
        }
    }

    pub(crate) fn finalize(self) -> [u8; DIGEST_LEN] {
        match self {
            State::Sha256(c) => c.finalize(),
            State::Blake3(c) => c.finalize(),
        }
    }
}

/// Runs the startup self-check for the digest a version selects.
///
/// # Errors
///
/// Returns [`Error::SelfCheck`] if the digest is unusable.
pub fn self_check_version(version: Version) -> Result<()> {
    match version.algorithm() {
        DigestAlgorithm::Sha256 => self_check::<Sha256Cypher>(version),
        DigestAlgorithm::Blake3 => self_check::<Blake3Cypher>(version),
    }
}

/// Verifies that `C` is usable for canonicalization.
///
/// A streaming digest is invariant to how its input is split, so the update
/// boundary check runs the way every multi-part hash in this crate runs:
/// with the field separator digest between parts.
///
/// # Errors
///
/// Returns [`Error::SelfCheck`] naming the first violated property.
pub fn self_check<C: Cypher>(version: Version) -> Result<()> {
    let fail = |reason| Err(Error::SelfCheck { version, reason });

    if C::default().finalize() != C::default().finalize() {
        return fail("no stable starting point");
    }

    let separator = C::digest(FIELD_SEPARATOR);
    let mut split = C::default();
    split.update(b"12");
    split.update(&separator);
    split.update(b"3");
    if split.finalize() == C::digest(b"123") {
        return fail("invariant to the number of updates");
    }

    let mut ab = C::default();
    ab.update(b"a");
    ab.update(b"b");
    let mut ba = C::default();
    ba.update(b"b");
    ba.update(b"a");
    if ab.finalize() == ba.finalize() {
        return fail("invariant to update order");
    }

    if C::digest(b"identity") != C::digest(b"identity") {
        return fail("not deterministic");
    }

    if C::digest(b"") == C::digest(FIELD_SEPARATOR) {
        return fail("insensitive to input");
    }

    Ok(())
}
