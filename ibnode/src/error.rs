//! Error taxonomy for identity computation.
//!
//! | Kind | Variants | Policy |
//! |------|----------|--------|
//! | Configuration | [`Error::SelfCheck`], [`Error::Config`] | fatal when building an [`IdentityFunction`](crate::IdentityFunction) |
//! | Usage | [`Error::BlankNode`], [`Error::VersionMismatch`], [`Error::MalformedIdentity`], [`Error::UnsupportedTerm`], [`Error::Source`] | abort the call; the caller may recover |
//! | Internal | [`Error::Invariant`] | a bug; never swallowed |
//!
//! Structural warnings (large cycles, dangling blank objects) are not errors;
//! they are reported through `tracing` and processing continues.

use thiserror::Error;

use crate::version::Version;

/// Errors produced by the identity engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The digest primitive failed its startup self-check.
    #[error("digest self-check failed for {version}: {reason}")]
    SelfCheck {
        /// Version whose digest algorithm was rejected.
        version: Version,
        /// Which property the digest violated.
        reason: &'static str,
    },

    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A raw blank node was hashed directly instead of through a graph.
    #[error("blank node _:{0} has no standalone identity; compute it as part of a graph")]
    BlankNode(String),

    /// Identities computed under two algorithm versions were mixed.
    #[error("cannot mix identities from {expected} and {found}")]
    VersionMismatch {
        /// Version of the identity function (or the reference identity).
        expected: Version,
        /// Version of the identity that was supplied.
        found: Version,
    },

    /// The textual form of an identity could not be parsed.
    #[error("malformed identity {text:?}: {reason}")]
    MalformedIdentity {
        /// The rejected input.
        text: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A term kind outside the triple data model (quoted triple, variable, ...).
    #[error("unsupported term in {position} position: {term}")]
    UnsupportedTerm {
        /// `subject`, `predicate`, `object` or `datatype`.
        position: &'static str,
        /// Debug rendering of the term.
        term: String,
    },

    /// The external triple source reported an error.
    #[error("triple source failed: {0}")]
    Source(String),

    /// An internal invariant of the resolver was violated.
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
