//! Identity blank nodes: content-addressable identities for RDF graphs.
//!
//! An [`IdentityFunction`] maps a [`Graph`] to a fixed-length [`Identity`].
//! Two graphs with the same content get the same identity regardless of
//! triple order, the labels chosen for blank nodes, or the syntax they were
//! read from.
//!
//! Blank nodes have no identity of their own. Each one is identified by the
//! sorted set of `(predicate, object)` pairs it is the subject of, resolved
//! bottom-up; reference cycles between blank nodes are broken at a cut point
//! chosen from the structure of the cycle, never from its labels.
//!
//! # Pipeline
//!
//! ```text
//! Graph ─► partition ─► resolve ⇄ cycle ─► aggregate ─► Identity
//!               │           │                  │
//!               └───── node hasher + cache ────┘
//!                           │
//!                   combinator ─► digest
//! ```
//!
//! # Versions
//!
//! | Tag | Digest | Notes |
//! |-----|--------|-------|
//! | `ibn1-sha256` | SHA-256 | default |
//! | `ibn1-blake3` | BLAKE3 | |
//!
//! The tag is part of every identity and every cache key. Identities of
//! different versions never compare equal and mixing them is an error.
//!
//! # Example
//!
//! ```
//! use ibnode::{Graph, IdentityFunction, Literal, Node, Subject, Triple};
//!
//! let f = IdentityFunction::default_function()?;
//! let p = "http://example.org/p";
//! let cycle = |x: &str, y: &str| -> Graph {
//!     [
//!         Triple::new(Subject::blank(x), p, Node::blank(y)),
//!         Triple::new(Subject::blank(y), p, Node::blank(x)),
//!         Triple::new(Subject::blank(x), p, Literal::simple("tip")),
//!     ]
//!     .into_iter()
//!     .collect()
//! };
//! assert_eq!(f.identify(&cycle("a", "b"))?, f.identify(&cycle("m", "n"))?);
//! # Ok::<(), ibnode::Error>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

// Digest primitive and version tags
pub mod digest;
pub mod version;

// Identity values and the combinator that builds them
pub mod combine;
pub mod identity;

// Data model
pub mod graph;
pub mod term;

// Engine: hashing, partitioning, fixed point, cycle breaking, aggregation
mod aggregate;
pub mod cache;
mod cycle;
mod hasher;
mod partition;
mod resolve;

// Debug-mode provenance
pub mod provenance;

// Configuration, errors, and entry points
pub mod config;
pub mod error;
mod function;

// sophia adapter
#[cfg(feature = "sophia")]
mod sophia;

pub use aggregate::{Inspection, SubjectIdentity};
pub use cache::{CacheStats, IdentityCache};
pub use config::Config;
pub use cycle::MAX_CYCLES;
pub use error::{Error, Result};
pub use function::{IdentityBNode, IdentityFunction};
pub use graph::Graph;
pub use hasher::Value;
pub use identity::Identity;
pub use provenance::{Origin, Provenance};
pub use term::{BlankId, Iri, Literal, Node, Subject, Triple};
pub use version::Version;
