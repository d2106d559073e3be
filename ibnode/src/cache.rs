//! Memoized sub-identities.
//!
//! The cache is an explicit object shared behind an `Arc`; there is no
//! process-wide state. Keys carry the algorithm version, so an entry written
//! under one version can never answer a lookup made under another.
//!
//! Only values whose identity is independent of any surrounding graph are
//! cached: named nodes, literals, text, bytes, and `(predicate, object
//! identity)` pairs. Blank node identities are never cached; their labels
//! mean nothing outside one computation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;

use crate::identity::Identity;
use crate::term::{Iri, Literal};
use crate::version::Version;

/// Partition of the cache a computation reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// Shared by every computation of the same version.
    #[default]
    Global,
    /// A caller-chosen partition, e.g. one per worker or per source graph.
    Named(Arc<str>),
}

impl Scope {
    /// Builds a scope from an optional name.
    pub fn from_name(name: Option<&str>) -> Self {
        name.map_or(Scope::Global, |n| Scope::Named(Arc::from(n)))
    }
}

/// How the cached bytes are to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Treat {
    /// Raw bytes.
    Bytes,
    /// UTF-8 text.
    Text,
    /// A named node's IRI.
    Named,
    /// A literal (value, datatype, language).
    Literal,
    /// A predicate followed by an object identity.
    Pair,
}

/// A cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    version: Version,
    scope: Scope,
    treat: Treat,
    value: Box<[u8]>,
}

impl CacheKey {
    /// Key for raw bytes or text.
    pub fn raw(version: Version, scope: Scope, treat: Treat, value: &[u8]) -> Self {
        Self {
            version,
            scope,
            treat,
            value: value.into(),
        }
    }

    /// Key for a named node.
    pub fn named(version: Version, scope: Scope, iri: &Iri) -> Self {
        Self::raw(version, scope, Treat::Named, iri.as_str().as_bytes())
    }

    /// Key for a literal. Fields are length-prefixed so distinct literals
    /// never share an encoding.
    pub fn literal(version: Version, scope: Scope, literal: &Literal) -> Self {
        let capacity = literal.value().len() + literal.datatype().as_str().len() + 24;
        let mut value = Vec::with_capacity(capacity);
        push_field(&mut value, literal.value().as_bytes());
        push_field(&mut value, literal.datatype().as_str().as_bytes());
        match literal.language() {
            Some(lang) => {
                value.push(1);
                push_field(&mut value, lang.as_bytes());
            }
            None => value.push(0),
        }
        Self {
            version,
            scope,
            treat: Treat::Literal,
            value: value.into_boxed_slice(),
        }
    }

    /// Key for a `(predicate, object identity)` pair.
    pub fn pair(version: Version, scope: Scope, predicate: &Iri, object: &Identity) -> Self {
        let mut value = Vec::with_capacity(predicate.as_str().len() + 40);
        push_field(&mut value, predicate.as_str().as_bytes());
        value.extend_from_slice(object.as_bytes());
        Self {
            version,
            scope,
            treat: Treat::Pair,
            value: value.into_boxed_slice(),
        }
    }
}

fn push_field(buf: &mut Vec<u8>, field: &[u8]) {
    buf.extend_from_slice(&(field.len() as u64).to_le_bytes());
    buf.extend_from_slice(field);
}

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that computed and stored a new entry.
    pub misses: u64,
    /// Entries currently stored.
    pub entries: usize,
}

/// A concurrent identity cache.
#[derive(Debug, Default)]
pub struct IdentityCache {
    map: DashMap<CacheKey, Identity>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl IdentityCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached identity for `key`, computing and storing it on a miss.
    pub fn get_or_insert_with(
        &self,
        key: CacheKey,
        compute: impl FnOnce() -> Identity,
    ) -> Identity {
        if let Some(hit) = self.map.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return *hit;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let identity = compute();
        debug_assert_eq!(identity.version(), key.version);
        *self.map.entry(key).or_insert(identity)
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Drops every entry and resets the counters.
    pub fn clear(&self) {
        self.map.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.map.len(),
        }
    }
}
