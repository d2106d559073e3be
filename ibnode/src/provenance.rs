//! Debug-mode record of where every sub-identity came from.

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};

use crate::identity::Identity;
use crate::term::{Iri, Literal};

/// The input that produced an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Origin {
    /// Raw bytes, hex encoded.
    Bytes {
        /// Lowercase hex of the input.
        hex: String,
    },
    /// UTF-8 text.
    Text {
        /// The input text.
        text: String,
    },
    /// A named node.
    Named {
        /// The node's IRI.
        iri: Iri,
    },
    /// A literal.
    Literal {
        /// The literal.
        literal: Literal,
    },
    /// A `(predicate, object)` pair.
    Pair {
        /// Predicate IRI.
        predicate: Iri,
        /// Identity of the object.
        object: Identity,
    },
    /// A subject's sorted pair set.
    Condensed {
        /// Pair identities, in hashing order.
        pairs: Vec<Identity>,
    },
    /// A named subject bound to its condensed identity.
    Embedded {
        /// The subject.
        subject: Iri,
        /// Its condensed identity.
        condensed: Identity,
    },
    /// A whole graph.
    Graph {
        /// Top-level contributors, in hashing order.
        contributors: Vec<Identity>,
    },
    /// An explicitly combined identity sequence.
    Sequence {
        /// Items, in hashing order.
        items: Vec<Identity>,
        /// Whether the field separator was interleaved.
        separator: bool,
    },
    /// The cycle-break sentinel, substituted for a cut edge's object.
    Sentinel,
}

/// Map from computed identities to their origins.
///
/// When an identity is produced twice from different inputs (for instance
/// the null identity, which is also the condensed identity of an empty pair
/// set) the first origin recorded is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Provenance {
    origins: BTreeMap<Identity, Origin>,
}

impl Provenance {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `origin` for `identity` unless one is already known.
    pub fn record(&mut self, identity: Identity, origin: Origin) {
        self.origins.entry(identity).or_insert(origin);
    }

    /// Origin of `identity`, if it was computed while recording.
    #[must_use]
    pub fn get(&self, identity: &Identity) -> Option<&Origin> {
        self.origins.get(identity)
    }

    /// Number of recorded identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.origins.len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    /// Iterates in identity order.
    pub fn iter(&self) -> btree_map::Iter<'_, Identity, Origin> {
        self.origins.iter()
    }

    /// Walks from `identity` down to the leaves it was built from, depth
    /// first, yielding each recorded identity once.
    #[must_use]
    pub fn trace(&self, identity: &Identity) -> Vec<(Identity, &Origin)> {
        let mut out = Vec::new();
        let mut seen = std::collections::BTreeSet::new();
        let mut stack = vec![*identity];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let Some(origin) = self.origins.get(&id) else {
                continue;
            };
            out.push((id, origin));
            let children: &[Identity] = match origin {
                Origin::Pair { object, .. } => std::slice::from_ref(object),
                Origin::Condensed { pairs } => pairs,
                Origin::Embedded { condensed, .. } => std::slice::from_ref(condensed),
                Origin::Graph { contributors } => contributors,
                Origin::Sequence { items, .. } => items,
                _ => &[],
            };
            stack.extend(children.iter().rev());
        }
        out
    }
}

impl<'a> IntoIterator for &'a Provenance {
    type Item = (&'a Identity, &'a Origin);
    type IntoIter = btree_map::Iter<'a, Identity, Origin>;

    fn into_iter(self) -> Self::IntoIter {
        self.origins.iter()
    }
}
