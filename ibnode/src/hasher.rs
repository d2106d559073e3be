//! Identities of atomic values, pairs, and single subjects.

use std::collections::BTreeSet;

use crate::cache::{CacheKey, IdentityCache, Scope, Treat};
use crate::combine::Combinator;
use crate::error::{Error, Result};
use crate::identity::Identity;
use crate::provenance::{Origin, Provenance};
use crate::term::{Iri, Literal, Node, Subject, Triple};

/// Anything [`IdentityFunction::identity_of`](crate::IdentityFunction::identity_of)
/// accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// UTF-8 text.
    Text(String),
    /// A node. Blank nodes are rejected.
    Node(Node),
    /// A previously computed identity, returned unchanged.
    Identity(Identity),
    /// A `(predicate, object)` pair.
    Pair(Iri, Node),
    /// The pairs of one anonymous subject.
    Pairs(Vec<(Iri, Node)>),
    /// A single triple.
    Triple(Triple),
}

impl Value {
    /// Raw bytes.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(bytes.into())
    }

    /// UTF-8 text.
    pub fn text(text: impl Into<String>) -> Self {
        Value::Text(text.into())
    }

    /// A `(predicate, object)` pair.
    pub fn pair(predicate: impl Into<Iri>, object: impl Into<Node>) -> Self {
        Value::Pair(predicate.into(), object.into())
    }

    /// The pair set of an anonymous subject.
    pub fn pairs<P, O>(pairs: impl IntoIterator<Item = (P, O)>) -> Self
    where
        P: Into<Iri>,
        O: Into<Node>,
    {
        Value::Pairs(pairs.into_iter().map(|(p, o)| (p.into(), o.into())).collect())
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(node)
    }
}

impl From<Iri> for Value {
    fn from(iri: Iri) -> Self {
        Value::Node(Node::Named(iri))
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        Value::Node(Node::Literal(literal))
    }
}

impl From<Identity> for Value {
    fn from(identity: Identity) -> Self {
        Value::Identity(identity)
    }
}

impl From<Triple> for Value {
    fn from(triple: Triple) -> Self {
        Value::Triple(triple)
    }
}

/// Per-call hashing context: digest combinator, shared cache, symmetric
/// predicates, and the provenance map when recording.
pub(crate) struct NodeHasher<'a> {
    combinator: Combinator,
    cache: &'a IdentityCache,
    scope: &'a Scope,
    symmetric: &'a BTreeSet<Iri>,
    provenance: Option<&'a mut Provenance>,
}

impl<'a> NodeHasher<'a> {
    pub(crate) fn new(
        combinator: Combinator,
        cache: &'a IdentityCache,
        scope: &'a Scope,
        symmetric: &'a BTreeSet<Iri>,
        provenance: Option<&'a mut Provenance>,
    ) -> Self {
        Self {
            combinator,
            cache,
            scope,
            symmetric,
            provenance,
        }
    }

    pub(crate) fn combinator(&self) -> Combinator {
        self.combinator
    }

    /// A hasher sharing this one's cache and settings that records no
    /// provenance.
    pub(crate) fn detached(&self) -> NodeHasher<'a> {
        NodeHasher {
            combinator: self.combinator,
            cache: self.cache,
            scope: self.scope,
            symmetric: self.symmetric,
            provenance: None,
        }
    }

    fn record(&mut self, identity: Identity, origin: impl FnOnce() -> Origin) {
        if let Some(p) = self.provenance.as_deref_mut() {
            p.record(identity, origin());
        }
    }

    fn cached(&self, key: CacheKey, compute: impl FnOnce(Combinator) -> Identity) -> Identity {
        let c = self.combinator;
        self.cache.get_or_insert_with(key, || compute(c))
    }

    pub(crate) fn bytes(&mut self, bytes: &[u8]) -> Identity {
        let key = CacheKey::raw(self.combinator.version(), self.scope.clone(), Treat::Bytes, bytes);
        let id = self.cached(key, |c| c.digest(bytes));
        self.record(id, || Origin::Bytes {
            hex: hex::encode(bytes),
        });
        id
    }

    pub(crate) fn text(&mut self, text: &str) -> Identity {
        let key = CacheKey::raw(
            self.combinator.version(),
            self.scope.clone(),
            Treat::Text,
            text.as_bytes(),
        );
        let id = self.cached(key, |c| c.digest(text.as_bytes()));
        self.record(id, || Origin::Text { text: text.to_string() });
        id
    }

    pub(crate) fn named(&mut self, iri: &Iri) -> Identity {
        let key = CacheKey::named(self.combinator.version(), self.scope.clone(), iri);
        let id = self.cached(key, |c| c.digest(iri.as_str().as_bytes()));
        self.record(id, || Origin::Named { iri: iri.clone() });
        id
    }

    pub(crate) fn literal(&mut self, literal: &Literal) -> Identity {
        let key = CacheKey::literal(self.combinator.version(), self.scope.clone(), literal);
        let id = self.cached(key, |c| {
            let fields = [
                c.digest(literal.value().as_bytes()),
                c.digest(literal.datatype().as_str().as_bytes()),
                c.digest(literal.language().unwrap_or("").as_bytes()),
            ];
            c.ordered(&fields, false)
        });
        self.record(id, || Origin::Literal {
            literal: literal.clone(),
        });
        id
    }

    /// Identity of a named node or literal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BlankNode`] for a blank node.
    pub(crate) fn node(&mut self, node: &Node) -> Result<Identity> {
        match node {
            Node::Named(iri) => Ok(self.named(iri)),
            Node::Literal(lit) => Ok(self.literal(lit)),
            Node::Blank(b) => Err(Error::BlankNode(b.as_str().to_string())),
        }
    }

    pub(crate) fn pair(&mut self, predicate: &Iri, object: &Identity) -> Identity {
        let key = CacheKey::pair(self.combinator.version(), self.scope.clone(), predicate, object);
        let p = self.named(predicate);
        let id = self.cached(key, |c| c.ordered(&[p, *object], true));
        self.record(id, || Origin::Pair {
            predicate: predicate.clone(),
            object: *object,
        });
        id
    }

    pub(crate) fn condensed(&mut self, mut pairs: Vec<Identity>) -> Identity {
        pairs.sort_unstable();
        let id = self.combinator.ordered(&pairs, false);
        self.record(id, || Origin::Condensed { pairs });
        id
    }

    pub(crate) fn embedded(&mut self, subject: &Iri, condensed: Identity) -> Identity {
        let s = self.named(subject);
        let id = self.combinator.ordered(&[s, condensed], false);
        self.record(id, || Origin::Embedded {
            subject: subject.clone(),
            condensed,
        });
        id
    }

    pub(crate) fn graph(&mut self, mut contributors: Vec<Identity>) -> Identity {
        contributors.sort_unstable();
        let id = self.combinator.ordered(&contributors, false);
        self.record(id, || Origin::Graph { contributors });
        id
    }

    pub(crate) fn sequence(&mut self, items: Vec<Identity>, separator: bool) -> Identity {
        let id = self.combinator.ordered(&items, separator);
        self.record(id, || Origin::Sequence { items, separator });
        id
    }

    pub(crate) fn sentinel(&mut self) -> Identity {
        let id = self.combinator.sentinel();
        self.record(id, || Origin::Sentinel);
        id
    }

    pub(crate) fn is_symmetric(&self, predicate: &Iri) -> bool {
        self.symmetric.contains(predicate)
    }

    /// Orders the ends of a named-to-named triple. Under a symmetric
    /// predicate the end with the smaller identity becomes the subject.
    pub(crate) fn orient<'t>(
        &mut self,
        subject: &'t Iri,
        predicate: &Iri,
        object: &'t Iri,
    ) -> (&'t Iri, &'t Iri) {
        if self.is_symmetric(predicate) && self.named(object) < self.named(subject) {
            (object, subject)
        } else {
            (subject, object)
        }
    }

    /// Identity of a value outside any graph.
    pub(crate) fn value(&mut self, value: &Value) -> Result<Identity> {
        match value {
            Value::Bytes(bytes) => Ok(self.bytes(bytes)),
            Value::Text(text) => Ok(self.text(text)),
            Value::Node(node) => self.node(node),
            Value::Identity(id) => {
                if id.version() == self.combinator.version() {
                    Ok(*id)
                } else {
                    Err(Error::VersionMismatch {
                        expected: self.combinator.version(),
                        found: id.version(),
                    })
                }
            }
            Value::Pair(p, o) => {
                let o = self.node(o)?;
                Ok(self.pair(p, &o))
            }
            Value::Pairs(pairs) => {
                let mut ids = Vec::with_capacity(pairs.len());
                for (p, o) in pairs {
                    let o = self.node(o)?;
                    ids.push(self.pair(p, &o));
                }
                ids.sort_unstable();
                ids.dedup();
                Ok(self.condensed(ids))
            }
            Value::Triple(triple) => self.triple(triple),
        }
    }

    fn triple(&mut self, triple: &Triple) -> Result<Identity> {
        let Subject::Named(subject) = &triple.subject else {
            return Err(Error::BlankNode(
                triple.subject.as_blank().map(|b| b.as_str().to_string()).unwrap_or_default(),
            ));
        };
        let (subject, pair) = match &triple.object {
            Node::Named(object) => {
                let (s, o) = self.orient(subject, &triple.predicate, object);
                let o = self.named(o);
                (s, self.pair(&triple.predicate, &o))
            }
            other => {
                let o = self.node(other)?;
                (subject, self.pair(&triple.predicate, &o))
            }
        };
        let condensed = self.condensed(vec![pair]);
        Ok(self.embedded(subject, condensed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::Version;

    struct Fixture {
        combinator: Combinator,
        cache: IdentityCache,
        scope: Scope,
        symmetric: BTreeSet<Iri>,
    }

    impl Fixture {
        fn new() -> Self {
            let combinator = match Combinator::new(Version::Ibn1Sha256) {
                Ok(c) => c,
                Err(e) => panic!("{e}"),
            };
            Self {
                combinator,
                cache: IdentityCache::new(),
                scope: Scope::Global,
                symmetric: [Iri::new("http://example.org/knows")].into_iter().collect(),
            }
        }

        fn hasher(&self) -> NodeHasher<'_> {
            NodeHasher::new(self.combinator, &self.cache, &self.scope, &self.symmetric, None)
        }
    }

    #[test]
    fn text_and_bytes_share_digests() {
        let f = Fixture::new();
        let mut h = f.hasher();
        assert_eq!(h.text("abc"), h.bytes(b"abc"));
        assert_eq!(h.text("abc"), f.combinator.digest(b"abc"));
    }

    #[test]
    fn literal_layout() {
        let f = Fixture::new();
        let mut h = f.hasher();
        let c = f.combinator;
        let lit = Literal::lang("chat", "fr");
        let expected = c.ordered(
            &[c.digest(b"chat"), c.digest(crate::term::RDF_LANG_STRING.as_bytes()), c.digest(b"fr")],
            false,
        );
        assert_eq!(h.literal(&lit), expected);
        assert_ne!(h.literal(&Literal::simple("chat")), expected);
    }

    #[test]
    fn pair_uses_separator() {
        let f = Fixture::new();
        let mut h = f.hasher();
        let c = f.combinator;
        let p = Iri::new("http://example.org/p");
        let o = c.digest(b"o");
        assert_eq!(h.pair(&p, &o), c.ordered(&[c.digest(p.as_str().as_bytes()), o], true));
    }

    #[test]
    fn blank_nodes_are_rejected() {
        let f = Fixture::new();
        let mut h = f.hasher();
        assert!(matches!(h.node(&Node::blank("b0")), Err(Error::BlankNode(label)) if label == "b0"));
        let t = Triple::new(Subject::blank("s"), "http://example.org/p", Node::literal("x"));
        assert!(matches!(h.value(&Value::Triple(t)), Err(Error::BlankNode(_))));
    }

    #[test]
    fn identity_passes_through() {
        let f = Fixture::new();
        let mut h = f.hasher();
        let id = f.combinator.digest(b"anything");
        assert_eq!(h.value(&Value::Identity(id)).ok(), Some(id));
    }

    #[test]
    fn symmetric_triples_agree() {
        let f = Fixture::new();
        let mut h = f.hasher();
        let knows = "http://example.org/knows";
        let ab = Triple::new(Iri::new("http://a"), knows, Iri::new("http://b"));
        let ba = Triple::new(Iri::new("http://b"), knows, Iri::new("http://a"));
        assert_eq!(h.value(&Value::Triple(ab)).ok(), h.value(&Value::Triple(ba)).ok());

        let likes = "http://example.org/likes";
        let ab = Triple::new(Iri::new("http://a"), likes, Iri::new("http://b"));
        let ba = Triple::new(Iri::new("http://b"), likes, Iri::new("http://a"));
        assert_ne!(h.value(&Value::Triple(ab)).ok(), h.value(&Value::Triple(ba)).ok());
    }

    #[test]
    fn repeated_lookups_hit_the_cache() {
        let f = Fixture::new();
        let mut h = f.hasher();
        let iri = Iri::new("http://a");
        h.named(&iri);
        h.named(&iri);
        assert_eq!(f.cache.stats().hits, 1);
    }

    #[test]
    fn provenance_is_recorded_when_enabled() {
        let f = Fixture::new();
        let mut p = Provenance::new();
        let id = {
            let mut h = NodeHasher::new(f.combinator, &f.cache, &f.scope, &f.symmetric, Some(&mut p));
            h.pair(&Iri::new("http://p"), &f.combinator.null())
        };
        assert!(matches!(p.get(&id), Some(Origin::Pair { .. })));
    }

    #[test]
    fn byte_origins_are_hex_and_detached_hashers_record_nothing() {
        let f = Fixture::new();
        let mut p = Provenance::new();
        let (id, quiet) = {
            let mut h = NodeHasher::new(f.combinator, &f.cache, &f.scope, &f.symmetric, Some(&mut p));
            let quiet = h.detached().bytes(b"quiet");
            (h.bytes(&[0x00, 0xab, 0xff]), quiet)
        };
        assert!(matches!(p.get(&id), Some(Origin::Bytes { hex }) if hex == "00abff"));
        assert!(p.get(&quiet).is_none());
    }
}
