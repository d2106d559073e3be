//! Tests for the public entry points.

use super::*;
use crate::provenance::Origin;
use crate::term::{Literal, Node, Triple};

const P: &str = "http://example.org/p";
const Q: &str = "http://example.org/q";

fn function() -> IdentityFunction {
    match IdentityFunction::default_function() {
        Ok(f) => f,
        Err(e) => panic!("default function must build: {e}"),
    }
}

fn ok<T>(r: Result<T>) -> T {
    match r {
        Ok(v) => v,
        Err(e) => panic!("unexpected error: {e}"),
    }
}

fn graph(triples: impl IntoIterator<Item = Triple>) -> Graph {
    triples.into_iter().collect()
}

#[test]
fn test_empty_graph_is_null() {
    let f = function();
    assert_eq!(ok(f.identify(&Graph::new())), f.null());
}

#[test]
fn test_triple_matches_graph_path() {
    let f = function();
    let t = Triple::new(Subject::named("http://a"), P, Literal::simple("hi"));
    let single = ok(f.identity_of(t.clone()));
    assert_eq!(ok(f.identify(&graph([t]))), ok(f.sorted_identity(&[single], false)));
}

#[test]
fn test_pairs_match_anonymous_subject() {
    let f = function();
    let pairs = Value::pairs([(P, Node::literal("x")), (Q, Node::named("http://b"))]);
    let g = graph([
        Triple::new(Subject::blank("s"), Q, Node::named("http://b")),
        Triple::new(Subject::blank("s"), P, Node::literal("x")),
    ]);
    let expected = ok(f.identity_of(pairs));
    assert_eq!(ok(f.identify(&g)), ok(f.sorted_identity(&[expected], false)));
}

#[test]
fn test_inspection_parts() {
    let f = function();
    let g = graph([
        Triple::new(Subject::named("http://a"), P, Node::blank("x")),
        Triple::new(Subject::blank("x"), P, Node::blank("dangling")),
        Triple::new(Subject::blank("head"), P, Node::literal("free")),
    ]);
    let i = ok(f.inspect(&g));
    assert_eq!(i.subjects.len(), 1);
    assert_eq!(i.free_heads.len(), 1);
    assert!(i.cut_points.is_empty());
    assert_eq!(i.dangling, 1);
    assert!(i.provenance.is_none());
    assert_eq!(i.identity, ok(f.identify(&g)));
    assert_eq!(i.identity, ok(f.sorted_identity(&i.contributors(), false)));
}

#[test]
fn test_debug_records_provenance() {
    let f = function().with_debug(true);
    let g = graph([Triple::new(Subject::named("http://a"), P, Node::literal("x"))]);
    let i = ok(f.inspect(&g));
    let Some(p) = &i.provenance else {
        panic!("debug inspection without provenance");
    };
    assert!(matches!(p.get(&i.identity), Some(Origin::Graph { .. })));
    let kinds: Vec<&Origin> = p.trace(&i.identity).into_iter().map(|(_, o)| o).collect();
    assert!(kinds.iter().any(|o| matches!(o, Origin::Literal { .. })));
    assert!(kinds.iter().any(|o| matches!(o, Origin::Embedded { .. })));
}

#[test]
fn test_check_and_version_mismatch() {
    let sha = function();
    let b3 = ok(IdentityFunction::for_version(Version::Ibn1Blake3));
    let g = graph([Triple::new(Subject::named("http://a"), P, Node::literal("x"))]);
    let id = ok(sha.identify(&g));
    assert!(ok(sha.check(&id, &g)));
    assert!(!ok(sha.check(&id, &Graph::new())));
    assert!(matches!(b3.check(&id, &g), Err(Error::VersionMismatch { .. })));
    assert!(matches!(b3.identity_of(id), Err(Error::VersionMismatch { .. })));
}

#[test]
fn test_identity_bnode() {
    let f = function();
    let g = graph([Triple::new(Subject::blank("x"), P, Node::literal("x"))]);
    let bound = ok(IdentityBNode::new(&f, &g));
    assert!(ok(bound.check(&g.relabel_blanks(|_| crate::term::BlankId::new("y")))));
    assert!(ok(bound.check_identity(&bound.identity())));
    let other = ok(ok(IdentityFunction::for_version(Version::Ibn1Blake3)).identify(&g));
    assert!(bound.check_identity(&other).is_err());
    assert_eq!(bound.to_string(), bound.identity().to_string());
}

#[test]
fn test_subject_identity_is_its_embedded_identity() {
    let f = function();
    let a = Subject::named("http://a");
    let g = graph([
        Triple::new(a.clone(), P, Node::blank("x")),
        Triple::new(Subject::blank("x"), Q, Node::literal("deep")),
        Triple::new(Subject::named("http://other"), P, Node::literal("elsewhere")),
    ]);
    let whole = ok(f.inspect(&g));
    let Some(embedded) = whole.subjects.get(&Iri::new("http://a")).map(|s| s.embedded) else {
        panic!("subject missing from inspection");
    };
    assert_eq!(ok(f.subject_identity(&g, &a)), ok(f.sorted_identity(&[embedded], false)));
}

#[test]
fn test_identify_all_matches_sequential() {
    let f = function();
    let graphs: Vec<Graph> = (0..8)
        .map(|i| graph([Triple::new(Subject::blank("b"), P, Node::literal(i.to_string()))]))
        .collect();
    let sequential: Vec<Identity> = graphs.iter().map(|g| ok(f.identify(g))).collect();
    assert_eq!(ok(f.identify_all(&graphs)), sequential);
}

#[test]
fn test_clones_share_the_cache() {
    let f = function();
    let g = f.clone();
    ok(f.identity_of(Node::named("http://a")));
    ok(g.identity_of(Node::named("http://a")));
    assert_eq!(f.cache().stats().hits, 1);
}

#[test]
fn test_cache_scope_isolates_entries() {
    let shared = Arc::new(IdentityCache::new());
    let a = function().with_cache(Arc::clone(&shared));
    let b = function().with_cache(Arc::clone(&shared)).with_cache_scope("worker-2");
    assert_eq!(ok(a.identity_of(Value::text("x"))), ok(b.identity_of(Value::text("x"))));
    assert_eq!(shared.stats().hits, 0);
    assert_eq!(shared.len(), 2);
}

#[test]
fn test_sequence_helpers_reject_foreign_versions() {
    let f = function();
    let b3 = ok(IdentityFunction::for_version(Version::Ibn1Blake3));
    let foreign = ok(b3.identity_of(Value::text("x")));
    assert!(f.ordered_identity(&[foreign], true).is_err());
    let a = ok(f.identity_of(Value::text("a")));
    let b = ok(f.identity_of(Value::text("b")));
    assert_eq!(ok(f.sorted_identity(&[a, b], true)), ok(f.sorted_identity(&[b, a], true)));
    assert_ne!(ok(f.ordered_identity(&[a, b], true)), ok(f.ordered_identity(&[b, a], true)));
}
