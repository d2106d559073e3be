//! Concrete identity scenarios.
//!
//! Each test pins one observable behaviour of the public API on a small,
//! hand-written graph.

use anyhow::Result;
use ibnode::{
    Config, Error, Graph, IdentityFunction, Iri, Literal, Node, Subject, Triple, Value, Version,
};

const P: &str = "http://example.org/p";
const Q: &str = "http://example.org/q";
const KNOWS: &str = "http://xmlns.com/foaf/0.1/knows";

fn f() -> IdentityFunction {
    IdentityFunction::default_function().unwrap()
}

fn graph<const N: usize>(triples: [Triple; N]) -> Graph {
    triples.into_iter().collect()
}

fn named(s: &str) -> Subject {
    Subject::named(format!("http://example.org/{s}"))
}

fn blank(s: &str) -> Subject {
    Subject::blank(s)
}

// =============================================================================
// Named graphs
// =============================================================================

#[test]
fn test_single_literal_triple_is_stable() -> Result<()> {
    let hi = graph([Triple::new(named("a"), P, Literal::simple("hi"))]);
    let ho = graph([Triple::new(named("a"), P, Literal::simple("ho"))]);
    let first = f().identify(&hi)?;
    assert_eq!(first, f().identify(&hi)?);
    assert_ne!(first, f().identify(&ho)?);
    Ok(())
}

#[test]
fn test_triple_order_is_irrelevant() -> Result<()> {
    let triples = vec![
        Triple::new(named("a"), P, Literal::simple("1")),
        Triple::new(named("a"), Q, Node::named("http://example.org/b")),
        Triple::new(named("b"), P, Literal::lang("x", "en")),
    ];
    let forward: Graph = triples.iter().cloned().collect();
    let backward: Graph = triples.iter().rev().cloned().collect();
    assert_eq!(f().identify(&forward)?, f().identify(&backward)?);
    Ok(())
}

#[test]
fn test_literal_fields_all_matter() -> Result<()> {
    let ids: Vec<_> = [
        Literal::simple("1"),
        Literal::typed("1", "http://www.w3.org/2001/XMLSchema#integer"),
        Literal::lang("1", "en"),
        Literal::lang("1", "de"),
    ]
    .into_iter()
    .map(|lit| f().identify(&graph([Triple::new(named("a"), P, lit)])))
    .collect::<ibnode::Result<_>>()?;
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            assert_ne!(a, b);
        }
    }
    Ok(())
}

#[test]
fn test_subject_and_object_roles_matter() -> Result<()> {
    let ab = graph([Triple::new(named("a"), P, Node::named("http://example.org/b"))]);
    let ba = graph([Triple::new(named("b"), P, Node::named("http://example.org/a"))]);
    assert_ne!(f().identify(&ab)?, f().identify(&ba)?);
    Ok(())
}

// =============================================================================
// Blank nodes
// =============================================================================

#[test]
fn test_blank_labels_are_irrelevant() -> Result<()> {
    let one = graph([Triple::new(blank("1"), P, Node::named("http://example.org/a"))]);
    let seven = graph([Triple::new(blank("7"), P, Node::named("http://example.org/a"))]);
    assert_eq!(f().identify(&one)?, f().identify(&seven)?);
    Ok(())
}

#[test]
fn test_nested_blank_nodes() -> Result<()> {
    let nested = |x: &str, y: &str| {
        graph([
            Triple::new(named("a"), P, Node::blank(x)),
            Triple::new(blank(x), Q, Node::blank(y)),
            Triple::new(blank(y), P, Literal::simple("leaf")),
        ])
    };
    assert_eq!(f().identify(&nested("x", "y"))?, f().identify(&nested("k", "j"))?);

    let changed = graph([
        Triple::new(named("a"), P, Node::blank("x")),
        Triple::new(blank("x"), Q, Node::blank("y")),
        Triple::new(blank("y"), P, Literal::simple("other leaf")),
    ]);
    assert_ne!(f().identify(&nested("x", "y"))?, f().identify(&changed)?);
    Ok(())
}

#[test]
fn test_distinct_anonymous_subjects_both_count() -> Result<()> {
    let one = graph([Triple::new(blank("a"), P, Literal::simple("x"))]);
    let two = graph([
        Triple::new(blank("a"), P, Literal::simple("x")),
        Triple::new(blank("b"), P, Literal::simple("x")),
    ]);
    assert_ne!(f().identify(&one)?, f().identify(&two)?);
    Ok(())
}

#[test]
fn test_dangling_blank_object_resolves() -> Result<()> {
    let g = graph([Triple::new(named("a"), P, Node::blank("nowhere"))]);
    let inspection = f().inspect(&g)?;
    assert_eq!(inspection.dangling, 1);
    assert_eq!(inspection.identity, f().identify(&g.relabel_blanks(|_| "elsewhere".into()))?);
    Ok(())
}

#[test]
fn test_raw_blank_node_has_no_identity() {
    let result = f().identity_of(Node::blank("b0"));
    assert!(matches!(result, Err(Error::BlankNode(label)) if label == "b0"));
}

// =============================================================================
// Cycles
// =============================================================================

#[test]
fn test_two_node_cycle_terminates_and_is_stable() -> Result<()> {
    let cycle = |x: &str, y: &str| {
        graph([
            Triple::new(blank(x), P, Node::blank(y)),
            Triple::new(blank(y), P, Node::blank(x)),
        ])
    };
    let first = f().identify(&cycle("x", "y"))?;
    assert_eq!(first, f().identify(&cycle("x", "y"))?);
    assert_eq!(first, f().identify(&cycle("y", "x"))?);
    assert_eq!(first, f().identify(&cycle("q1", "q2"))?);
    assert_ne!(first, f().null());
    Ok(())
}

#[test]
fn test_relabeled_three_cycles_agree() -> Result<()> {
    let cycle = |[a, b, c]: [&str; 3]| {
        graph([
            Triple::new(blank(a), P, Node::blank(b)),
            Triple::new(blank(b), P, Node::blank(c)),
            Triple::new(blank(c), P, Node::blank(a)),
            Triple::new(blank(a), Q, Literal::simple("marked")),
        ])
    };
    let expected = f().identify(&cycle(["a", "b", "c"]))?;
    for labels in [["b", "c", "a"], ["c", "a", "b"], ["z", "y", "x"], ["n0", "n1", "n2"]] {
        assert_eq!(f().identify(&cycle(labels))?, expected, "labels {labels:?}");
    }
    Ok(())
}

#[test]
fn test_cycle_lengths_are_distinguished() -> Result<()> {
    let ring = |n: usize| -> Graph {
        (0..n)
            .map(|i| Triple::new(blank(&format!("r{i}")), P, Node::blank(format!("r{}", (i + 1) % n))))
            .collect()
    };
    let two_and_loop = graph([
        Triple::new(blank("a"), P, Node::blank("b")),
        Triple::new(blank("b"), P, Node::blank("a")),
        Triple::new(blank("c"), P, Node::blank("c")),
    ]);
    let ids = [f().identify(&ring(1))?, f().identify(&ring(2))?, f().identify(&ring(3))?];
    assert_ne!(ids[0], ids[1]);
    assert_ne!(ids[1], ids[2]);
    assert_ne!(f().identify(&two_and_loop)?, ids[2]);
    Ok(())
}

#[test]
fn test_cycle_content_behind_cut_edge_matters() -> Result<()> {
    let cycle = |leaf: &str| {
        graph([
            Triple::new(named("root"), P, Node::blank("x")),
            Triple::new(blank("x"), P, Node::blank("y")),
            Triple::new(blank("y"), P, Node::blank("x")),
            Triple::new(blank("y"), Q, Literal::simple(leaf)),
        ])
    };
    let inspection = f().inspect(&cycle("one"))?;
    assert_eq!(inspection.cut_points.len(), 1);
    assert_ne!(inspection.identity, f().identify(&cycle("two"))?);
    Ok(())
}

#[test]
fn test_cycle_reached_from_named_subject() -> Result<()> {
    let g = |x: &str, y: &str| {
        graph([
            Triple::new(named("a"), P, Node::blank(x)),
            Triple::new(blank(x), Q, Node::blank(y)),
            Triple::new(blank(y), Q, Node::blank(x)),
        ])
    };
    let expected = f().identify(&g("x", "y"))?;
    for (x, y) in [("y", "x"), ("b2", "b1"), ("b1", "b2")] {
        assert_eq!(f().identify(&g(x, y))?, expected, "labels {x} {y}");
    }
    Ok(())
}

#[test]
fn test_cycle_reached_from_free_head() -> Result<()> {
    let g = |h: &str, x: &str, y: &str| {
        graph([
            Triple::new(blank(h), P, Node::blank(x)),
            Triple::new(blank(x), Q, Node::blank(y)),
            Triple::new(blank(y), Q, Node::blank(x)),
        ])
    };
    let expected = f().identify(&g("h", "x", "y"))?;
    for (h, x, y) in [("h", "y", "x"), ("a", "c", "b"), ("z", "a", "b")] {
        assert_eq!(f().identify(&g(h, x, y))?, expected, "labels {h} {x} {y}");
    }
    assert_eq!(f().inspect(&g("h", "x", "y"))?.free_heads.len(), 1);
    Ok(())
}

#[test]
fn test_cycle_members_told_apart_only_by_their_referrers() -> Result<()> {
    // a 3-ring whose members differ only in which named subject points at them
    let g = |labels: [&str; 3]| {
        let mut triples: Vec<Triple> = (0..3)
            .map(|i| Triple::new(blank(labels[i]), Q, Node::blank(labels[(i + 1) % 3])))
            .collect();
        triples.push(Triple::new(named("a"), P, Node::blank(labels[0])));
        triples.push(Triple::new(named("b"), P, Node::blank(labels[1])));
        triples.into_iter().collect::<Graph>()
    };
    let expected = f().identify(&g(["x", "y", "z"]))?;
    for labels in [["z", "y", "x"], ["y", "z", "x"], ["b1", "b0", "b2"]] {
        assert_eq!(f().identify(&g(labels))?, expected, "labels {labels:?}");
    }
    Ok(())
}

#[test]
fn test_large_cycle_still_resolves() -> Result<()> {
    let function = IdentityFunction::new(Config {
        large_cycle_warning: 8,
        ..Config::default()
    })?;
    let ring: Graph = (0..32)
        .map(|i| Triple::new(blank(&format!("n{i}")), P, Node::blank(format!("n{}", (i + 1) % 32))))
        .collect();
    let shifted = ring.relabel_blanks(|b| format!("m{}", b.as_str()).as_str().into());
    assert_eq!(function.identify(&ring)?, function.identify(&shifted)?);
    Ok(())
}

// =============================================================================
// Symmetric predicates
// =============================================================================

#[test]
fn test_symmetric_predicates_ignore_direction() -> Result<()> {
    let function = f().with_symmetric(KNOWS);
    let ab = graph([Triple::new(named("a"), KNOWS, Node::named("http://example.org/b"))]);
    let ba = graph([Triple::new(named("b"), KNOWS, Node::named("http://example.org/a"))]);
    assert_eq!(function.identify(&ab)?, function.identify(&ba)?);
    assert_ne!(f().identify(&ab)?, f().identify(&ba)?);

    let both = graph([
        Triple::new(named("a"), KNOWS, Node::named("http://example.org/b")),
        Triple::new(named("b"), KNOWS, Node::named("http://example.org/a")),
    ]);
    assert_eq!(function.identify(&both)?, function.identify(&ab)?);
    Ok(())
}

#[test]
fn test_symmetric_predicates_from_config() -> Result<()> {
    let config = Config::from_json(&format!(r#"{{"symmetric_predicates": ["{KNOWS}"]}}"#))?;
    let function = IdentityFunction::new(config)?;
    let ab = Triple::new(named("a"), KNOWS, Node::named("http://example.org/b"));
    let ba = Triple::new(named("b"), KNOWS, Node::named("http://example.org/a"));
    assert_eq!(function.identity_of(ab)?, function.identity_of(ba)?);
    Ok(())
}

// =============================================================================
// Values and versions
// =============================================================================

#[test]
fn test_identity_of_identity_is_unchanged() -> Result<()> {
    let id = f().identify(&graph([Triple::new(named("a"), P, Literal::simple("x"))]))?;
    assert_eq!(f().identity_of(id)?, id);
    assert_eq!(f().identity_of(Value::Identity(id))?, id);
    Ok(())
}

#[test]
fn test_text_and_bytes_agree() -> Result<()> {
    assert_eq!(f().identity_of(Value::text("abc"))?, f().identity_of(Value::bytes(*b"abc"))?);
    assert_eq!(
        f().identity_of(Iri::new("http://example.org/a"))?,
        f().identity_of(Value::text("http://example.org/a"))?
    );
    Ok(())
}

#[test]
fn test_versions_never_agree() -> Result<()> {
    let g = graph([Triple::new(named("a"), P, Literal::simple("x"))]);
    let sha = f();
    let b3 = IdentityFunction::for_version(Version::Ibn1Blake3)?;
    let a = sha.identify(&g)?;
    let b = b3.identify(&g)?;
    assert_ne!(a, b);
    assert_eq!(b.version(), Version::Ibn1Blake3);
    assert!(b.to_string().starts_with("ibn1-blake3:"));
    assert!(matches!(sha.check(&b, &g), Err(Error::VersionMismatch { .. })));
    Ok(())
}

#[test]
fn test_inspection_serializes_to_json() -> Result<()> {
    let function = f().with_debug(true);
    let g = graph([
        Triple::new(named("a"), P, Node::blank("x")),
        Triple::new(blank("x"), P, Literal::simple("y")),
    ]);
    let inspection = function.inspect(&g)?;
    let json = serde_json::to_value(&inspection)?;
    assert_eq!(json["identity"], serde_json::Value::from(inspection.identity.to_string()));
    assert!(json["provenance"].as_object().is_some_and(|p| !p.is_empty()));
    let back: ibnode::Inspection = serde_json::from_value(json)?;
    assert_eq!(back, inspection);
    Ok(())
}
