//! A set of triples.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexSet;

use crate::term::{BlankId, Node, Subject, Triple};

/// A graph: a set of triples.
///
/// Insertion order is kept for diagnostics only; it never influences an
/// identity. Inserting a triple that is already present is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    triples: IndexSet<Triple>,
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a triple; returns `false` if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    /// Number of distinct triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Whether the graph has no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Whether `triple` is in the graph.
    #[must_use]
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Iterates over the triples in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> + '_ {
        self.triples.iter()
    }

    /// All distinct blank node labels, subjects and objects alike.
    #[must_use]
    pub fn blank_nodes(&self) -> HashSet<&BlankId> {
        self.triples
            .iter()
            .flat_map(|t| t.subject.as_blank().into_iter().chain(t.object.as_blank()))
            .collect()
    }

    /// The triples of `subject` plus those of every blank node reachable
    /// from it through objects.
    #[must_use]
    pub fn subject_graph(&self, subject: &Subject) -> Graph {
        let mut by_subject: HashMap<&Subject, Vec<&Triple>> = HashMap::new();
        for t in &self.triples {
            by_subject.entry(&t.subject).or_default().push(t);
        }

        let mut out = Graph::new();
        let mut seen: HashSet<Subject> = HashSet::new();
        let mut queue = VecDeque::from([subject.clone()]);
        while let Some(s) = queue.pop_front() {
            if !seen.insert(s.clone()) {
                continue;
            }
            for t in by_subject.get(&s).into_iter().flatten() {
                out.insert((*t).clone());
                if let Node::Blank(b) = &t.object {
                    queue.push_back(Subject::Blank(b.clone()));
                }
            }
        }
        out
    }

    /// Returns a copy with every blank label passed through `relabel`.
    ///
    /// `relabel` must be injective for the result to be isomorphic.
    #[must_use]
    pub fn relabel_blanks(&self, mut relabel: impl FnMut(&BlankId) -> BlankId) -> Graph {
        self.triples
            .iter()
            .map(|t| {
                let subject = match &t.subject {
                    Subject::Blank(b) => Subject::Blank(relabel(b)),
                    named => named.clone(),
                };
                let object = match &t.object {
                    Node::Blank(b) => Node::Blank(relabel(b)),
                    other => other.clone(),
                };
                Triple {
                    subject,
                    predicate: t.predicate.clone(),
                    object,
                }
            })
            .collect()
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self {
            triples: iter.into_iter().collect(),
        }
    }
}

impl Extend<Triple> for Graph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        self.triples.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = indexmap::set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

impl IntoIterator for Graph {
    type Item = Triple;
    type IntoIter = indexmap::set::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}
