//! Splits a graph into directly hashable pairs and triples that wait on a
//! blank node.
//!
//! Blank nodes live in an index arena; pending triples refer to them by
//! index, and each blank keeps the indices of the pending triples waiting on
//! it. Labels are kept only for diagnostics.

use std::collections::{HashMap, HashSet};

use crate::hasher::NodeHasher;
use crate::identity::Identity;
use crate::term::{BlankId, Iri, Node, Subject};
use crate::Graph;

/// Who owns a pending triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Owner {
    Named(usize),
    Blank(usize),
}

/// A triple whose object is a blank node without a known identity yet.
#[derive(Debug, Clone)]
pub(crate) struct Pending {
    pub(crate) owner: Owner,
    pub(crate) predicate: Iri,
    pub(crate) predicate_id: Identity,
    pub(crate) object: usize,
    pub(crate) settled: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct BlankRecord {
    pub(crate) label: BlankId,
    /// Resolved `(predicate, object)` pair identities.
    pub(crate) pairs: Vec<Identity>,
    /// Unsettled pending triples this blank is the subject of.
    pub(crate) pending: usize,
    /// Pending triples whose object is this blank.
    pub(crate) waiting_in: Vec<usize>,
    pub(crate) is_subject: bool,
    pub(crate) is_object: bool,
    pub(crate) condensed: Option<Identity>,
    pub(crate) cut: bool,
}

impl BlankRecord {
    fn new(label: BlankId) -> Self {
        Self {
            label,
            pairs: Vec::new(),
            pending: 0,
            waiting_in: Vec::new(),
            is_subject: false,
            is_object: false,
            condensed: None,
            cut: false,
        }
    }

    /// Never used as a subject: its identity is the empty pair set's.
    pub(crate) fn is_dangling(&self) -> bool {
        !self.is_subject
    }

    /// A subject nothing refers to.
    pub(crate) fn is_free_head(&self) -> bool {
        self.is_subject && !self.is_object
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NamedRecord {
    pub(crate) iri: Iri,
    pub(crate) pairs: Vec<Identity>,
    pub(crate) pending: usize,
}

/// Resolution state of one computation.
#[derive(Debug, Clone, Default)]
pub(crate) struct Partition {
    pub(crate) named: Vec<NamedRecord>,
    pub(crate) blanks: Vec<BlankRecord>,
    pub(crate) pending: Vec<Pending>,
    named_index: HashMap<Iri, usize>,
    blank_index: HashMap<BlankId, usize>,
}

impl Partition {
    /// Hashes every pair that needs no blank identity and registers the
    /// rest.
    pub(crate) fn build(graph: &Graph, hasher: &mut NodeHasher<'_>) -> Self {
        let mut part = Partition::default();
        // named pairs seen per subject, to drop symmetric duplicates
        let mut seen: HashSet<(usize, Identity)> = HashSet::new();

        for triple in graph {
            let predicate = &triple.predicate;
            match (&triple.subject, &triple.object) {
                (Subject::Named(s), Node::Named(o)) => {
                    let (s, o) = hasher.orient(s, predicate, o);
                    let o = hasher.named(o);
                    let pair = hasher.pair(predicate, &o);
                    let idx = part.named_slot(s);
                    if seen.insert((idx, pair)) {
                        part.named[idx].pairs.push(pair);
                    }
                }
                (Subject::Named(s), Node::Literal(lit)) => {
                    let o = hasher.literal(lit);
                    let pair = hasher.pair(predicate, &o);
                    let idx = part.named_slot(s);
                    if seen.insert((idx, pair)) {
                        part.named[idx].pairs.push(pair);
                    }
                }
                (Subject::Named(s), Node::Blank(b)) => {
                    let owner = Owner::Named(part.named_slot(s));
                    part.add_pending(owner, predicate, b, hasher);
                }
                (Subject::Blank(s), Node::Blank(b)) => {
                    let idx = part.blank_slot(s);
                    part.blanks[idx].is_subject = true;
                    part.add_pending(Owner::Blank(idx), predicate, b, hasher);
                }
                (Subject::Blank(s), Node::Named(iri)) => {
                    let o = hasher.named(iri);
                    part.add_blank_pair(s, predicate, &o, hasher);
                }
                (Subject::Blank(s), Node::Literal(lit)) => {
                    let o = hasher.literal(lit);
                    part.add_blank_pair(s, predicate, &o, hasher);
                }
            }
        }
        part
    }

    fn named_slot(&mut self, iri: &Iri) -> usize {
        if let Some(&idx) = self.named_index.get(iri) {
            return idx;
        }
        let idx = self.named.len();
        self.named.push(NamedRecord {
            iri: iri.clone(),
            pairs: Vec::new(),
            pending: 0,
        });
        self.named_index.insert(iri.clone(), idx);
        idx
    }

    fn blank_slot(&mut self, label: &BlankId) -> usize {
        if let Some(&idx) = self.blank_index.get(label) {
            return idx;
        }
        let idx = self.blanks.len();
        self.blanks.push(BlankRecord::new(label.clone()));
        self.blank_index.insert(label.clone(), idx);
        idx
    }

    fn add_blank_pair(
        &mut self,
        subject: &BlankId,
        predicate: &Iri,
        object: &Identity,
        hasher: &mut NodeHasher<'_>,
    ) {
        let pair = hasher.pair(predicate, object);
        let idx = self.blank_slot(subject);
        let blank = &mut self.blanks[idx];
        blank.is_subject = true;
        blank.pairs.push(pair);
    }

    fn add_pending(
        &mut self,
        owner: Owner,
        predicate: &Iri,
        object: &BlankId,
        hasher: &mut NodeHasher<'_>,
    ) {
        let object = self.blank_slot(object);
        let id = self.pending.len();
        self.pending.push(Pending {
            owner,
            predicate: predicate.clone(),
            predicate_id: hasher.named(predicate),
            object,
            settled: false,
        });
        self.blanks[object].is_object = true;
        self.blanks[object].waiting_in.push(id);
        match owner {
            Owner::Named(i) => self.named[i].pending += 1,
            Owner::Blank(i) => self.blanks[i].pending += 1,
        }
    }

    /// Blank nodes whose condensed identity is still unknown.
    pub(crate) fn unresolved(&self) -> impl Iterator<Item = usize> + '_ {
        self.blanks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.condensed.is_none())
            .map(|(i, _)| i)
    }

    pub(crate) fn dangling_count(&self) -> usize {
        self.blanks.iter().filter(|b| b.is_dangling()).count()
    }
}
