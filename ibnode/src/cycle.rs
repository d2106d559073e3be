//! Cycle detection and deterministic cut-point selection.
//!
//! When the resolver stalls, every still-pending blank node waits, directly
//! or transitively, on a cycle of blank references. This module builds the
//! pending graph (unresolved blank nodes plus the named subjects waiting on
//! them), finds its strongly connected components, picks one cut point in
//! each *bottom* component (one with no pending edge leaving it), and
//! returns the pending triples to settle with the cycle-break sentinel.
//!
//! Only bottom components are cut in a round. Upstream components are
//! revisited once the resolved identities of their downstream neighbours
//! have become pairs.
//!
//! Cut-point key, lowest wins:
//!
//! 1. elementary cycles through the node, most first ([`MAX_CYCLES`] cap per
//!    component, past which component-internal incident edges are counted
//!    for every node instead);
//! 2. pending triples;
//! 3. resolved pairs;
//! 4. sorted pending predicate identities;
//! 5. sorted resolved pair identities;
//! 6. colour-refinement signature over the whole pending graph, so a
//!    reference from a named subject or an upstream blank node tells
//!    members apart.
//!
//! Members still tied after the key are either mapped onto each other by an
//! automorphism of the pending graph, in which case any of them yields the
//! same identity, or each is tried and the one giving the smallest graph
//! identity is cut. Blank labels never take part.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use tracing::{debug, warn};

use crate::combine::Combinator;
use crate::error::{Error, Result};
use crate::hasher::NodeHasher;
use crate::identity::Identity;
use crate::partition::{Owner, Partition};
use crate::resolve;

/// Elementary cycles counted per component before falling back to edge
/// counts.
pub const MAX_CYCLES: u64 = 10_000;

/// Refinements spent searching for one automorphism before the tied
/// candidates are tried instead.
const AUTOMORPHISM_BUDGET: usize = 256;

/// One cut: the chosen blank node and the pending triples to settle.
#[derive(Debug)]
pub(crate) struct Cut {
    pub(crate) node: usize,
    pub(crate) edges: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Vertex {
    Blank(usize),
    Named(usize),
}

/// An unsettled pending triple.
#[derive(Debug, Clone, Copy)]
struct Reference {
    triple: usize,
    predicate: Identity,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct CutKey {
    cycles: Reverse<u64>,
    pending: usize,
    resolved: usize,
    predicates: Vec<Identity>,
    pairs: Vec<Identity>,
    signature: Identity,
}

/// Unresolved blank nodes, the named subjects waiting on them, and every
/// unsettled reference between the two.
struct PendingGraph {
    graph: DiGraph<Vertex, Reference>,
    /// Initial colour of every vertex, by node index.
    seeds: Vec<Identity>,
    combinator: Combinator,
}

impl PendingGraph {
    fn build(part: &Partition, combinator: Combinator) -> Self {
        let mut graph = DiGraph::new();
        let mut blanks = HashMap::new();
        for i in part.unresolved() {
            blanks.insert(i, graph.add_node(Vertex::Blank(i)));
        }
        let mut named = HashMap::new();
        for (triple, pending) in part.pending.iter().enumerate() {
            if pending.settled {
                continue;
            }
            let Some(&to) = blanks.get(&pending.object) else {
                continue;
            };
            let from = match pending.owner {
                Owner::Blank(i) => match blanks.get(&i) {
                    Some(&from) => from,
                    None => continue,
                },
                Owner::Named(i) => *named
                    .entry(i)
                    .or_insert_with(|| graph.add_node(Vertex::Named(i))),
            };
            graph.add_edge(
                from,
                to,
                Reference {
                    triple,
                    predicate: pending.predicate_id,
                },
            );
        }
        let seeds = graph
            .node_weights()
            .map(|&vertex| seed(part, vertex, combinator))
            .collect();
        Self {
            graph,
            seeds,
            combinator,
        }
    }

    fn refine(&self, seeds: &[Identity]) -> Vec<Identity> {
        refine(&self.graph, seeds, self.combinator)
    }

    /// An automorphism mapping `a` onto `b`, as a vertex permutation.
    fn automorphism(&self, a: NodeIndex, b: NodeIndex) -> Option<Vec<usize>> {
        let mut left = self.seeds.clone();
        let mut right = self.seeds.clone();
        individualize(&mut left, a.index(), self.combinator);
        individualize(&mut right, b.index(), self.combinator);
        let mut budget = AUTOMORPHISM_BUDGET;
        self.extend(&left, &right, &mut budget)
    }

    /// Individualization-refinement search over colourings that agree so far.
    fn extend(
        &self,
        left: &[Identity],
        right: &[Identity],
        budget: &mut usize,
    ) -> Option<Vec<usize>> {
        if *budget == 0 {
            return None;
        }
        *budget -= 1;
        let left = self.refine(left);
        let right = self.refine(right);
        let mut classes = left.clone();
        classes.sort_unstable();
        let mut other = right.clone();
        other.sort_unstable();
        if classes != other {
            return None;
        }
        let Some(split) = classes.windows(2).find(|w| w[0] == w[1]).map(|w| w[0]) else {
            return self.verify(&left, &right);
        };
        let u = left.iter().position(|c| *c == split)?;
        for v in (0..right.len()).filter(|&v| right[v] == split) {
            let mut l = left.clone();
            let mut r = right.clone();
            individualize(&mut l, u, self.combinator);
            individualize(&mut r, v, self.combinator);
            if let Some(map) = self.extend(&l, &r, budget) {
                return Some(map);
            }
            if *budget == 0 {
                return None;
            }
        }
        None
    }

    /// Matches two discrete colourings and checks that the bijection keeps
    /// every seed and every reference.
    fn verify(&self, left: &[Identity], right: &[Identity]) -> Option<Vec<usize>> {
        let position: HashMap<Identity, usize> =
            right.iter().enumerate().map(|(i, c)| (*c, i)).collect();
        let map = left
            .iter()
            .map(|c| position.get(c).copied())
            .collect::<Option<Vec<usize>>>()?;
        if (0..map.len()).any(|i| self.seeds[i] != self.seeds[map[i]]) {
            return None;
        }
        let mut edges: Vec<(usize, usize, Identity)> = self
            .graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), e.weight().predicate))
            .collect();
        let mut mapped: Vec<(usize, usize, Identity)> =
            edges.iter().map(|&(s, t, p)| (map[s], map[t], p)).collect();
        edges.sort_unstable();
        mapped.sort_unstable();
        (edges == mapped).then_some(map)
    }

    fn blank(&self, node: NodeIndex) -> Result<usize> {
        match self.graph[node] {
            Vertex::Blank(i) => Ok(i),
            Vertex::Named(_) => Err(Error::Invariant(
                "named subject inside a blank node cycle".to_string(),
            )),
        }
    }

    /// Pending triples into `node` from its own component.
    fn edges_into(&self, node: NodeIndex, component: usize, comp: &[usize]) -> Vec<usize> {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .filter(|e| comp[e.source().index()] == component)
            .map(|e| e.weight().triple)
            .collect()
    }
}

fn seed(part: &Partition, vertex: Vertex, c: Combinator) -> Identity {
    match vertex {
        Vertex::Named(i) => c.digest(part.named[i].iri.as_str().as_bytes()),
        Vertex::Blank(i) => {
            let blank = &part.blanks[i];
            let mut pairs = blank.pairs.clone();
            pairs.sort_unstable();
            let flags = c.digest(&[u8::from(blank.cut), u8::from(blank.is_object)]);
            c.ordered(&[c.ordered(&pairs, false), flags], false)
        }
    }
}

fn individualize(colours: &mut [Identity], vertex: usize, c: Combinator) {
    colours[vertex] = c.ordered(&[colours[vertex], c.sentinel()], true);
}

/// Selects one cut per bottom cyclic component of the pending graph.
///
/// # Errors
///
/// Returns [`Error::Invariant`] if a bottom component is acyclic, which
/// would mean a blank node waits on nothing yet never resolved, or if a
/// trial resolution fails.
pub(crate) fn select_cuts(
    part: &Partition,
    hasher: &NodeHasher<'_>,
    large_cycle_warning: usize,
) -> Result<Vec<Cut>> {
    let pending = PendingGraph::build(part, hasher.combinator());
    let colours = pending.refine(&pending.seeds);
    let components = tarjan_scc(&pending.graph);
    let mut comp = vec![0; pending.graph.node_count()];
    for (id, members) in components.iter().enumerate() {
        for n in members {
            comp[n.index()] = id;
        }
    }

    let mut cuts = Vec::new();
    for (id, members) in components.iter().enumerate() {
        let leaves = members
            .iter()
            .any(|&n| pending.graph.neighbors(n).any(|m| comp[m.index()] != id));
        if leaves {
            continue;
        }
        let head = members[0];
        let cyclic = members.len() > 1 || pending.graph.contains_edge(head, head);
        if !cyclic {
            let label = &part.blanks[pending.blank(head)?].label;
            return Err(Error::Invariant(format!(
                "blank node {label} waits on nothing but never resolved"
            )));
        }
        if members.len() > large_cycle_warning {
            warn!(
                size = members.len(),
                threshold = large_cycle_warning,
                "large blank node cycle"
            );
        }

        let cut = choose(&pending, part, &colours, members, id, &comp, hasher)?;
        let node = pending.blank(cut)?;
        let edges = pending.edges_into(cut, id, &comp);
        debug!(
            blank = %part.blanks[node].label,
            component = members.len(),
            edges = edges.len(),
            "cutting blank node cycle"
        );
        cuts.push(Cut { node, edges });
    }
    Ok(cuts)
}

/// Returns the member with the lowest cut key, resolving ties without
/// looking at labels.
fn choose(
    pending: &PendingGraph,
    part: &Partition,
    colours: &[Identity],
    members: &[NodeIndex],
    component: usize,
    comp: &[usize],
    hasher: &NodeHasher<'_>,
) -> Result<NodeIndex> {
    let k = members.len();
    let local: HashMap<NodeIndex, usize> = members.iter().enumerate().map(|(i, &n)| (n, i)).collect();
    let mut adj: Vec<Vec<usize>> = members
        .iter()
        .map(|&n| {
            pending
                .graph
                .neighbors(n)
                .filter_map(|m| local.get(&m).copied())
                .collect()
        })
        .collect();
    for list in &mut adj {
        list.sort_unstable();
        list.dedup();
    }
    let cycles = count_cycles(&adj, MAX_CYCLES).unwrap_or_else(|| {
        let mut incident = vec![0u64; k];
        for (i, &n) in members.iter().enumerate() {
            for e in pending.graph.edges(n) {
                if let Some(&j) = local.get(&e.target()) {
                    incident[i] += 1;
                    if j != i {
                        incident[j] += 1;
                    }
                }
            }
        }
        incident
    });

    let mut keyed = Vec::with_capacity(k);
    for (i, &n) in members.iter().enumerate() {
        let blank = &part.blanks[pending.blank(n)?];
        let mut predicates: Vec<Identity> =
            pending.graph.edges(n).map(|e| e.weight().predicate).collect();
        predicates.sort_unstable();
        let mut pairs = blank.pairs.clone();
        pairs.sort_unstable();
        let key = CutKey {
            cycles: Reverse(cycles[i]),
            pending: blank.pending,
            resolved: blank.pairs.len(),
            predicates,
            pairs,
            signature: colours[n.index()],
        };
        keyed.push((key, n));
    }
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    let Some((lowest, first)) = keyed.first().map(|(key, n)| (key, *n)) else {
        return Err(Error::Invariant("empty blank node cycle".to_string()));
    };
    let tied: Vec<NodeIndex> = keyed
        .iter()
        .take_while(|(key, _)| key == lowest)
        .map(|(_, n)| *n)
        .collect();
    if tied.len() == 1 || equivalent(pending, first, &tied) {
        return Ok(first);
    }

    debug!(candidates = tied.len(), "cut candidates differ; comparing outcomes");
    let mut best: Option<(Identity, NodeIndex)> = None;
    for &candidate in &tied {
        let edges = pending.edges_into(candidate, component, comp);
        let outcome = resolve::trial(part, hasher, pending.blank(candidate)?, &edges)?;
        if best.map_or(true, |(lowest, _)| outcome < lowest) {
            best = Some((outcome, candidate));
        }
    }
    Ok(best.map_or(first, |(_, n)| n))
}

/// Whether every tied candidate lies in the orbit of `first` under
/// automorphisms of the pending graph.
fn equivalent(pending: &PendingGraph, first: NodeIndex, tied: &[NodeIndex]) -> bool {
    let mut generators: Vec<Vec<usize>> = Vec::new();
    let mut reached = orbit(first.index(), &generators);
    for &candidate in tied {
        if reached.contains(&candidate.index()) {
            continue;
        }
        match pending.automorphism(first, candidate) {
            Some(map) => {
                generators.push(map);
                reached = orbit(first.index(), &generators);
            }
            None => return false,
        }
    }
    true
}

fn orbit(start: usize, generators: &[Vec<usize>]) -> BTreeSet<usize> {
    let mut seen = BTreeSet::from([start]);
    let mut stack = vec![start];
    while let Some(v) = stack.pop() {
        for map in generators {
            if seen.insert(map[v]) {
                stack.push(map[v]);
            }
        }
    }
    seen
}

/// Counts, for every node, the elementary cycles through it (Johnson).
/// Returns `None` once more than `cap` cycles have been found.
fn count_cycles(adj: &[Vec<usize>], cap: u64) -> Option<Vec<u64>> {
    struct Frame {
        node: usize,
        next: usize,
        closed: bool,
    }

    let k = adj.len();
    let mut counts = vec![0u64; k];
    let mut total = 0u64;
    let mut blocked = vec![false; k];
    let mut blocked_by: Vec<Vec<usize>> = vec![Vec::new(); k];

    for s in 0..k {
        blocked.iter_mut().for_each(|b| *b = false);
        blocked_by.iter_mut().for_each(Vec::clear);
        blocked[s] = true;
        let mut path = vec![s];
        let mut frames = vec![Frame {
            node: s,
            next: 0,
            closed: false,
        }];

        while let Some(frame) = frames.last_mut() {
            let v = frame.node;
            if let Some(&w) = adj[v].get(frame.next) {
                frame.next += 1;
                if w < s {
                    continue;
                }
                if w == s {
                    frame.closed = true;
                    total += 1;
                    if total > cap {
                        return None;
                    }
                    for &u in &path {
                        counts[u] += 1;
                    }
                } else if !blocked[w] {
                    blocked[w] = true;
                    path.push(w);
                    frames.push(Frame {
                        node: w,
                        next: 0,
                        closed: false,
                    });
                }
                continue;
            }

            let Some(done) = frames.pop() else { break };
            if done.closed {
                unblock(done.node, &mut blocked, &mut blocked_by);
            } else {
                for &w in &adj[done.node] {
                    if w >= s && !blocked_by[w].contains(&done.node) {
                        blocked_by[w].push(done.node);
                    }
                }
            }
            path.pop();
            if let Some(parent) = frames.last_mut() {
                parent.closed |= done.closed;
            }
        }
    }
    Some(counts)
}

fn unblock(node: usize, blocked: &mut [bool], blocked_by: &mut [Vec<usize>]) {
    let mut stack = vec![node];
    while let Some(x) = stack.pop() {
        if blocked[x] {
            blocked[x] = false;
            stack.append(&mut blocked_by[x]);
        }
    }
}

/// Colour refinement (1-WL) over labelled, directed references. Each round
/// hashes a vertex's colour with its outgoing and incoming
/// `(predicate, neighbour colour)` multisets; stops when a round no longer
/// splits any colour class.
fn refine(graph: &DiGraph<Vertex, Reference>, seeds: &[Identity], c: Combinator) -> Vec<Identity> {
    let n = seeds.len();
    let mut colours = seeds.to_vec();
    let mut classes = distinct(&colours);

    for _ in 0..n {
        let mut out = vec![Vec::new(); n];
        let mut inbound = vec![Vec::new(); n];
        for e in graph.edge_references() {
            let (s, t) = (e.source().index(), e.target().index());
            let p = e.weight().predicate;
            out[s].push(c.ordered(&[p, colours[t]], true));
            inbound[t].push(c.ordered(&[p, colours[s]], true));
        }
        let next: Vec<Identity> = out
            .into_iter()
            .zip(inbound)
            .zip(&colours)
            .map(|((out, inbound), colour)| {
                c.ordered(&[*colour, c.sorted(out, false), c.sorted(inbound, false)], false)
            })
            .collect();
        let split = distinct(&next);
        colours = next;
        if split == classes {
            break;
        }
        classes = split;
    }
    colours
}

fn distinct(colours: &[Identity]) -> usize {
    colours.iter().collect::<BTreeSet<_>>().len()
}
