//! Fixed-point resolution of blank node identities.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::aggregate;
use crate::cycle;
use crate::error::{Error, Result};
use crate::hasher::NodeHasher;
use crate::identity::Identity;
use crate::partition::{Owner, Partition};

/// What resolution had to do beyond plain bottom-up hashing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Resolution {
    pub(crate) rounds: usize,
    pub(crate) cuts: usize,
}

/// Resolves every blank node's condensed identity.
///
/// A blank resolves once none of its triples is pending. Resolving it
/// settles every triple waiting on it, which may resolve its referrers in
/// turn. When the worklist drains with blanks still pending, cycles are cut
/// and the loop resumes.
///
/// # Errors
///
/// Returns [`Error::Invariant`] if a round of cycle breaking makes no
/// progress.
pub(crate) fn resolve(
    part: &mut Partition,
    hasher: &mut NodeHasher<'_>,
    large_cycle_warning: usize,
) -> Result<Resolution> {
    for blank in part.blanks.iter().filter(|b| b.is_dangling()) {
        warn!(blank = %blank.label, "blank node is never a subject; using the empty pair set");
    }

    let queue: VecDeque<usize> = part
        .blanks
        .iter()
        .enumerate()
        .filter(|(_, b)| b.pending == 0)
        .map(|(i, _)| i)
        .collect();
    let outcome = run(part, hasher, queue, large_cycle_warning)?;

    if outcome.rounds > 0 {
        debug!(rounds = outcome.rounds, cuts = outcome.cuts, "broke blank node cycles");
    }
    Ok(outcome)
}

/// The graph identity obtained by cutting `node` through `edges` and
/// resolving the rest. Works on a copy; nothing is recorded in provenance.
pub(crate) fn trial(
    part: &Partition,
    hasher: &NodeHasher<'_>,
    node: usize,
    edges: &[usize],
) -> Result<Identity> {
    let mut part = part.clone();
    let mut hasher = hasher.detached();
    let mut queue = VecDeque::new();
    part.blanks[node].cut = true;
    let sentinel = hasher.sentinel();
    for &triple in edges {
        settle(&mut part, &mut hasher, triple, sentinel, &mut queue);
    }
    run(&mut part, &mut hasher, queue, usize::MAX)?;
    Ok(aggregate::aggregate(&part, &mut hasher)?.identity)
}

fn run(
    part: &mut Partition,
    hasher: &mut NodeHasher<'_>,
    mut queue: VecDeque<usize>,
    large_cycle_warning: usize,
) -> Result<Resolution> {
    let mut outcome = Resolution::default();
    loop {
        drain(part, hasher, &mut queue);
        let stalled = part.unresolved().count();
        if stalled == 0 {
            return Ok(outcome);
        }

        outcome.rounds += 1;
        let cuts = cycle::select_cuts(part, hasher, large_cycle_warning)?;
        if cuts.iter().all(|c| c.edges.is_empty()) {
            return Err(Error::Invariant(format!(
                "{stalled} blank nodes still pending and no cycle edge to cut"
            )));
        }
        let sentinel = hasher.sentinel();
        for cut in cuts {
            part.blanks[cut.node].cut = true;
            outcome.cuts += 1;
            for triple in cut.edges {
                settle(part, hasher, triple, sentinel, &mut queue);
            }
        }
    }
}

fn drain(part: &mut Partition, hasher: &mut NodeHasher<'_>, queue: &mut VecDeque<usize>) {
    while let Some(i) = queue.pop_front() {
        let blank = &mut part.blanks[i];
        if blank.condensed.is_some() || blank.pending > 0 {
            continue;
        }
        let id = hasher.condensed(blank.pairs.clone());
        blank.condensed = Some(id);
        let waiting = std::mem::take(&mut blank.waiting_in);
        for triple in waiting {
            if !part.pending[triple].settled {
                settle(part, hasher, triple, id, queue);
            }
        }
    }
}

/// Turns a pending triple into a pair of its owner.
fn settle(
    part: &mut Partition,
    hasher: &mut NodeHasher<'_>,
    triple: usize,
    object: Identity,
    queue: &mut VecDeque<usize>,
) {
    let pending = &mut part.pending[triple];
    pending.settled = true;
    let pair = hasher.pair(&pending.predicate, &object);
    match pending.owner {
        Owner::Named(i) => {
            let named = &mut part.named[i];
            named.pairs.push(pair);
            named.pending -= 1;
        }
        Owner::Blank(i) => {
            let blank = &mut part.blanks[i];
            blank.pairs.push(pair);
            blank.pending -= 1;
            if blank.pending == 0 {
                queue.push_back(i);
            }
        }
    }
}
