//! Combines subject identities into the graph identity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hasher::NodeHasher;
use crate::identity::Identity;
use crate::partition::Partition;
use crate::provenance::Provenance;
use crate::term::Iri;
use crate::version::Version;

/// Identities of one named subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectIdentity {
    /// Hash of the subject's sorted pair set.
    pub condensed: Identity,
    /// The subject's name bound to its condensed identity; a graph contributor.
    pub embedded: Identity,
}

/// A graph identity together with the parts it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspection {
    /// The graph identity.
    pub identity: Identity,
    /// Version it was computed under.
    pub version: Version,
    /// Every named subject, by IRI.
    pub subjects: BTreeMap<Iri, SubjectIdentity>,
    /// Condensed identities of blank subjects nothing refers to, sorted.
    pub free_heads: Vec<Identity>,
    /// Condensed identities of the blank nodes chosen to break cycles, sorted.
    pub cut_points: Vec<Identity>,
    /// Blank nodes that were referenced but never used as a subject.
    pub dangling: usize,
    /// Origin of every sub-identity, when the function runs in debug mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
}

impl Inspection {
    /// Top-level contributors in hashing order.
    #[must_use]
    pub fn contributors(&self) -> Vec<Identity> {
        let mut all: Vec<Identity> = self
            .free_heads
            .iter()
            .chain(&self.cut_points)
            .copied()
            .chain(self.subjects.values().map(|s| s.embedded))
            .collect();
        all.sort_unstable();
        all
    }
}

/// Builds the inspection for a fully resolved partition.
///
/// # Errors
///
/// Returns [`Error::Invariant`] if any blank node or named subject is
/// still waiting on a pending triple.
pub(crate) fn aggregate(part: &Partition, hasher: &mut NodeHasher<'_>) -> Result<Inspection> {
    let mut free_heads = Vec::new();
    let mut cut_points = Vec::new();
    for blank in &part.blanks {
        let Some(condensed) = blank.condensed else {
            return Err(Error::Invariant(format!("blank node {} left unresolved", blank.label)));
        };
        if blank.is_free_head() {
            free_heads.push(condensed);
        }
        if blank.cut {
            cut_points.push(condensed);
        }
    }
    free_heads.sort_unstable();
    cut_points.sort_unstable();

    let mut subjects = BTreeMap::new();
    for named in &part.named {
        if named.pending > 0 {
            return Err(Error::Invariant(format!(
                "subject {} still has {} pending triples",
                named.iri, named.pending
            )));
        }
        let condensed = hasher.condensed(named.pairs.clone());
        let embedded = hasher.embedded(&named.iri, condensed);
        subjects.insert(named.iri.clone(), SubjectIdentity { condensed, embedded });
    }

    let mut inspection = Inspection {
        identity: hasher.combinator().null(),
        version: hasher.combinator().version(),
        subjects,
        free_heads,
        cut_points,
        dangling: part.dangling_count(),
        provenance: None,
    };
    inspection.identity = hasher.graph(inspection.contributors());
    Ok(inspection)
}
