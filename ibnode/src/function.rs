//! Public entry points.

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug_span;

use crate::aggregate::{self, Inspection};
use crate::cache::{IdentityCache, Scope};
use crate::combine::Combinator;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::hasher::{NodeHasher, Value};
use crate::identity::Identity;
use crate::partition::Partition;
use crate::provenance::Provenance;
use crate::resolve;
use crate::term::{Iri, Subject};
use crate::version::Version;
use crate::Graph;

/// A configured identity function.
///
/// Cheap to clone; clones share the cache. Independent graphs may be
/// identified concurrently from any number of threads.
///
/// ```
/// use ibnode::{Graph, IdentityFunction, Node, Subject, Triple};
///
/// let f = IdentityFunction::default_function()?;
/// let p = "http://example.org/p";
/// let a: Graph = [Triple::new(Subject::blank("b1"), p, Node::named("http://example.org/a"))]
///     .into_iter()
///     .collect();
/// let b: Graph = [Triple::new(Subject::blank("zz"), p, Node::named("http://example.org/a"))]
///     .into_iter()
///     .collect();
/// assert_eq!(f.identify(&a)?, f.identify(&b)?);
/// # Ok::<(), ibnode::Error>(())
/// ```
#[derive(Clone)]
pub struct IdentityFunction {
    config: Arc<Config>,
    combinator: Combinator,
    cache: Arc<IdentityCache>,
    scope: Scope,
}

impl IdentityFunction {
    /// Builds an identity function, running the digest self-check.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SelfCheck`] if the configured digest is unusable.
    pub fn new(config: Config) -> Result<Self> {
        let combinator = Combinator::new(config.version)?;
        let scope = Scope::from_name(config.cache_scope.as_deref());
        Ok(Self {
            config: Arc::new(config),
            combinator,
            cache: Arc::new(IdentityCache::new()),
            scope,
        })
    }

    /// The default configuration: current version, no symmetric predicates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SelfCheck`] if the digest is unusable.
    pub fn default_function() -> Result<Self> {
        Self::new(Config::default())
    }

    /// The default configuration under another version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SelfCheck`] if the digest is unusable.
    pub fn for_version(version: Version) -> Result<Self> {
        Self::new(Config {
            version,
            ..Config::default()
        })
    }

    /// Declares `predicate` symmetric.
    #[must_use]
    pub fn with_symmetric(mut self, predicate: impl Into<Iri>) -> Self {
        Arc::make_mut(&mut self.config).symmetric_predicates.insert(predicate.into());
        self
    }

    /// Turns provenance recording on or off.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        Arc::make_mut(&mut self.config).debug = debug;
        self
    }

    /// Uses a cache shared with other identity functions.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<IdentityCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Reads and writes a named cache partition.
    #[must_use]
    pub fn with_cache_scope(mut self, scope: impl Into<String>) -> Self {
        let scope = scope.into();
        self.scope = Scope::from_name(Some(&scope));
        Arc::make_mut(&mut self.config).cache_scope = Some(scope);
        self
    }

    /// Algorithm version.
    #[must_use]
    pub fn version(&self) -> Version {
        self.combinator.version()
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The shared cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<IdentityCache> {
        &self.cache
    }

    /// The identity of the empty graph.
    #[must_use]
    pub fn null(&self) -> Identity {
        self.combinator.null()
    }

    fn hasher<'a>(&'a self, provenance: Option<&'a mut Provenance>) -> NodeHasher<'a> {
        NodeHasher::new(
            self.combinator,
            &self.cache,
            &self.scope,
            &self.config.symmetric_predicates,
            provenance,
        )
    }

    /// Identity of a graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Invariant`] only on an internal bug.
    pub fn identify(&self, graph: &Graph) -> Result<Identity> {
        self.compute(graph, false).map(|i| i.identity)
    }

    /// Identity of a graph and of every part it was built from.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Invariant`] only on an internal bug.
    pub fn inspect(&self, graph: &Graph) -> Result<Inspection> {
        self.compute(graph, self.config.debug)
    }

    fn compute(&self, graph: &Graph, record: bool) -> Result<Inspection> {
        let span = debug_span!("identify", triples = graph.len(), version = %self.version());
        let _guard = span.enter();

        let mut provenance = record.then(Provenance::new);
        let mut inspection = {
            let mut hasher = self.hasher(provenance.as_mut());
            let mut part = Partition::build(graph, &mut hasher);
            resolve::resolve(&mut part, &mut hasher, self.config.large_cycle_warning)?;
            aggregate::aggregate(&part, &mut hasher)?
        };
        inspection.provenance = provenance;
        Ok(inspection)
    }

    /// Identity of a single value outside any graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BlankNode`] if the value contains a blank node, and
    /// [`Error::VersionMismatch`] for an identity of another version.
    pub fn identity_of(&self, value: impl Into<Value>) -> Result<Identity> {
        self.hasher(None).value(&value.into())
    }

    /// Hashes identities in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VersionMismatch`] if any item has another version.
    pub fn ordered_identity(&self, items: &[Identity], separator: bool) -> Result<Identity> {
        self.ensure_version(items)?;
        Ok(self.hasher(None).sequence(items.to_vec(), separator))
    }

    /// Hashes identities in byte order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VersionMismatch`] if any item has another version.
    pub fn sorted_identity(&self, items: &[Identity], separator: bool) -> Result<Identity> {
        self.ensure_version(items)?;
        let mut items = items.to_vec();
        items.sort_unstable();
        Ok(self.hasher(None).sequence(items, separator))
    }

    fn ensure_version(&self, items: &[Identity]) -> Result<()> {
        match items.iter().find(|i| i.version() != self.version()) {
            Some(other) => Err(Error::VersionMismatch {
                expected: self.version(),
                found: other.version(),
            }),
            None => Ok(()),
        }
    }

    /// Recomputes the identity of `graph` and compares.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VersionMismatch`] if `expected` was computed under
    /// another version.
    pub fn check(&self, expected: &Identity, graph: &Graph) -> Result<bool> {
        self.ensure_version(std::slice::from_ref(expected))?;
        Ok(self.identify(graph)? == *expected)
    }

    /// Identity of the subgraph describing one subject: its triples plus
    /// those of every blank node reachable from it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Invariant`] only on an internal bug.
    pub fn subject_identity(&self, graph: &Graph, subject: &Subject) -> Result<Identity> {
        self.identify(&graph.subject_graph(subject))
    }

    /// Identifies independent graphs in parallel.
    ///
    /// # Errors
    ///
    /// Returns the first error any graph produced.
    pub fn identify_all(&self, graphs: &[Graph]) -> Result<Vec<Identity>> {
        graphs.par_iter().map(|g| self.identify(g)).collect()
    }
}

impl fmt::Debug for IdentityFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityFunction")
            .field("version", &self.version())
            .field("config", &self.config)
            .field("cache", &self.cache.stats())
            .finish_non_exhaustive()
    }
}

/// A graph identity bound to the function that computed it.
#[derive(Debug, Clone)]
pub struct IdentityBNode {
    function: IdentityFunction,
    identity: Identity,
}

impl IdentityBNode {
    /// Computes and binds the identity of `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Invariant`] only on an internal bug.
    pub fn new(function: &IdentityFunction, graph: &Graph) -> Result<Self> {
        Ok(Self {
            function: function.clone(),
            identity: function.identify(graph)?,
        })
    }

    /// The bound identity.
    #[must_use]
    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// Whether `graph` has the bound identity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Invariant`] only on an internal bug.
    pub fn check(&self, graph: &Graph) -> Result<bool> {
        self.function.check(&self.identity, graph)
    }

    /// Whether `other` equals the bound identity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VersionMismatch`] if `other` has another version.
    pub fn check_identity(&self, other: &Identity) -> Result<bool> {
        self.identity.ensure_same_version(other)?;
        Ok(self.identity == *other)
    }
}

impl fmt::Display for IdentityBNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.identity.fmt(f)
    }
}

impl PartialEq for IdentityBNode {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for IdentityBNode {}

#[cfg(test)]
mod tests;
