// src/chain/strain.rs

//! Chain-level dependency graph and centrality scoring.
//!
//! Path counts between chains are the unit-level counts between one chain's
//! tail and the other chain's head; inside a chain there is only ever one
//! route, so nothing is lost by contracting.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::chain::decompose::ChainSet;
use crate::dag::UnitGraph;
use crate::errors::{Result, TracklineError};
use crate::types::ChainId;

/// Direct and transitive chain → chain dependencies.
#[derive(Debug, Clone)]
pub struct ChainGraph {
    direct: Vec<BTreeSet<ChainId>>,
    transitive: Vec<BTreeSet<ChainId>>,
    dependents: Vec<BTreeSet<ChainId>>,
    heads: Vec<ChainId>,
}

impl ChainGraph {
    pub fn new(graph: &UnitGraph, chains: &ChainSet) -> Result<Self> {
        let n = chains.len();
        let mut direct = vec![BTreeSet::new(); n];
        let mut transitive = vec![BTreeSet::new(); n];
        let mut dependents = vec![BTreeSet::new(); n];

        for chain in chains.chains() {
            let tail = graph.get(chain.tail());
            for &dep in tail.dependencies() {
                let target = chains.chain_of(dep)?;
                direct[chain.id().0].insert(target);
                dependents[target.0].insert(chain.id());
            }
            for &dep in tail.all_dependencies() {
                transitive[chain.id().0].insert(chains.chain_of(dep)?);
            }
        }

        let heads = (0..n)
            .filter(|&i| dependents[i].is_empty())
            .map(ChainId)
            .collect();

        Ok(Self {
            direct,
            transitive,
            dependents,
            heads,
        })
    }

    pub fn len(&self) -> usize {
        self.direct.len()
    }

    pub fn is_empty(&self) -> bool {
        self.direct.is_empty()
    }

    /// Chains nothing depends on.
    pub fn heads(&self) -> &[ChainId] {
        &self.heads
    }

    pub fn dependencies(&self, id: ChainId) -> Result<&BTreeSet<ChainId>> {
        self.direct.get(id.0).ok_or(TracklineError::ChainNotFound(id))
    }

    pub fn all_dependencies(&self, id: ChainId) -> Result<&BTreeSet<ChainId>> {
        self.transitive
            .get(id.0)
            .ok_or(TracklineError::ChainNotFound(id))
    }

    pub fn dependents(&self, id: ChainId) -> Result<&BTreeSet<ChainId>> {
        self.dependents
            .get(id.0)
            .ok_or(TracklineError::ChainNotFound(id))
    }
}

/// Strain and familiarity scores for every chain of one cluster.
///
/// `reach(c)` is the number of paths from the cluster's head chains down
/// to `c`, where a head chain reaches itself once.
#[derive(Debug, Clone)]
pub struct StrainScores {
    attachment: Vec<BTreeMap<ChainId, u64>>,
    incoming: Vec<u64>,
    reach: Vec<u64>,
    strain: Vec<u64>,
}

impl StrainScores {
    pub fn new(graph: &UnitGraph, chains: &ChainSet, chain_graph: &ChainGraph) -> Result<Self> {
        let n = chains.len();

        let mut attachment = Vec::with_capacity(n);
        for chain in chains.chains() {
            let tail = graph.get(chain.tail());
            let mut counts = BTreeMap::new();
            for &target in chain_graph.all_dependencies(chain.id())? {
                let head = chains.get(target).head();
                counts.insert(target, tail.path_count_to(head));
            }
            attachment.push(counts);
        }

        let mut incoming = vec![0u64; n];
        for &head in chain_graph.heads() {
            for (&target, &count) in &attachment[head.0] {
                incoming[target.0] = incoming[target.0].saturating_add(count);
            }
        }

        let mut reach = incoming.clone();
        for &head in chain_graph.heads() {
            reach[head.0] = reach[head.0].saturating_add(1);
        }

        let strain: Vec<u64> = (0..n)
            .map(|i| {
                let outgoing = attachment[i].values().fold(0u64, |acc, &c| acc.saturating_add(c));
                incoming[i].saturating_add(outgoing)
            })
            .collect();

        for (i, s) in strain.iter().enumerate() {
            trace!(chain = i, strain = s, incoming = incoming[i], "chain strain");
        }
        debug!(chains = n, heads = chain_graph.heads().len(), "scored chain strain");

        Ok(Self {
            attachment,
            incoming,
            reach,
            strain,
        })
    }

    /// Incoming paths from head chains plus outgoing paths to dependencies.
    pub fn strain(&self, id: ChainId) -> Result<u64> {
        self.strain.get(id.0).copied().ok_or(TracklineError::ChainNotFound(id))
    }

    /// Paths reaching this chain from the cluster's head chains (0 for a head).
    pub fn incoming(&self, id: ChainId) -> Result<u64> {
        self.incoming.get(id.0).copied().ok_or(TracklineError::ChainNotFound(id))
    }

    pub fn reach(&self, id: ChainId) -> Result<u64> {
        self.reach.get(id.0).copied().ok_or(TracklineError::ChainNotFound(id))
    }

    /// Sum of path counts to every chain this one depends on.
    pub fn attachment_to_dependencies(&self, id: ChainId) -> Result<u64> {
        let counts = self.counts(id)?;
        Ok(counts.values().fold(0u64, |acc, &c| acc.saturating_add(c)))
    }

    /// Paths from `from` down to `to`; 0 if `to` is not a dependency.
    pub fn path_count(&self, from: ChainId, to: ChainId) -> Result<u64> {
        self.counts(to)?;
        Ok(self.counts(from)?.get(&to).copied().unwrap_or(0))
    }

    /// Head-to-`candidate` paths that pass through `observer`.
    pub fn familiar(&self, observer: ChainId, candidate: ChainId) -> Result<u64> {
        Ok(self
            .path_count(observer, candidate)?
            .saturating_mul(self.reach(observer)?))
    }

    /// Head-to-`candidate` paths that do not pass through `observer`.
    pub fn unfamiliarity(&self, observer: ChainId, candidate: ChainId) -> Result<u64> {
        Ok(self
            .reach(candidate)?
            .saturating_sub(self.familiar(observer, candidate)?))
    }

    /// Familiar minus unfamiliar paths. High values mean the candidate is
    /// mostly reached through the observer; negative values mean it is
    /// contended by unrelated heads.
    pub fn familiarity(&self, observer: ChainId, candidate: ChainId) -> Result<i64> {
        let familiar = self.familiar(observer, candidate)?;
        let unfamiliar = self.unfamiliarity(observer, candidate)?;
        Ok(to_signed(familiar) - to_signed(unfamiliar))
    }

    fn counts(&self, id: ChainId) -> Result<&BTreeMap<ChainId, u64>> {
        self.attachment
            .get(id.0)
            .ok_or(TracklineError::ChainNotFound(id))
    }
}

fn to_signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
