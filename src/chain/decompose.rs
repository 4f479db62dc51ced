// src/chain/decompose.rs

//! Partition of a cluster's units into maximal unbranched runs.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::chain::isolated::IsolatedChain;
use crate::dag::{Unit, UnitGraph};
use crate::errors::{Result, TracklineError};
use crate::types::{ChainId, UnitIdx};

/// Every chain of a cluster plus the unit → chain lookup.
#[derive(Debug, Clone)]
pub struct ChainSet {
    chains: Vec<IsolatedChain>,
    by_unit: BTreeMap<UnitIdx, ChainId>,
}

impl ChainSet {
    /// Walk depth-first from every head, extending the current run while
    /// the edge to the next unit is neither a merge nor a fork, and closing
    /// it otherwise.
    ///
    /// Uses an explicit work stack; each unit is claimed exactly once and
    /// already-claimed units are never revisited.
    pub fn decompose(graph: &UnitGraph, heads: &[UnitIdx]) -> Result<Self> {
        if heads.is_empty() {
            return Err(TracklineError::Empty("chain decomposition needs at least one head"));
        }

        let mut chains: Vec<IsolatedChain> = Vec::new();
        let mut by_unit: BTreeMap<UnitIdx, ChainId> = BTreeMap::new();
        let mut stack: Vec<UnitIdx> = heads.iter().rev().copied().collect();

        while let Some(start) = stack.pop() {
            if by_unit.contains_key(&start) {
                continue;
            }
            graph.unit(start)?;

            let id = ChainId(chains.len());
            let mut run = vec![start];
            by_unit.insert(start, id);

            let mut current = graph.get(start);
            while let Some(next) = extension(graph, current, &by_unit) {
                run.push(next);
                by_unit.insert(next, id);
                current = graph.get(next);
            }

            // Pushed in reverse so the lowest dependency is explored first.
            for &dep in current.dependencies().iter().rev() {
                if !by_unit.contains_key(&dep) {
                    stack.push(dep);
                }
            }

            trace!(chain = %id, units = run.len(), "closed chain");
            chains.push(IsolatedChain::new(graph, id, run)?);
        }

        debug!(
            chains = chains.len(),
            units = by_unit.len(),
            "decomposed cluster into isolated chains"
        );

        Ok(Self { chains, by_unit })
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn chains(&self) -> &[IsolatedChain] {
        &self.chains
    }

    pub fn ids(&self) -> impl Iterator<Item = ChainId> + '_ {
        self.chains.iter().map(|c| c.id())
    }

    pub fn chain(&self, id: ChainId) -> Result<&IsolatedChain> {
        self.chains
            .get(id.0)
            .ok_or(TracklineError::ChainNotFound(id))
    }

    pub fn chain_of(&self, unit: UnitIdx) -> Result<ChainId> {
        self.by_unit
            .get(&unit)
            .copied()
            .ok_or_else(|| TracklineError::UnitNotFound(unit.to_string()))
    }

    /// Chains are stored by id, so internal callers holding a valid id can
    /// index directly.
    pub(crate) fn get(&self, id: ChainId) -> &IsolatedChain {
        &self.chains[id.0]
    }
}

/// The unit the current run can grow into, if any.
///
/// `unit` must not be a merge point (exactly one dependency), and that
/// dependency must not be a fork point (exactly one dependent) and still
/// be unclaimed.
fn extension(
    graph: &UnitGraph,
    unit: &Unit,
    claimed: &BTreeMap<UnitIdx, ChainId>,
) -> Option<UnitIdx> {
    if unit.dependencies().len() != 1 {
        return None;
    }
    let next = *unit.dependencies().iter().next()?;
    let pure_lineage = graph.get(next).dependents().len() == 1;
    if pure_lineage && !claimed.contains_key(&next) {
        Some(next)
    } else {
        None
    }
}
