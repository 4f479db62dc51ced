// src/engine/cluster.rs

//! One fully connected group of units and its layout pipeline.
//!
//! Stages run strictly in order, each consuming the previous one's output:
//! chain decomposition → strain scoring → path assembly → connection
//! counting → stress optimisation.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::unionfind::UnionFind;
use tracing::{debug, info};

use crate::chain::{ChainGraph, ChainSet, IsolatedChain, StrainScores};
use crate::dag::{ReachabilityMatrix, Unit, UnitGraph};
use crate::errors::{Result, TracklineError};
use crate::path::{Path, PathSet};
use crate::stress::{ConnectionMatrix, LayoutOptions, StressManager, StressReport};
use crate::types::{ChainId, PathId, UnitIdx};

/// Final row order of a cluster.
#[derive(Debug, Clone)]
pub struct Layout {
    ranking: Vec<PathId>,
    stresses: BTreeMap<PathId, i64>,
    report: StressReport,
}

impl Layout {
    /// Path ids from the top row to the bottom row.
    pub fn ranking(&self) -> &[PathId] {
        &self.ranking
    }

    /// Remaining stress of a path after optimisation.
    pub fn stress_of(&self, path: PathId) -> Result<i64> {
        self.stresses
            .get(&path)
            .copied()
            .ok_or(TracklineError::PathNotFound(path))
    }

    pub fn report(&self) -> StressReport {
        self.report
    }
}

/// The static structures of one connected cluster.
///
/// Everything here is immutable once built; only [`Cluster::layout`]
/// runs the mutable stress search, on its own copy of the matrices.
#[derive(Debug)]
pub struct Cluster<'g> {
    graph: &'g UnitGraph,
    heads: Vec<UnitIdx>,
    members: BTreeSet<UnitIdx>,
    chains: ChainSet,
    chain_graph: ChainGraph,
    scores: StrainScores,
    paths: PathSet,
    connections: ConnectionMatrix<PathId>,
}

impl<'g> Cluster<'g> {
    /// Build a cluster from unit names.
    pub fn from_ids<S: AsRef<str>>(graph: &'g UnitGraph, heads: &[S]) -> Result<Self> {
        let heads = heads
            .iter()
            .map(|id| graph.idx_of(id.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(graph, &heads)
    }

    /// Build a cluster from its head units: units nothing else in the
    /// cluster depends on. The heads and all their dependencies must form a
    /// single connected group that nothing outside depends on.
    pub fn new(graph: &'g UnitGraph, heads: &[UnitIdx]) -> Result<Self> {
        if heads.is_empty() {
            return Err(TracklineError::Empty("a cluster needs at least one head unit"));
        }
        for &head in heads {
            graph.unit(head)?;
        }

        let mut members: BTreeSet<UnitIdx> = BTreeSet::new();
        for &head in heads {
            members.insert(head);
            members.extend(graph.get(head).all_dependencies().iter().copied());
        }

        ensure_closed(graph, &members)?;
        let heads = validate_heads(graph, &members, heads)?;
        ensure_connected(graph, &members)?;

        let chains = ChainSet::decompose(graph, &heads)?;
        let chain_graph = ChainGraph::new(graph, &chains)?;
        let scores = StrainScores::new(graph, &chains, &chain_graph)?;
        let paths = PathSet::assemble(graph, &chains, &chain_graph, &scores)?;
        let connections = ConnectionMatrix::from_paths(graph, &paths)?;

        info!(
            heads = heads.len(),
            units = members.len(),
            chains = chains.len(),
            paths = paths.len(),
            "cluster assembled"
        );

        Ok(Self {
            graph,
            heads,
            members,
            chains,
            chain_graph,
            scores,
            paths,
            connections,
        })
    }

    /// Order the paths by stress minimisation.
    pub fn layout(&self, options: LayoutOptions) -> Result<Layout> {
        let mut manager = StressManager::new(self.connections.clone());
        let report = manager.optimize(options)?;

        let ranking = manager.ranking();
        let mut stresses = BTreeMap::new();
        for &id in manager.ids() {
            stresses.insert(id, manager.stress_of(&id)?);
        }
        debug!(ranking = ?ranking, "cluster ranking");

        Ok(Layout {
            ranking,
            stresses,
            report,
        })
    }

    /// Paths in the row order of `layout`.
    pub fn rows(&self, layout: &Layout) -> Result<Vec<&Path>> {
        layout
            .ranking()
            .iter()
            .map(|&id| self.paths.path(id))
            .collect()
    }

    pub fn graph(&self) -> &'g UnitGraph {
        self.graph
    }

    /// Head units, sorted.
    pub fn heads(&self) -> &[UnitIdx] {
        &self.heads
    }

    pub fn members(&self) -> &BTreeSet<UnitIdx> {
        &self.members
    }

    /// A member unit by name; units outside this cluster are not found.
    pub fn unit(&self, id: &str) -> Result<&'g Unit> {
        let unit = self.graph.unit_by_id(id)?;
        if self.members.contains(&unit.idx()) {
            Ok(unit)
        } else {
            Err(TracklineError::UnitNotFound(id.to_string()))
        }
    }

    pub fn chains(&self) -> &ChainSet {
        &self.chains
    }

    pub fn chain(&self, id: ChainId) -> Result<&IsolatedChain> {
        self.chains.chain(id)
    }

    pub fn chain_of(&self, unit: UnitIdx) -> Result<ChainId> {
        self.chains.chain_of(unit)
    }

    pub fn chain_graph(&self) -> &ChainGraph {
        &self.chain_graph
    }

    pub fn scores(&self) -> &StrainScores {
        &self.scores
    }

    pub fn paths(&self) -> &PathSet {
        &self.paths
    }

    pub fn path(&self, id: PathId) -> Result<&Path> {
        self.paths.path(id)
    }

    pub fn path_of_chain(&self, chain: ChainId) -> Result<PathId> {
        self.paths.path_of_chain(chain)
    }

    pub fn connections(&self) -> &ConnectionMatrix<PathId> {
        &self.connections
    }
}

/// Nothing outside `members` may depend on a member.
fn ensure_closed(graph: &UnitGraph, members: &BTreeSet<UnitIdx>) -> Result<()> {
    for &idx in members {
        let unit = graph.get(idx);
        if let Some(&outside) = unit.dependents().iter().find(|d| !members.contains(*d)) {
            return Err(TracklineError::UnlistedDependent {
                unit: unit.id().to_string(),
                dependent: graph.get(outside).id().to_string(),
            });
        }
    }
    Ok(())
}

/// The supplied heads must be exactly the units nothing in `members`
/// depends on. Returns them sorted.
fn validate_heads(
    graph: &UnitGraph,
    members: &BTreeSet<UnitIdx>,
    heads: &[UnitIdx],
) -> Result<Vec<UnitIdx>> {
    let matrix = ReachabilityMatrix::new(members.iter().copied(), |&idx| {
        graph.get(idx).dependencies().iter().copied().collect::<Vec<_>>()
    });
    let found = matrix.heads();

    for &head in heads {
        if found.contains(&head) {
            continue;
        }
        if let Some(&dependent) = heads
            .iter()
            .find(|&&other| graph.get(other).is_dependent_on(head))
        {
            return Err(TracklineError::MutuallyDependentHeads {
                dependent: graph.get(dependent).id().to_string(),
                head: graph.get(head).id().to_string(),
            });
        }
    }
    Ok(found)
}

/// Every member must be reachable from every other through some direction
/// of the dependency relation.
fn ensure_connected(graph: &UnitGraph, members: &BTreeSet<UnitIdx>) -> Result<()> {
    let local: BTreeMap<UnitIdx, usize> = members
        .iter()
        .enumerate()
        .map(|(i, &idx)| (idx, i))
        .collect();

    let mut sets = UnionFind::<usize>::new(local.len());
    for (&idx, &i) in &local {
        for dep in graph.get(idx).dependencies() {
            if let Some(&j) = local.get(dep) {
                sets.union(i, j);
            }
        }
    }

    let components = sets
        .into_labeling()
        .into_iter()
        .collect::<BTreeSet<_>>()
        .len();
    if components > 1 {
        return Err(TracklineError::Disconnected { components });
    }
    Ok(())
}
