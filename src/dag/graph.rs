// src/dag/graph.rs

use std::collections::{BTreeMap, BTreeSet};

use petgraph::unionfind::UnionFind;
use tracing::{debug, trace};

use crate::config::model::ConfigFile;
use crate::config::validate::topological_order;
use crate::errors::{Result, TracklineError};
use crate::types::{Tick, UnitId, UnitIdx};

/// One schedulable item: a time span plus explicit direct dependencies.
///
/// Everything derived from the dependency relation (transitive dependencies,
/// path counts) is computed once when the unit is added to its graph.
#[derive(Debug, Clone)]
pub struct Unit {
    idx: UnitIdx,
    id: UnitId,
    anticipated_start: Tick,
    end: Tick,
    /// Direct dependencies.
    deps: BTreeSet<UnitIdx>,
    /// Direct dependents. Grows as later units are added to the graph.
    dependents: BTreeSet<UnitIdx>,
    /// Transitive closure of `deps`.
    all_deps: BTreeSet<UnitIdx>,
    /// Number of distinct paths to every transitive dependency.
    attachment: BTreeMap<UnitIdx, u64>,
}

impl Unit {
    pub fn idx(&self) -> UnitIdx {
        self.idx
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn anticipated_start(&self) -> Tick {
        self.anticipated_start
    }

    pub fn end(&self) -> Tick {
        self.end
    }

    /// `end - anticipated_start`. Construction guarantees it fits in a `Tick`.
    pub fn presence(&self) -> Tick {
        self.end.saturating_sub(self.anticipated_start)
    }

    pub fn dependencies(&self) -> &BTreeSet<UnitIdx> {
        &self.deps
    }

    pub fn all_dependencies(&self) -> &BTreeSet<UnitIdx> {
        &self.all_deps
    }

    pub fn dependents(&self) -> &BTreeSet<UnitIdx> {
        &self.dependents
    }

    pub fn is_dependent_on(&self, other: UnitIdx) -> bool {
        self.all_deps.contains(&other)
    }

    /// Number of distinct paths from this unit down to `other`.
    ///
    /// A direct dependency that is also reachable through another direct
    /// dependency does not count as an extra path of length one; it is only
    /// reached through the longer route. Returns 0 when `other` is not a
    /// dependency at all.
    pub fn path_count_to(&self, other: UnitIdx) -> u64 {
        self.attachment.get(&other).copied().unwrap_or(0)
    }

    /// Path counts to every transitive dependency.
    pub fn attachment(&self) -> impl Iterator<Item = (UnitIdx, u64)> + '_ {
        self.attachment.iter().map(|(&idx, &n)| (idx, n))
    }
}

/// Arena of units in dependencies-first order.
///
/// A unit can only name dependencies that are already in the graph, so the
/// graph is acyclic by construction.
#[derive(Debug, Clone, Default)]
pub struct UnitGraph {
    units: Vec<Unit>,
    by_id: BTreeMap<UnitId, UnitIdx>,
}

impl UnitGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a validated [`ConfigFile`], inserting units in
    /// topological order.
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let mut graph = Self::new();
        for name in topological_order(&cfg.unit)? {
            let unit = cfg.unit.get(&name).ok_or_else(|| {
                TracklineError::ConfigError(format!("unit '{name}' vanished during ordering"))
            })?;
            graph.add_unit(name.clone(), unit.start, unit.end, &unit.after)?;
        }
        debug!(units = graph.len(), "built unit graph from config");
        Ok(graph)
    }

    /// Add a unit whose dependencies are all already present.
    pub fn add_unit<I, S>(
        &mut self,
        id: impl Into<UnitId>,
        anticipated_start: Tick,
        end: Tick,
        deps: I,
    ) -> Result<UnitIdx>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let id = id.into();
        if self.by_id.contains_key(&id) {
            return Err(TracklineError::DuplicateUnit(id));
        }
        if end.checked_sub(anticipated_start).is_none_or(|presence| presence < 0) {
            return Err(TracklineError::InvalidSpan {
                unit: id,
                start: anticipated_start,
                end,
            });
        }

        let mut direct = BTreeSet::new();
        for dep in deps {
            let dep = dep.as_ref();
            match self.by_id.get(dep) {
                Some(&idx) => {
                    direct.insert(idx);
                }
                None => {
                    return Err(TracklineError::UnknownDependency {
                        unit: id,
                        dependency: dep.to_string(),
                    });
                }
            }
        }

        let mut all_deps = BTreeSet::new();
        for &d in &direct {
            all_deps.insert(d);
            all_deps.extend(self.units[d.0].all_deps.iter().copied());
        }

        // A direct dependency already reachable through a sibling is only
        // counted through that sibling.
        let mut attachment: BTreeMap<UnitIdx, u64> = BTreeMap::new();
        for &d in &direct {
            let redundant = direct
                .iter()
                .any(|&other| other != d && self.units[other.0].all_deps.contains(&d));
            if redundant {
                trace!(unit = %id, dep = %self.units[d.0].id, "skipping redundant direct edge");
                continue;
            }
            *attachment.entry(d).or_insert(0) += 1;
            for (&ancestor, &count) in &self.units[d.0].attachment {
                let slot = attachment.entry(ancestor).or_insert(0);
                *slot = slot.saturating_add(count);
            }
        }

        let idx = UnitIdx(self.units.len());
        for &d in &direct {
            self.units[d.0].dependents.insert(idx);
        }
        self.by_id.insert(id.clone(), idx);
        self.units.push(Unit {
            idx,
            id,
            anticipated_start,
            end,
            deps: direct,
            dependents: BTreeSet::new(),
            all_deps,
            attachment,
        });
        Ok(idx)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn unit(&self, idx: UnitIdx) -> Result<&Unit> {
        self.units.get(idx.0).ok_or(TracklineError::IndexOutOfRange {
            index: idx.0,
            len: self.units.len(),
        })
    }

    pub fn unit_by_id(&self, id: &str) -> Result<&Unit> {
        let idx = self.idx_of(id)?;
        Ok(&self.units[idx.0])
    }

    pub fn idx_of(&self, id: &str) -> Result<UnitIdx> {
        self.by_id
            .get(id)
            .copied()
            .ok_or_else(|| TracklineError::UnitNotFound(id.to_string()))
    }

    /// Units nothing depends on.
    pub fn heads(&self) -> Vec<UnitIdx> {
        self.units
            .iter()
            .filter(|u| u.dependents.is_empty())
            .map(|u| u.idx)
            .collect()
    }

    /// Heads of every weakly connected component, one entry per component,
    /// ordered by the earliest-inserted unit of each component.
    pub fn clusters(&self) -> Vec<Vec<UnitIdx>> {
        let mut sets = UnionFind::<usize>::new(self.units.len());
        for unit in &self.units {
            for dep in &unit.deps {
                sets.union(unit.idx.0, dep.0);
            }
        }

        let mut by_root: BTreeMap<usize, usize> = BTreeMap::new();
        let mut clusters: Vec<Vec<UnitIdx>> = Vec::new();
        for unit in &self.units {
            let root = sets.find_mut(unit.idx.0);
            let slot = *by_root.entry(root).or_insert_with(|| {
                clusters.push(Vec::new());
                clusters.len() - 1
            });
            if unit.dependents.is_empty() {
                clusters[slot].push(unit.idx);
            }
        }

        debug!(clusters = clusters.len(), "split unit graph into clusters");
        clusters
    }

    /// Internal accessor for indices that are known to belong to this graph.
    pub(crate) fn get(&self, idx: UnitIdx) -> &Unit {
        &self.units[idx.0]
    }
}
