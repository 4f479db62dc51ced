// src/chain/isolated.rs

use std::collections::BTreeSet;

use crate::dag::UnitGraph;
use crate::errors::{Result, TracklineError};
use crate::types::{ChainId, Tick, UnitIdx, density};

/// Aggregate timing of an ordered run of units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    /// Sum of every unit's presence, saturating.
    pub presence: Tick,
    /// Earliest anticipated start.
    pub initial_start: Tick,
    /// Latest end.
    pub end: Tick,
}

impl Extent {
    pub(crate) fn of(graph: &UnitGraph, units: &[UnitIdx]) -> Self {
        let mut presence: Tick = 0;
        let mut initial_start = Tick::MAX;
        let mut end = Tick::MIN;
        for &idx in units {
            let unit = graph.get(idx);
            presence = presence.saturating_add(unit.presence());
            initial_start = initial_start.min(unit.anticipated_start());
            end = end.max(unit.end());
        }
        Self {
            presence,
            initial_start,
            end,
        }
    }

    /// Saturates at `Tick::MAX` for extents wider than a `Tick` can hold.
    pub fn time_span(&self) -> Tick {
        self.end.saturating_sub(self.initial_start)
    }

    pub fn density(&self) -> f64 {
        density(self.presence, self.time_span())
    }
}

/// A maximal unbranched run of units.
///
/// Units are ordered dependent-first: every unit but the last has the next
/// unit as its only direct dependency, and is that unit's only dependent.
#[derive(Debug, Clone)]
pub struct IsolatedChain {
    id: ChainId,
    units: Vec<UnitIdx>,
    extent: Extent,
    external_deps: BTreeSet<UnitIdx>,
}

impl IsolatedChain {
    pub fn new(graph: &UnitGraph, id: ChainId, units: Vec<UnitIdx>) -> Result<Self> {
        if units.is_empty() {
            return Err(TracklineError::Empty("a chain needs at least one unit"));
        }
        for &idx in &units {
            graph.unit(idx)?;
        }

        for pair in units.windows(2) {
            let (from, to) = (graph.get(pair[0]), graph.get(pair[1]));
            let sole_dep = from.dependencies().len() == 1 && from.dependencies().contains(&to.idx());
            let sole_dependent =
                to.dependents().len() == 1 && to.dependents().contains(&from.idx());
            if !(sole_dep && sole_dependent) {
                return Err(TracklineError::BrokenChain {
                    from: from.id().to_string(),
                    to: to.id().to_string(),
                });
            }
        }

        let members: BTreeSet<UnitIdx> = units.iter().copied().collect();
        let external_deps = units
            .iter()
            .flat_map(|&idx| graph.get(idx).dependencies().iter().copied())
            .filter(|dep| !members.contains(dep))
            .collect();

        Ok(Self {
            id,
            extent: Extent::of(graph, &units),
            units,
            external_deps,
        })
    }

    pub fn id(&self) -> ChainId {
        self.id
    }

    pub fn units(&self) -> &[UnitIdx] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// First unit: the one nothing else in the chain depends on.
    pub fn head(&self) -> UnitIdx {
        self.units[0]
    }

    /// Last unit: the only one that can have dependencies outside the chain.
    pub fn tail(&self) -> UnitIdx {
        self.units[self.units.len() - 1]
    }

    pub fn contains(&self, unit: UnitIdx) -> bool {
        self.units.contains(&unit)
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn presence(&self) -> Tick {
        self.extent.presence
    }

    pub fn time_span(&self) -> Tick {
        self.extent.time_span()
    }

    pub fn density(&self) -> f64 {
        self.extent.density()
    }

    pub fn external_dependencies(&self) -> &BTreeSet<UnitIdx> {
        &self.external_deps
    }
}
