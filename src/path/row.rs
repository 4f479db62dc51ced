// src/path/row.rs

use std::collections::BTreeSet;

use crate::chain::{Extent, IsolatedChain};
use crate::dag::UnitGraph;
use crate::errors::{Result, TracklineError};
use crate::types::{ChainId, PathId, Tick, UnitIdx};

/// One non-overlapping sub-lane of a path, earliest unit first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    units: Vec<UnitIdx>,
}

impl Track {
    pub fn units(&self) -> &[UnitIdx] {
        &self.units
    }
}

/// A row: chains joined into one unbroken super-chain.
#[derive(Debug, Clone)]
pub struct Path {
    id: PathId,
    chains: Vec<ChainId>,
    units: Vec<UnitIdx>,
    extent: Extent,
    external_deps: BTreeSet<UnitIdx>,
    tracks: Vec<Track>,
}

impl Path {
    /// Join `chains` in order. Each chain's tail must directly depend on the
    /// next chain's head.
    pub fn new(graph: &UnitGraph, id: PathId, chains: &[&IsolatedChain]) -> Result<Self> {
        if chains.is_empty() {
            return Err(TracklineError::Empty("a path needs at least one chain"));
        }
        for pair in chains.windows(2) {
            let tail = graph.unit(pair[0].tail())?;
            let head = graph.unit(pair[1].head())?;
            if !tail.dependencies().contains(&head.idx()) {
                return Err(TracklineError::BrokenPath {
                    tail: tail.id().to_string(),
                    head: head.id().to_string(),
                });
            }
        }

        let units: Vec<UnitIdx> = chains
            .iter()
            .flat_map(|c| c.units().iter().copied())
            .collect();
        let members: BTreeSet<UnitIdx> = units.iter().copied().collect();
        let external_deps = chains
            .iter()
            .flat_map(|c| c.external_dependencies().iter().copied())
            .filter(|dep| !members.contains(dep))
            .collect();

        Ok(Self {
            id,
            chains: chains.iter().map(|c| c.id()).collect(),
            extent: Extent::of(graph, &units),
            tracks: stack_tracks(graph, &units),
            units,
            external_deps,
        })
    }

    pub fn id(&self) -> PathId {
        self.id
    }

    pub fn chains(&self) -> &[ChainId] {
        &self.chains
    }

    pub fn units(&self) -> &[UnitIdx] {
        &self.units
    }

    pub fn head(&self) -> UnitIdx {
        self.units[0]
    }

    pub fn tail(&self) -> UnitIdx {
        self.units[self.units.len() - 1]
    }

    pub fn contains(&self, unit: UnitIdx) -> bool {
        self.units.contains(&unit)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn initial_start(&self) -> Tick {
        self.extent.initial_start
    }

    pub fn end(&self) -> Tick {
        self.extent.end
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

    /// Dependencies of path members that live in other paths.
    pub fn external_dependencies(&self) -> &BTreeSet<UnitIdx> {
        &self.external_deps
    }
}

/// Greedy interval partitioning: earliest start first, each unit into the
/// first track that is free by its anticipated start.
fn stack_tracks(graph: &UnitGraph, units: &[UnitIdx]) -> Vec<Track> {
    let mut ordered: Vec<UnitIdx> = units.to_vec();
    ordered.sort_by_key(|&idx| {
        let unit = graph.get(idx);
        (unit.anticipated_start(), unit.end(), idx)
    });

    let mut tracks: Vec<Track> = Vec::new();
    let mut free_at: Vec<Tick> = Vec::new();
    for idx in ordered {
        let unit = graph.get(idx);
        match free_at.iter().position(|&t| t <= unit.anticipated_start()) {
            Some(lane) => {
                tracks[lane].units.push(idx);
                free_at[lane] = unit.end();
            }
            None => {
                tracks.push(Track { units: vec![idx] });
                free_at.push(unit.end());
            }
        }
    }
    tracks
}
