// src/path/assembly.rs

//! Greedy assembly of chains into maximal rows.
//!
//! Each round looks at the chains that no remaining chain depends on,
//! walks every one of them down its least-discouraged dependencies, and
//! commits the single best candidate path. Committed chains are isolated
//! and never considered again. The loop ends when no head remains.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::chain::{ChainGraph, ChainSet, Extent, IsolatedChain, StrainScores};
use crate::dag::{ReachabilityMatrix, UnitGraph};
use crate::errors::{Result, TracklineError};
use crate::path::row::Path;
use crate::types::{ChainId, PathId, Tick, UnitIdx, density};

/// A path candidate with the scores used to rank it.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub chains: Vec<ChainId>,
    /// Sum of familiarity over every consecutive chain pair.
    pub familiarity: i64,
    /// Sum of unfamiliarity over every consecutive chain pair.
    pub unfamiliarity: u64,
    /// Sum of member chain strain.
    pub strain: u64,
    pub density: f64,
    pub presence: Tick,
}

impl Candidate {
    /// `Ordering::Less` when `self` should be preferred over `other`.
    pub fn rank(&self, other: &Self) -> Ordering {
        other
            .familiarity
            .cmp(&self.familiarity)
            .then(self.unfamiliarity.cmp(&other.unfamiliarity))
            .then(other.strain.cmp(&self.strain))
            .then(other.density.total_cmp(&self.density))
            .then(other.presence.cmp(&self.presence))
    }
}

/// All paths of a cluster in assembly order, plus the chain → path lookup.
#[derive(Debug, Clone)]
pub struct PathSet {
    paths: Vec<Path>,
    by_chain: BTreeMap<ChainId, PathId>,
}

impl PathSet {
    pub fn assemble(
        graph: &UnitGraph,
        chains: &ChainSet,
        chain_graph: &ChainGraph,
        scores: &StrainScores,
    ) -> Result<Self> {
        let assembler = Assembler {
            graph,
            chains,
            chain_graph,
            scores,
        };
        assembler.run()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn ids(&self) -> impl Iterator<Item = PathId> + '_ {
        self.paths.iter().map(|p| p.id())
    }

    pub fn path(&self, id: PathId) -> Result<&Path> {
        self.paths.get(id.0).ok_or(TracklineError::PathNotFound(id))
    }

    pub fn path_of_chain(&self, chain: ChainId) -> Result<PathId> {
        self.by_chain
            .get(&chain)
            .copied()
            .ok_or(TracklineError::ChainNotFound(chain))
    }

    /// Path containing `unit`, if any.
    pub fn path_of_unit(&self, unit: UnitIdx) -> Option<PathId> {
        self.paths.iter().find(|p| p.contains(unit)).map(|p| p.id())
    }
}

struct Assembler<'a> {
    graph: &'a UnitGraph,
    chains: &'a ChainSet,
    chain_graph: &'a ChainGraph,
    scores: &'a StrainScores,
}

impl Assembler<'_> {
    fn run(&self) -> Result<PathSet> {
        let matrix = ReachabilityMatrix::new(self.chains.ids(), |&id| {
            self.chain_graph
                .dependencies(id)
                .map(|deps| deps.iter().copied().collect::<Vec<_>>())
                .unwrap_or_default()
        });

        let mut isolated: BTreeSet<ChainId> = BTreeSet::new();
        let mut paths: Vec<Path> = Vec::new();
        let mut by_chain: BTreeMap<ChainId, PathId> = BTreeMap::new();

        loop {
            let available: Vec<usize> = matrix
                .ids()
                .iter()
                .enumerate()
                .filter(|(_, id)| !isolated.contains(*id))
                .map(|(i, _)| i)
                .collect();
            let heads = matrix.heads_of(&available)?;
            if heads.is_empty() {
                break;
            }

            let mut frontiers: BTreeMap<ChainId, Vec<Suffix>> = BTreeMap::new();
            let mut best: Option<Candidate> = None;
            for &head in &heads {
                self.extend_frontiers(head, &isolated, &mut frontiers)?;
                for suffix in frontiers.get(&head).map(Vec::as_slice).unwrap_or_default() {
                    let candidate = suffix.candidate();
                    trace!(
                        chains = ?candidate.chains,
                        familiarity = candidate.familiarity,
                        unfamiliarity = candidate.unfamiliarity,
                        strain = candidate.strain,
                        "path candidate"
                    );
                    let better = match &best {
                        Some(current) => candidate.rank(current) == Ordering::Less,
                        None => true,
                    };
                    if better {
                        best = Some(candidate);
                    }
                }
            }

            let Some(best) = best else {
                break;
            };

            let id = PathId(paths.len());
            let members: Vec<&IsolatedChain> =
                best.chains.iter().map(|&c| self.chains.get(c)).collect();
            let path = Path::new(self.graph, id, &members)?;
            for &chain in &best.chains {
                isolated.insert(chain);
                by_chain.insert(chain, id);
            }
            debug!(
                path = %id,
                chains = ?best.chains,
                units = path.units().len(),
                "committed path"
            );
            paths.push(path);
        }

        debug!(paths = paths.len(), "path assembly finished");
        Ok(PathSet { paths, by_chain })
    }

    /// Available dependencies of `chain` with the lowest unfamiliarity,
    /// then highest familiarity, in chain id order.
    fn least_discouraged(
        &self,
        chain: ChainId,
        isolated: &BTreeSet<ChainId>,
    ) -> Result<Vec<ChainId>> {
        let mut options = Vec::new();
        for &dep in self.chain_graph.dependencies(chain)? {
            if isolated.contains(&dep) {
                continue;
            }
            let key = (
                self.scores.unfamiliarity(chain, dep)?,
                Reverse(self.scores.familiarity(chain, dep)?),
            );
            options.push((key, dep));
        }

        let Some(least) = options.iter().map(|(key, _)| *key).min() else {
            return Ok(Vec::new());
        };
        Ok(options
            .into_iter()
            .filter(|(key, _)| *key == least)
            .map(|(_, dep)| dep)
            .collect())
    }

    /// Fill `frontiers` for `head` and every chain below it that is not
    /// already there.
    ///
    /// A chain's frontier holds the maximal walks starting at it, following
    /// only least-discouraged dependencies, minus those another walk from
    /// the same chain beats for any possible prefix. Frontiers only depend
    /// on the chain and the isolated set, so one round shares them between
    /// every head. Walks are kept in the order a depth-first walk taking the
    /// lowest chain id first would find them.
    fn extend_frontiers(
        &self,
        head: ChainId,
        isolated: &BTreeSet<ChainId>,
        frontiers: &mut BTreeMap<ChainId, Vec<Suffix>>,
    ) -> Result<()> {
        let mut stack: Vec<(ChainId, bool)> = vec![(head, false)];

        while let Some((chain, expanded)) = stack.pop() {
            if frontiers.contains_key(&chain) {
                continue;
            }
            let next = self.least_discouraged(chain, isolated)?;

            if !expanded {
                stack.push((chain, true));
                for &dep in next.iter().rev() {
                    if !frontiers.contains_key(&dep) {
                        stack.push((dep, false));
                    }
                }
                continue;
            }

            let extent = self.chains.get(chain).extent();
            let strain = self.scores.strain(chain)?;
            let mut found = Vec::new();
            if next.is_empty() {
                found.push(Suffix::last(chain, strain, extent));
            }
            for &dep in &next {
                let familiarity = self.scores.familiarity(chain, dep)?;
                let unfamiliarity = self.scores.unfamiliarity(chain, dep)?;
                for below in frontiers.get(&dep).map(Vec::as_slice).unwrap_or_default() {
                    found.push(below.behind(chain, familiarity, unfamiliarity, strain, extent));
                }
            }

            trace!(chain = %chain, walks = found.len(), "chain frontier");
            frontiers.insert(chain, pareto_front(found));
        }

        Ok(())
    }
}

/// A walk from some chain down to a chain with no available dependency,
/// with its summed ranking keys and extent. Chains are stored last first.
#[derive(Debug, Clone)]
struct Suffix {
    reversed: Vec<ChainId>,
    familiarity: i64,
    unfamiliarity: u64,
    strain: u64,
    presence: Tick,
    initial_start: Tick,
    end: Tick,
}

impl Suffix {
    fn last(chain: ChainId, strain: u64, extent: Extent) -> Self {
        Self {
            reversed: vec![chain],
            familiarity: 0,
            unfamiliarity: 0,
            strain,
            presence: extent.presence,
            initial_start: extent.initial_start,
            end: extent.end,
        }
    }

    /// This walk with `chain` prepended.
    fn behind(
        &self,
        chain: ChainId,
        familiarity: i64,
        unfamiliarity: u64,
        strain: u64,
        extent: Extent,
    ) -> Self {
        let mut reversed = Vec::with_capacity(self.reversed.len() + 1);
        reversed.extend_from_slice(&self.reversed);
        reversed.push(chain);
        Self {
            reversed,
            familiarity: self.familiarity.saturating_add(familiarity),
            unfamiliarity: self.unfamiliarity.saturating_add(unfamiliarity),
            strain: self.strain.saturating_add(strain),
            presence: self.presence.saturating_add(extent.presence),
            initial_start: self.initial_start.min(extent.initial_start),
            end: self.end.max(extent.end),
        }
    }

    /// Whether `self` ranks at least as well as `other` whatever prefix both
    /// get, and strictly better or found first when they could tie.
    ///
    /// The summed keys compare the same with any shared prefix. With those
    /// equal, more presence inside a span that is no wider keeps density
    /// and presence at least as high.
    fn beats(&self, other: &Self, found_first: bool) -> bool {
        let lead = self
            .familiarity
            .cmp(&other.familiarity)
            .then(other.unfamiliarity.cmp(&self.unfamiliarity))
            .then(self.strain.cmp(&other.strain));
        match lead {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => {
                self.presence >= other.presence
                    && self.initial_start >= other.initial_start
                    && self.end <= other.end
                    && (found_first || self.presence > other.presence)
            }
        }
    }

    fn candidate(&self) -> Candidate {
        Candidate {
            chains: self.reversed.iter().rev().copied().collect(),
            familiarity: self.familiarity,
            unfamiliarity: self.unfamiliarity,
            strain: self.strain,
            density: density(self.presence, self.end.saturating_sub(self.initial_start)),
            presence: self.presence,
        }
    }
}

/// Drop every walk some other walk beats, keeping discovery order.
fn pareto_front(found: Vec<Suffix>) -> Vec<Suffix> {
    let beaten: Vec<bool> = found
        .iter()
        .enumerate()
        .map(|(i, walk)| {
            found
                .iter()
                .enumerate()
                .any(|(j, other)| j != i && other.beats(walk, j < i))
        })
        .collect();
    found
        .into_iter()
        .zip(beaten)
        .filter(|(_, beaten)| !beaten)
        .map(|(walk, _)| walk)
        .collect()
}
