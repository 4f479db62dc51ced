// src/stress/connection.rs

use std::collections::BTreeMap;
use std::fmt::Debug;

use tracing::debug;

use crate::dag::UnitGraph;
use crate::errors::{Result, TracklineError};
use crate::matrix::{IdIndex, Matrix};
use crate::path::PathSet;
use crate::types::{PathId, UnitIdx};

/// Symmetric count of direct dependency edges between every pair of rows.
#[derive(Debug, Clone)]
pub struct ConnectionMatrix<K> {
    index: IdIndex<K>,
    counts: Matrix<u64>,
}

impl<K: Ord + Clone + Debug> ConnectionMatrix<K> {
    /// An unconnected matrix over `ids`.
    pub fn new(ids: impl IntoIterator<Item = K>) -> Self {
        let index = IdIndex::new(ids);
        let counts = Matrix::square(index.len());
        Self { index, counts }
    }

    pub fn index(&self) -> &IdIndex<K> {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Add `strength` edges between the rows at `a` and `b`, both ways.
    /// Self-connections are ignored.
    pub fn connect(&mut self, a: usize, b: usize, strength: u64) -> Result<()> {
        let current = self.counts.get(a, b)?;
        if a == b {
            return Ok(());
        }
        self.counts.put(a, b, current.saturating_add(strength));
        self.counts.put(b, a, current.saturating_add(strength));
        Ok(())
    }

    pub fn connect_ids(&mut self, a: &K, b: &K, strength: u64) -> Result<()> {
        let (a, b) = (self.position(a)?, self.position(b)?);
        self.connect(a, b, strength)
    }

    pub fn strength(&self, a: usize, b: usize) -> Result<u64> {
        self.counts.get(a, b)
    }

    pub fn strength_between(&self, a: &K, b: &K) -> Result<u64> {
        self.strength(self.position(a)?, self.position(b)?)
    }

    pub(crate) fn at(&self, a: usize, b: usize) -> u64 {
        self.counts.at(a, b)
    }

    fn position(&self, id: &K) -> Result<usize> {
        self.index
            .position(id)
            .ok_or_else(|| TracklineError::IdentityNotFound(format!("{id:?}")))
    }
}

impl ConnectionMatrix<PathId> {
    /// Count every unit → dependency edge whose ends sit in different paths.
    pub fn from_paths(graph: &UnitGraph, paths: &PathSet) -> Result<Self> {
        let mut matrix = Self::new(paths.ids());

        let mut owner: BTreeMap<UnitIdx, usize> = BTreeMap::new();
        for path in paths.paths() {
            let row = matrix.position(&path.id())?;
            for &unit in path.units() {
                owner.insert(unit, row);
            }
        }

        for path in paths.paths() {
            let row = matrix.position(&path.id())?;
            for &unit in path.units() {
                for dep in graph.unit(unit)?.dependencies() {
                    if !path.external_dependencies().contains(dep) {
                        continue;
                    }
                    if let Some(&other) = owner.get(dep) {
                        matrix.connect(row, other, 1)?;
                    }
                }
            }
        }

        debug!(paths = matrix.len(), "built inter-path connection matrix");
        Ok(matrix)
    }
}
