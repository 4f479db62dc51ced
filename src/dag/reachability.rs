// src/dag/reachability.rs

//! Single-step dependency matrix over a fixed, sorted set of identities.
//!
//! Row `i`, column `j` is set when `ids[i]` directly depends on `ids[j]`, so
//! a head (nothing depends on it) is a column with no set cell.

use std::fmt::Debug;

use crate::errors::Result;
use crate::matrix::{IdIndex, Matrix};

#[derive(Debug, Clone)]
pub struct ReachabilityMatrix<K> {
    index: IdIndex<K>,
    cells: Matrix<bool>,
}

impl<K: Ord + Clone + Debug> ReachabilityMatrix<K> {
    /// Build the matrix for `ids`. Dependencies outside `ids` are ignored.
    pub fn new<F, I>(ids: impl IntoIterator<Item = K>, mut deps_of: F) -> Self
    where
        F: FnMut(&K) -> I,
        I: IntoIterator<Item = K>,
    {
        let index = IdIndex::new(ids);
        let mut cells = Matrix::square(index.len());
        for (row, id) in index.ids().iter().enumerate() {
            for dep in deps_of(id) {
                if let Some(col) = index.position(&dep) {
                    cells.put(row, col, true);
                }
            }
        }
        Self { index, cells }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn ids(&self) -> &[K] {
        self.index.ids()
    }

    pub fn position(&self, id: &K) -> Option<usize> {
        self.index.position(id)
    }

    /// Whether the entry at `dependent` directly depends on the one at `dependency`.
    pub fn depends(&self, dependent: usize, dependency: usize) -> Result<bool> {
        self.cells.get(dependent, dependency)
    }

    /// The induced matrix over the entries at `keep` (indices into this matrix).
    pub fn sub_matrix(&self, keep: &[usize]) -> Result<Self> {
        let mut picked: Vec<(K, usize)> = Vec::with_capacity(keep.len());
        for &i in keep {
            picked.push((self.index.id(i)?.clone(), i));
        }
        picked.sort();
        picked.dedup();

        // `IdIndex` sorts the same way, so row `n` of the new matrix is `picked[n]`.
        let index = IdIndex::new(picked.iter().map(|(id, _)| id.clone()));
        let mut cells = Matrix::square(index.len());
        for (row, &(_, from)) in picked.iter().enumerate() {
            for (col, &(_, to)) in picked.iter().enumerate() {
                if self.cells.at(from, to) {
                    cells.put(row, col, true);
                }
            }
        }
        Ok(Self { index, cells })
    }

    /// Entries nothing in this matrix depends on, in id order.
    pub fn heads(&self) -> Vec<K> {
        let n = self.len();
        (0..n)
            .filter(|&col| (0..n).all(|row| !self.cells.at(row, col)))
            .map(|col| self.index.ids()[col].clone())
            .collect()
    }

    /// Heads of the sub-matrix induced by `keep`.
    pub fn heads_of(&self, keep: &[usize]) -> Result<Vec<K>> {
        Ok(self.sub_matrix(keep)?.heads())
    }
}
