// src/matrix.rs

//! Dense square matrices keyed by a stable, sorted identity ordering.
//!
//! Both the reachability helper and the stress engine index their matrices
//! by position in a sorted identity list; [`IdIndex`] owns that ordering and
//! [`Matrix`] is the row-major storage behind it.

use crate::errors::{Result, TracklineError};

/// Sorted, de-duplicated identity list. Position in the list is the matrix
/// index of an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdIndex<K> {
    ids: Vec<K>,
}

impl<K: Ord + Clone> IdIndex<K> {
    pub fn new(ids: impl IntoIterator<Item = K>) -> Self {
        let mut ids: Vec<K> = ids.into_iter().collect();
        ids.sort();
        ids.dedup();
        Self { ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[K] {
        &self.ids
    }

    pub fn position(&self, id: &K) -> Option<usize> {
        self.ids.binary_search(id).ok()
    }

    pub fn id(&self, index: usize) -> Result<&K> {
        self.ids.get(index).ok_or(TracklineError::IndexOutOfRange {
            index,
            len: self.ids.len(),
        })
    }
}

/// Row-major square matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T: Copy + Default> Matrix<T> {
    pub fn square(size: usize) -> Self {
        Self {
            size,
            cells: vec![T::default(); size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.check(row)?;
        self.check(col)?;
        Ok(self.at(row, col))
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.check(row)?;
        self.check(col)?;
        self.put(row, col, value);
        Ok(())
    }

    pub fn row(&self, row: usize) -> Result<&[T]> {
        self.check(row)?;
        Ok(&self.cells[row * self.size..(row + 1) * self.size])
    }

    pub(crate) fn at(&self, row: usize, col: usize) -> T {
        self.cells[row * self.size + col]
    }

    pub(crate) fn put(&mut self, row: usize, col: usize, value: T) {
        self.cells[row * self.size + col] = value;
    }

    fn check(&self, index: usize) -> Result<()> {
        if index < self.size {
            Ok(())
        } else {
            Err(TracklineError::IndexOutOfRange {
                index,
                len: self.size,
            })
        }
    }
}
