// src/stress/position.rs

use std::fmt::Debug;

use crate::errors::Result;
use crate::matrix::{IdIndex, Matrix};

/// Relative vertical order of rows.
///
/// Cell `(i, j)` is `1` when row `i` sits above row `j`, `-1` when it sits
/// below, and `0` on the diagonal. The matrix is antisymmetric and always
/// encodes a total order.
#[derive(Debug, Clone)]
pub struct PositionMatrix<K> {
    index: IdIndex<K>,
    cells: Matrix<i8>,
}

impl<K: Ord + Clone + Debug> PositionMatrix<K> {
    /// Rows stacked in identity order: the first id sits above all others.
    pub fn stacked(index: IdIndex<K>) -> Self {
        let n = index.len();
        let mut cells = Matrix::square(n);
        for i in 0..n {
            for j in 0..n {
                let value = match i.cmp(&j) {
                    std::cmp::Ordering::Less => 1,
                    std::cmp::Ordering::Equal => 0,
                    std::cmp::Ordering::Greater => -1,
                };
                cells.put(i, j, value);
            }
        }
        Self { index, cells }
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

    /// `1` if `a` is above `b`, `-1` if below, `0` if `a == b`.
    pub fn relation(&self, a: usize, b: usize) -> Result<i8> {
        self.cells.get(a, b)
    }

    /// Number of rows below `row` minus the number above it.
    pub fn row_sum(&self, row: usize) -> Result<i64> {
        Ok(sum_row(self.cells.row(row)?))
    }

    /// Row indices from top to bottom.
    pub fn ranking(&self) -> Vec<usize> {
        let mut order: Vec<(usize, i64)> = (0..self.len())
            .map(|i| (i, self.cells.row(i).map(sum_row).unwrap_or_default()))
            .collect();
        order.sort_by(|a, b| b.1.cmp(&a.1));
        order.into_iter().map(|(i, _)| i).collect()
    }

    /// Diagonal of the per-row sign flips a swap of `a` and `b` applies:
    /// `-1` where the two rows disagree, `1` elsewhere.
    pub fn adjustment(&self, a: usize, b: usize) -> Result<Vec<i8>> {
        let row_a = self.cells.row(a)?;
        let row_b = self.cells.row(b)?;
        Ok(row_a
            .iter()
            .zip(row_b)
            .map(|(&x, &y)| if x != y { -1 } else { 1 })
            .collect())
    }

    /// Exchange the places of rows `a` and `b`.
    ///
    /// Rows `a` and `b` flip every relation the two disagree on; every other
    /// row's relation to them is then restored from antisymmetry.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        let adjust = self.adjustment(a, b)?;
        if a == b {
            return Ok(());
        }

        for row in [a, b] {
            for (col, &flip) in adjust.iter().enumerate() {
                let value = self.cells.at(row, col) * flip;
                self.cells.put(row, col, value);
            }
        }
        for k in 0..self.len() {
            if k == a || k == b {
                continue;
            }
            self.cells.put(k, a, -self.cells.at(a, k));
            self.cells.put(k, b, -self.cells.at(b, k));
        }
        Ok(())
    }

    /// Zero diagonal and `M[i][j] == -M[j][i]` everywhere.
    pub fn is_antisymmetric(&self) -> bool {
        let n = self.len();
        (0..n).all(|i| {
            self.cells.at(i, i) == 0 && (0..n).all(|j| self.cells.at(i, j) == -self.cells.at(j, i))
        })
    }

    pub(crate) fn at(&self, a: usize, b: usize) -> i8 {
        self.cells.at(a, b)
    }
}

fn sum_row(row: &[i8]) -> i64 {
    row.iter().map(|&v| i64::from(v)).sum()
}
