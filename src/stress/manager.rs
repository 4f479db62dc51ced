// src/stress/manager.rs

//! Local search over row orderings.
//!
//! The stress of a row is the diagonal entry of `position × connection`:
//! connections to rows below it minus connections to rows above it.
//! Positive stress pulls a row down, negative stress pulls it up.

use std::fmt::Debug;

use tracing::{debug, info};

use crate::errors::{Result, TracklineError};
use crate::matrix::Matrix;
use crate::stress::connection::ConnectionMatrix;
use crate::stress::position::PositionMatrix;

/// Which optimisation phases to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Phase 1: swap any pair while it lowers total absolute stress.
    pub balance: bool,
    /// Phase 2: swap unconnected neighbours to shorten edges at no stress cost.
    pub compact: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            balance: true,
            compact: true,
        }
    }
}

/// Outcome of [`StressManager::optimize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StressReport {
    pub initial_total: i64,
    pub final_total: i64,
    pub balance_swaps: usize,
    pub compaction_swaps: usize,
}

/// Owns the position, connection and stress matrices of one cluster.
///
/// The stress matrix is recomputed after every committed swap.
#[derive(Debug, Clone)]
pub struct StressManager<K> {
    position: PositionMatrix<K>,
    connections: ConnectionMatrix<K>,
    stress: Matrix<i64>,
}

impl<K: Ord + Clone + Debug> StressManager<K> {
    /// Start from rows stacked in identity order.
    pub fn new(connections: ConnectionMatrix<K>) -> Self {
        let position = PositionMatrix::stacked(connections.index().clone());
        let stress = product(&position, &connections);
        Self {
            position,
            connections,
            stress,
        }
    }

    pub fn ids(&self) -> &[K] {
        self.position.index().ids()
    }

    pub fn len(&self) -> usize {
        self.position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    pub fn position(&self) -> &PositionMatrix<K> {
        &self.position
    }

    pub fn connections(&self) -> &ConnectionMatrix<K> {
        &self.connections
    }

    /// Full `position × connection` product.
    pub fn stress_matrix(&self) -> &Matrix<i64> {
        &self.stress
    }

    pub fn stress_at(&self, row: usize) -> Result<i64> {
        self.stress.get(row, row)
    }

    pub fn stress_of(&self, id: &K) -> Result<i64> {
        self.stress_at(self.position_of(id)?)
    }

    /// Stress of every row, in identity order.
    pub fn stresses(&self) -> Vec<i64> {
        (0..self.len()).map(|i| self.stress.at(i, i)).collect()
    }

    pub fn total_absolute_stress(&self) -> i64 {
        absolute_total(&self.stresses())
    }

    /// Row stresses if `a` and `b` swapped places, without committing.
    ///
    /// Only `a`, `b` and the rows between them change, so this costs one
    /// pass over the two rows instead of a full matrix product.
    pub fn stresses_after_swap(&self, a: usize, b: usize) -> Result<Vec<i64>> {
        let adjust = self.position.adjustment(a, b)?;
        let mut stresses = self.stresses();
        if a == b {
            return Ok(stresses);
        }

        for row in [a, b] {
            stresses[row] = (0..self.len())
                .map(|k| {
                    i64::from(self.position.at(row, k) * adjust[k]) * self.weight(k, row)
                })
                .sum();
        }
        for k in 0..self.len() {
            if k == a || k == b || adjust[k] == 1 {
                continue;
            }
            let lost = i64::from(self.position.at(k, a)) * self.weight(a, k)
                + i64::from(self.position.at(k, b)) * self.weight(b, k);
            stresses[k] -= 2 * lost;
        }
        Ok(stresses)
    }

    /// Commit a swap of rows `a` and `b` and recompute the stress matrix.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        self.position.swap(a, b)?;
        self.stress = product(&self.position, &self.connections);
        Ok(())
    }

    pub fn swap_ids(&mut self, a: &K, b: &K) -> Result<()> {
        let (a, b) = (self.position_of(a)?, self.position_of(b)?);
        self.swap(a, b)
    }

    /// Phase 1: evaluate every unordered pair, commit the first best swap
    /// if it lowers total absolute stress, and repeat until none does.
    /// Returns the number of committed swaps.
    pub fn balance(&mut self) -> Result<usize> {
        let n = self.len();
        let mut swaps = 0;
        loop {
            let current = self.total_absolute_stress();
            let mut best: Option<(i64, usize, usize)> = None;
            for a in 0..n {
                for b in (a + 1)..n {
                    let total = absolute_total(&self.stresses_after_swap(a, b)?);
                    if best.is_none_or(|(lowest, _, _)| total < lowest) {
                        best = Some((total, a, b));
                    }
                }
            }

            match best {
                Some((total, a, b)) if total < current => {
                    self.swap(a, b)?;
                    swaps += 1;
                    debug!(
                        first = ?self.ids()[a],
                        second = ?self.ids()[b],
                        from = current,
                        to = total,
                        "balance swap"
                    );
                }
                _ => break,
            }
        }
        Ok(swaps)
    }

    /// Phase 2: scan neighbouring rows top to bottom and swap a pair when
    /// the swap leaves both rows' stress unchanged and the upper row is
    /// pulled down harder than the lower one. Repeats until a full scan
    /// makes no swap. Returns the number of committed swaps.
    ///
    /// A pair is swapped when the upper row has the higher stress, not the
    /// lower one: a neutral swap changes the summed edge length by
    /// `stress(lower) - stress(upper)`, so only this direction shortens
    /// edges. After the phase, lower-stressed rows sit above
    /// higher-stressed neighbours wherever a neutral swap allowed it.
    pub fn compact(&mut self) -> Result<usize> {
        let mut swaps = 0;
        'scan: loop {
            let order = self.position.ranking();
            let stresses = self.stresses();
            for pair in order.windows(2) {
                let (upper, lower) = (pair[0], pair[1]);
                let after = self.stresses_after_swap(upper, lower)?;
                let neutral = after[upper] == stresses[upper] && after[lower] == stresses[lower];
                if neutral && stresses[upper] > stresses[lower] {
                    self.swap(upper, lower)?;
                    swaps += 1;
                    debug!(
                        upper = ?self.ids()[upper],
                        lower = ?self.ids()[lower],
                        "compaction swap"
                    );
                    continue 'scan;
                }
            }
            break;
        }
        Ok(swaps)
    }

    /// Run the enabled phases in order.
    pub fn optimize(&mut self, options: LayoutOptions) -> Result<StressReport> {
        let initial_total = self.total_absolute_stress();
        let balance_swaps = if options.balance { self.balance()? } else { 0 };
        let compaction_swaps = if options.compact { self.compact()? } else { 0 };
        let report = StressReport {
            initial_total,
            final_total: self.total_absolute_stress(),
            balance_swaps,
            compaction_swaps,
        };
        info!(
            rows = self.len(),
            initial_total = report.initial_total,
            final_total = report.final_total,
            balance_swaps,
            compaction_swaps,
            "stress optimisation finished"
        );
        Ok(report)
    }

    /// Identities from top row to bottom row.
    pub fn ranking(&self) -> Vec<K> {
        self.position
            .ranking()
            .into_iter()
            .map(|i| self.ids()[i].clone())
            .collect()
    }

    fn weight(&self, a: usize, b: usize) -> i64 {
        i64::try_from(self.connections.at(a, b)).unwrap_or(i64::MAX)
    }

    fn position_of(&self, id: &K) -> Result<usize> {
        self.position
            .index()
            .position(id)
            .ok_or_else(|| TracklineError::IdentityNotFound(format!("{id:?}")))
    }
}

fn product<K: Ord + Clone + Debug>(
    position: &PositionMatrix<K>,
    connections: &ConnectionMatrix<K>,
) -> Matrix<i64> {
    let n = position.len();
    let mut out = Matrix::square(n);
    for i in 0..n {
        for j in 0..n {
            let value: i64 = (0..n)
                .map(|k| {
                    let weight = i64::try_from(connections.at(k, j)).unwrap_or(i64::MAX);
                    i64::from(position.at(i, k)) * weight
                })
                .sum();
            out.put(i, j, value);
        }
    }
    out
}

fn absolute_total(stresses: &[i64]) -> i64 {
    stresses.iter().map(|s| s.abs()).sum()
}
