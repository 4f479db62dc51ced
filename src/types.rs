// src/types.rs

//! Identity types shared by every stage of the layout pipeline.

use std::fmt;

/// Caller-facing identity of a dependency unit (the `[unit.<name>]` key).
pub type UnitId = String;

/// A point in time. The engine only ever subtracts and compares instants,
/// so any monotonic integer clock works (seconds, days, sprint numbers, ...).
pub type Tick = i64;

/// Arena index of a unit inside its [`UnitGraph`](crate::dag::UnitGraph).
///
/// Indices are assigned in insertion order, which is always a valid
/// dependencies-first order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitIdx(pub usize);

/// Identity of an isolated chain, assigned in discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChainId(pub usize);

/// Identity of a path (row), assigned in assembly order: most central first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathId(pub usize);

impl fmt::Display for UnitIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chain#{}", self.0)
    }
}

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "path#{}", self.0)
    }
}

/// `presence / span`, or `0.0` for a zero-length span.
pub(crate) fn density(presence: Tick, span: Tick) -> f64 {
    if span <= 0 {
        0.0
    } else {
        presence as f64 / span as f64
    }
}
