// src/dag/mod.rs

//! Dependency unit graph.
//!
//! - [`graph`] holds the immutable units with their precomputed transitive
//!   dependencies and path counts.
//! - [`reachability`] is the boolean direct-dependency matrix used to find
//!   heads of arbitrary subsets.

pub mod graph;
pub mod reachability;

pub use graph::{Unit, UnitGraph};
pub use reachability::ReachabilityMatrix;
