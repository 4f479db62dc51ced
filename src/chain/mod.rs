// src/chain/mod.rs

//! Chains: maximal unbranched runs of units.
//!
//! - [`isolated`] is the validated chain type.
//! - [`decompose`] partitions a cluster into chains.
//! - [`strain`] builds the chain-level graph and its centrality scores.

pub mod decompose;
pub mod isolated;
pub mod strain;

pub use decompose::ChainSet;
pub use isolated::{Extent, IsolatedChain};
pub use strain::{ChainGraph, StrainScores};
