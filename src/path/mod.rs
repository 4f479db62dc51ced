// src/path/mod.rs

//! Paths (rows): chains joined into maximal linear sequences.
//!
//! - [`row`] is the validated path type and its track decomposition.
//! - [`assembly`] greedily builds every path of a cluster.

pub mod assembly;
pub mod row;

pub use assembly::{Candidate, PathSet};
pub use row::{Path, Track};
