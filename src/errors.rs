// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Every variant signals a caller contract violation (a malformed graph or
//! an identity that does not belong to the structure being queried). None
//! of them are retried; they surface straight to the consuming layer.

use thiserror::Error;

use crate::types::{ChainId, PathId, Tick, UnitId};

#[derive(Error, Debug)]
pub enum TracklineError {
    // --- structural -------------------------------------------------------
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Cycle detected in unit graph: {0}")]
    DagCycle(String),

    #[error("Duplicate unit: {0}")]
    DuplicateUnit(UnitId),

    #[error("Unit '{unit}' depends on '{dependency}', which has not been added yet")]
    UnknownDependency { unit: UnitId, dependency: UnitId },

    #[error("Unit '{unit}' ends before it starts ({start} > {end})")]
    InvalidSpan { unit: UnitId, start: Tick, end: Tick },

    #[error("Broken chain: '{from}' must have '{to}' as its sole dependency and be its only dependent")]
    BrokenChain { from: UnitId, to: UnitId },

    #[error("Broken path: tail '{tail}' does not directly depend on head '{head}'")]
    BrokenPath { tail: UnitId, head: UnitId },

    #[error("Heads are mutually dependent: '{dependent}' depends on '{head}'")]
    MutuallyDependentHeads { dependent: UnitId, head: UnitId },

    #[error("Unit '{unit}' has dependent '{dependent}' that is not part of the cluster")]
    UnlistedDependent { unit: UnitId, dependent: UnitId },

    #[error("Units do not form a single connected cluster ({components} components)")]
    Disconnected { components: usize },

    // --- lookup -----------------------------------------------------------
    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error("Chain not found: {0}")]
    ChainNotFound(ChainId),

    #[error("Path not found: {0}")]
    PathNotFound(PathId),

    #[error("Identity not found in matrix: {0}")]
    IdentityNotFound(String),

    // --- range ------------------------------------------------------------
    #[error("Empty input: {0}")]
    Empty(&'static str),

    #[error("Index {index} out of range for {len} entries")]
    IndexOutOfRange { index: usize, len: usize },

    // --- ambient ----------------------------------------------------------
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TracklineError>;
