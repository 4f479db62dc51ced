// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::stress::LayoutOptions;
use crate::types::Tick;

/// Configuration exactly as read from TOML, before validation.
///
/// ```toml
/// [layout]
/// balance = true
/// compact = true
///
/// [unit.fetch]
/// start = 0
/// end = 2
///
/// [unit.build]
/// start = 2
/// end = 5
/// after = ["fetch"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Optimiser switches from `[layout]`.
    #[serde(default)]
    pub layout: LayoutSection,

    /// All units from `[unit.<name>]`, keyed by unit name.
    #[serde(default)]
    pub unit: BTreeMap<String, UnitConfig>,
}

/// A validated configuration: at least one unit, every `after` reference
/// known, spans well-formed, and no cycles.
///
/// Only obtainable through `ConfigFile::try_from(RawConfigFile)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub layout: LayoutSection,
    pub unit: BTreeMap<String, UnitConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(layout: LayoutSection, unit: BTreeMap<String, UnitConfig>) -> Self {
        Self { layout, unit }
    }
}

/// `[layout]` section.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LayoutSection {
    /// Run the global balancing phase (default `true`).
    #[serde(default = "default_true")]
    pub balance: bool,

    /// Run the zero-cost compaction phase (default `true`).
    #[serde(default = "default_true")]
    pub compact: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LayoutSection {
    fn default() -> Self {
        Self {
            balance: true,
            compact: true,
        }
    }
}

impl LayoutSection {
    pub fn options(&self) -> LayoutOptions {
        LayoutOptions {
            balance: self.balance,
            compact: self.compact,
        }
    }
}

/// `[unit.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitConfig {
    /// Anticipated start.
    pub start: Tick,

    pub end: Tick,

    /// Direct dependencies: this unit waits for every unit listed here.
    #[serde(default)]
    pub after: Vec<String>,
}
