#![allow(dead_code)]

use std::collections::BTreeMap;

use trackline::config::{ConfigFile, LayoutSection, RawConfigFile, UnitConfig};
use trackline::dag::UnitGraph;
use trackline::types::{Tick, UnitIdx};

/// Builder for `UnitGraph`. Units must be added dependencies-first.
pub struct GraphBuilder {
    graph: UnitGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: UnitGraph::new(),
        }
    }

    pub fn unit(mut self, id: &str, start: Tick, end: Tick, after: &[&str]) -> Self {
        self.graph
            .add_unit(id, start, end, after)
            .unwrap_or_else(|e| panic!("failed to add unit '{id}': {e}"));
        self
    }

    /// A unit spanning `[0, 1)`.
    pub fn point(self, id: &str, after: &[&str]) -> Self {
        self.unit(id, 0, 1, after)
    }

    pub fn build(self) -> UnitGraph {
        self.graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Look up unit indices by name, panicking on unknown names.
pub fn idx(graph: &UnitGraph, id: &str) -> UnitIdx {
    graph
        .idx_of(id)
        .unwrap_or_else(|e| panic!("unknown unit '{id}': {e}"))
}

/// Names of `units`, in order.
pub fn names(graph: &UnitGraph, units: &[UnitIdx]) -> Vec<String> {
    units
        .iter()
        .map(|&u| graph.unit(u).expect("unit in graph").id().to_string())
        .collect()
}

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                layout: LayoutSection::default(),
                unit: BTreeMap::new(),
            },
        }
    }

    pub fn with_unit(mut self, name: &str, unit: UnitConfig) -> Self {
        self.config.unit.insert(name.to_string(), unit);
        self
    }

    pub fn balance(mut self, val: bool) -> Self {
        self.config.layout.balance = val;
        self
    }

    pub fn compact(mut self, val: bool) -> Self {
        self.config.layout.compact = val;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `UnitConfig`.
pub struct UnitConfigBuilder {
    unit: UnitConfig,
}

impl UnitConfigBuilder {
    pub fn new(start: Tick, end: Tick) -> Self {
        Self {
            unit: UnitConfig {
                start,
                end,
                after: vec![],
            },
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.unit.after.push(dep.to_string());
        self
    }

    pub fn build(self) -> UnitConfig {
        self.unit
    }
}
