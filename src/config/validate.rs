// src/config/validate.rs

use std::collections::BTreeMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{ConfigFile, RawConfigFile, UnitConfig};
use crate::errors::{Result, TracklineError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::TracklineError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.layout, raw.unit))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_units(cfg)?;
    validate_spans(cfg)?;
    validate_unit_dependencies(cfg)?;
    topological_order(&cfg.unit)?;
    Ok(())
}

fn ensure_has_units(cfg: &RawConfigFile) -> Result<()> {
    if cfg.unit.is_empty() {
        return Err(TracklineError::ConfigError(
            "config must contain at least one [unit.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_spans(cfg: &RawConfigFile) -> Result<()> {
    for (name, unit) in cfg.unit.iter() {
        if unit.end.checked_sub(unit.start).is_none_or(|span| span < 0) {
            return Err(TracklineError::InvalidSpan {
                unit: name.clone(),
                start: unit.start,
                end: unit.end,
            });
        }
    }
    Ok(())
}

fn validate_unit_dependencies(cfg: &RawConfigFile) -> Result<()> {
    for (name, unit) in cfg.unit.iter() {
        for dep in unit.after.iter() {
            if !cfg.unit.contains_key(dep) {
                return Err(TracklineError::ConfigError(format!(
                    "unit '{}' has unknown dependency '{}' in `after`",
                    name, dep
                )));
            }
            if dep == name {
                return Err(TracklineError::ConfigError(format!(
                    "unit '{}' cannot depend on itself in `after`",
                    name
                )));
            }
        }
    }
    Ok(())
}

/// Unit names ordered so every unit comes after all of its dependencies.
///
/// Edge direction: dependency -> dependent. For
///   [unit.B]
///   after = ["A"]
/// we add edge A -> B.
pub fn topological_order(units: &BTreeMap<String, UnitConfig>) -> Result<Vec<String>> {
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in units.keys() {
        graph.add_node(name.as_str());
    }

    for (name, unit) in units.iter() {
        for dep in unit.after.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(order) => Ok(order.into_iter().map(str::to_string).collect()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(TracklineError::DagCycle(format!(
                "cycle detected in unit graph involving unit '{}'",
                node
            )))
        }
    }
}
