// src/engine/mod.rs

//! Orchestration of the layout pipeline.
//!
//! A [`Cluster`] owns every stage for one connected group of units; this
//! module also splits a whole graph into clusters and lays each one out.
//! Clusters share nothing, so they are processed independently.

pub mod cluster;

pub use crate::stress::{LayoutOptions, StressReport};
pub use cluster::{Cluster, Layout};

use tracing::info;

use crate::dag::UnitGraph;
use crate::errors::Result;

/// Lay out every connected cluster of `graph`, in the order returned by
/// [`UnitGraph::clusters`].
pub fn lay_out_graph(
    graph: &UnitGraph,
    options: LayoutOptions,
) -> Result<Vec<(Cluster<'_>, Layout)>> {
    let mut out = Vec::new();
    for heads in graph.clusters() {
        let cluster = Cluster::new(graph, &heads)?;
        let layout = cluster.layout(options)?;
        out.push((cluster, layout));
    }
    info!(clusters = out.len(), "graph laid out");
    Ok(out)
}
