// src/lib.rs

pub mod chain;
pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod matrix;
pub mod path;
pub mod stress;
pub mod types;

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::config::model::ConfigFile;
use crate::dag::UnitGraph;
use crate::engine::{Cluster, Layout, lay_out_graph};
use crate::types::UnitIdx;

/// High-level entry point used by `main.rs`.
///
/// Loads and validates the graph description, splits it into connected
/// clusters, lays each one out and prints the rows.
pub fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let graph = UnitGraph::from_config(&cfg)?;
    let clusters = lay_out_graph(&graph, cfg.layout.options())?;
    info!(clusters = clusters.len(), "layout complete");

    for (n, (cluster, layout)) in clusters.iter().enumerate() {
        print_cluster(n + 1, cluster, layout)?;
    }
    Ok(())
}

fn print_cluster(number: usize, cluster: &Cluster<'_>, layout: &Layout) -> Result<()> {
    let graph = cluster.graph();
    let heads = unit_names(graph, cluster.heads())?;

    let report = layout.report();
    println!("cluster {number} (heads: {})", heads.join(", "));
    println!(
        "  stress: {} -> {} ({} balance swaps, {} compaction swaps)",
        report.initial_total, report.final_total, report.balance_swaps, report.compaction_swaps
    );

    for (row, path) in cluster.rows(layout)?.into_iter().enumerate() {
        let units = unit_names(graph, path.units())?;
        println!(
            "  row {row:>3}  {}  [{}]",
            path.id(),
            units.join(" -> ")
        );
        println!(
            "           span {}..{}  presence {}  density {:.3}  stress {}",
            path.initial_start(),
            path.end(),
            path.presence(),
            path.density(),
            layout.stress_of(path.id())?
        );
        for (t, track) in path.tracks().iter().enumerate() {
            let units = unit_names(graph, track.units())?;
            println!("           track {t}: {}", units.join(", "));
        }
    }
    println!();
    Ok(())
}

fn unit_names<'g>(graph: &'g UnitGraph, units: &[UnitIdx]) -> errors::Result<Vec<&'g str>> {
    units
        .iter()
        .map(|&idx| graph.unit(idx).map(|u| u.id()))
        .collect()
}

/// Simple dry-run output: print units, spans and dependencies.
fn print_dry_run(cfg: &ConfigFile) {
    println!("trackline dry-run");
    println!("  layout.balance = {}", cfg.layout.balance);
    println!("  layout.compact = {}", cfg.layout.compact);
    println!();

    println!("units ({}):", cfg.unit.len());
    for (name, unit) in cfg.unit.iter() {
        println!("  - {name}");
        println!("      span: {}..{}", unit.start, unit.end);
        if !unit.after.is_empty() {
            println!("      after: {:?}", unit.after);
        }
    }

    debug!("dry-run complete (no layout computed)");
}
