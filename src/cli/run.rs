// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Run command - execute the graph

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::config::Config;
use crate::graph::render::{positional_name, to_text};
use crate::graph::Graph;
use crate::machine::{Machine, MachineRegistry};
use crate::pipeline::{execute, ExecutionReport, GraphValidator, Progress};
use crate::utils::{print_error, print_warning, RunProgress};

/// Run the graph
pub async fn run(
    graph_path: Option<PathBuf>,
    dry_run: bool,
    no_progress: bool,
    config: &Config,
    verbose: bool,
) -> Result<()> {
    let path = super::graph_path(graph_path, config);
    let registry = MachineRegistry::with_builtins();
    let loaded = super::load_graph(&path, &registry)?;

    // Validate graph
    let validation = GraphValidator::validate(&loaded.graph);

    if !validation.is_valid() {
        eprintln!("{}", "Graph validation failed:".red().bold());
        for error in &validation.errors {
            print_error(error);
        }
        return Err(miette::miette!("Graph is invalid"));
    }

    if validation.has_warnings() && verbose {
        eprintln!("{}", "Graph warnings:".yellow().bold());
        for warning in &validation.warnings {
            print_warning(warning);
        }
        eprintln!();
    }

    if dry_run {
        println!("{}", "Execution plan:".bold());
        print!("{}", to_text(&loaded.graph)?);
        return Ok(());
    }

    let report = execute_blocking(loaded.graph, config.progress && !no_progress).await?;

    if !report.terminal.is_empty() {
        println!();
        println!("{}:", "Outputs".bold());
        for output in &report.terminal {
            let position = report.order.iter().position(|id| *id == output.node);
            let name = position.map(positional_name).unwrap_or_default();
            println!(
                "  {} {}: {}",
                format!("{}[{}]", name, output.index).cyan(),
                format!("({})", output.machine).dimmed(),
                output.value
            );
        }
    }

    if verbose {
        eprintln!(
            "{}",
            format!(
                "Ran {} machine(s) in {:.2}s",
                report.order.len(),
                report.duration.as_secs_f64()
            )
            .green()
        );
    }

    Ok(())
}

/// Execute on a blocking thread, drawing a progress bar if asked to
pub(crate) async fn execute_blocking(
    graph: Graph<Box<dyn Machine>>,
    show_progress: bool,
) -> Result<ExecutionReport> {
    let result = tokio::task::spawn_blocking(move || {
        let bar = if show_progress {
            RunProgress::new(graph.node_count())
        } else {
            RunProgress::hidden()
        };
        let mut on_progress = |progress: Progress| {
            let machine = graph.payload(progress.node).map_or("?", |m| m.type_name());
            bar.update(&progress, machine);
        };

        let result = execute(&graph, Some(&mut on_progress));
        bar.finish();
        result
    })
    .await
    .map_err(|e| miette::miette!("Pipeline task failed: {}", e))?;

    Ok(result?)
}
