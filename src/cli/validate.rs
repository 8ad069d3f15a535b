// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Validate command - check a graph file

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::config::Config;
use crate::graph::render::to_text;
use crate::machine::MachineRegistry;
use crate::pipeline::GraphValidator;
use crate::utils::{print_error, print_section, print_success};

/// Run the validate command
pub async fn run(graph_path: Option<PathBuf>, config: &Config, verbose: bool) -> Result<()> {
    let path = super::graph_path(graph_path, config);

    println!("{}", "Validating graph...".bold());
    println!();

    let loaded = match super::load_graph(&path, &MachineRegistry::with_builtins()) {
        Ok(loaded) => loaded,
        Err(e) => {
            print_error("Failed to parse graph");
            eprintln!();
            return Err(e);
        }
    };

    print_success(&format!(
        "{} parsed ({} nodes, {} connections)",
        path.display(),
        loaded.graph.node_count(),
        loaded.graph.connection_count()
    ));

    let validation = GraphValidator::validate(&loaded.graph);

    if !validation.errors.is_empty() {
        println!();
        println!("{}:", "Errors".red().bold());
        for error in &validation.errors {
            println!("  {} {}", "✗".red(), error);
        }
    }

    if !validation.warnings.is_empty() || !loaded.unrecognized.is_empty() {
        println!();
        println!("{}:", "Warnings".yellow().bold());
        for type_name in &loaded.unrecognized {
            println!("  {} Unknown machine type '{}'", "⚠".yellow(), type_name);
        }
        for warning in &validation.warnings {
            println!("  {} {}", "⚠".yellow(), warning);
        }
    }

    if verbose && validation.is_valid() {
        print_section("Execution order");
        for line in to_text(&loaded.graph)?.lines() {
            println!("  {}", line);
        }
    }

    println!();

    if !validation.is_valid() {
        Err(miette::miette!("Graph validation failed"))
    } else if validation.has_warnings() || !loaded.unrecognized.is_empty() {
        println!("{}", "Graph is valid but has warnings.".yellow().bold());
        Ok(())
    } else {
        println!("{}", "Graph is valid!".green().bold());
        Ok(())
    }
}
