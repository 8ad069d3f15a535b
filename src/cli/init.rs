// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Init command - create a starter graph

use colored::Colorize;
use miette::Result;
use std::path::Path;

use super::Template;
use crate::codec;
use crate::config::{Config, CONFIG_FILE};
use crate::errors::NodeflowResult;
use crate::graph::Graph;
use crate::machine::builtin::{
    ChangeCase, StdoutSink, TextCase, TextJoin, TextReverse, TextSource, TextSplit,
};
use crate::machine::Machine;
use crate::utils::print_success;

/// Run the init command
pub async fn run(template: Template, force: bool, config: &Config, verbose: bool) -> Result<()> {
    let path = config.graph.as_path();

    println!("{}", "Initializing nodeflow project...".bold());
    println!();

    if path.exists() && !force {
        return Err(miette::miette!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        ));
    }

    let graph = build(template)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            miette::miette!("Failed to create directory '{}': {}", parent.display(), e)
        })?;
    }
    codec::save(path, &graph)?;
    print_success(&format!("Created {}", path.display()));

    if !Path::new(CONFIG_FILE).exists() {
        config.save(Path::new(CONFIG_FILE))?;
        print_success(&format!("Created {}", CONFIG_FILE));
    }

    println!();
    println!("{}", "Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to shape your graph", path.display().to_string().cyan());
    println!("  2. Run {} to see the available machines", "nodeflow types".cyan());
    println!("  3. Run {} to execute it", "nodeflow run".cyan());
    println!();

    if verbose {
        println!("{}", "Generated graph:".dimmed());
        println!("{}", "─".repeat(50).dimmed());
        println!("{}", codec::serialize(&graph)?.dimmed());
    }

    Ok(())
}

/// Build the starter graph for `template`
pub fn build(template: Template) -> NodeflowResult<Graph<Box<dyn Machine>>> {
    let mut graph: Graph<Box<dyn Machine>> = Graph::new();

    match template {
        Template::Linear => {
            let source = graph.add_node(Box::new(TextSource::new("hello nodeflow")));
            let case = graph.add_node(Box::new(ChangeCase::new(TextCase::Upper)));
            let sink = graph.add_node(Box::new(StdoutSink));
            graph.connect(source, 0, case, 0)?;
            graph.connect(case, 0, sink, 0)?;
        }
        Template::SplitJoin => {
            let source = graph.add_node(Box::new(TextSource::new("hello nodeflow world")));
            let split = graph.add_node(Box::new(TextSplit::default()));
            let reverse = graph.add_node(Box::new(TextReverse));
            let case = graph.add_node(Box::new(ChangeCase::new(TextCase::Upper)));
            let join = graph.add_node(Box::new(TextJoin::default()));
            let sink = graph.add_node(Box::new(StdoutSink));
            graph.connect(source, 0, split, 0)?;
            graph.connect(split, 0, reverse, 0)?;
            graph.connect(split, 1, case, 0)?;
            graph.connect(reverse, 0, join, 0)?;
            graph.connect(case, 0, join, 1)?;
            graph.connect(join, 0, sink, 0)?;
        }
    }

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::MachineRegistry;
    use crate::pipeline::GraphValidator;

    #[test]
    fn test_templates_are_clean() {
        for template in [Template::Linear, Template::SplitJoin] {
            let graph = build(template).unwrap();
            let result = GraphValidator::validate(&graph);
            assert!(result.is_valid(), "{:?}: {:?}", template, result.errors);
            assert!(!result.has_warnings(), "{:?}: {:?}", template, result.warnings);
        }
    }

    #[test]
    fn test_templates_reload() {
        let registry = MachineRegistry::with_builtins();
        for template in [Template::Linear, Template::SplitJoin] {
            let graph = build(template).unwrap();
            let text = codec::serialize(&graph).unwrap();
            let loaded = codec::parse(&text, &registry).unwrap();
            assert_eq!(loaded.graph.node_count(), graph.node_count());
            assert_eq!(codec::serialize(&loaded.graph).unwrap(), text);
        }
    }
}
