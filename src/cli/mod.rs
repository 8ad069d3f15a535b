// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for nodeflow.

pub mod fmt;
pub mod graph;
pub mod init;
pub mod run;
pub mod types;
pub mod validate;
pub mod watch;

use clap::{Parser, Subcommand, ValueEnum};
use miette::Result;
use std::path::{Path, PathBuf};

use crate::codec::{self, LoadedGraph};
use crate::config::Config;
use crate::machine::MachineRegistry;
use crate::utils::{print_error, print_warning};

/// Dataflow pipeline runner
///
/// Build graphs of machines, persist them as text and run them.
#[derive(Parser, Debug)]
#[clap(
    name = "nodeflow",
    version,
    about = "Build, persist and run dataflow graphs of processing machines",
    long_about = None,
    after_help = "Examples:\n\
        nodeflow init                     Create a starter pipeline.graph\n\
        nodeflow run                      Execute the graph\n\
        nodeflow graph -f mermaid         Show the graph as a Mermaid chart\n\
        nodeflow watch                    Re-run the graph on file changes\n\n\
        See 'nodeflow <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a starter graph file
    Init {
        /// Starting graph
        #[clap(short, long, value_enum, default_value = "linear")]
        template: Template,

        /// Overwrite an existing graph file
        #[clap(long)]
        force: bool,
    },

    /// Run the graph
    Run {
        /// Graph file (defaults to the configured graph)
        #[clap(short, long)]
        graph: Option<PathBuf>,

        /// Show the execution order without running anything
        #[clap(long)]
        dry_run: bool,

        /// Hide the progress bar
        #[clap(long)]
        no_progress: bool,
    },

    /// Watch mode - re-run the graph on file changes
    Watch {
        /// Graph file (defaults to the configured graph)
        #[clap(short, long)]
        graph: Option<PathBuf>,

        /// Debounce delay in milliseconds (defaults to the configured delay)
        #[clap(long)]
        debounce: Option<u64>,
    },

    /// Check a graph file for problems
    Validate {
        /// Graph file to validate
        graph: Option<PathBuf>,
    },

    /// Show the graph
    Graph {
        /// Graph file
        graph: Option<PathBuf>,

        /// Output format
        #[clap(short, long, value_enum, default_value = "text")]
        format: GraphFormat,
    },

    /// Rewrite a graph file in canonical form
    Fmt {
        /// Graph file
        graph: Option<PathBuf>,

        /// Only check; fail if the file is not canonical
        #[clap(long)]
        check: bool,
    },

    /// List the available machine types
    Types {
        /// Output format
        #[clap(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Starter graphs for `init`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Template {
    /// Source -> case change -> stdout
    Linear,
    /// Source -> split -> (reverse, case) -> join -> stdout
    SplitJoin,
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Graph output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    Text,
    Dot,
    Mermaid,
}

/// Graph file from the command line, else from the config
pub(crate) fn graph_path(arg: Option<PathBuf>, config: &Config) -> PathBuf {
    arg.unwrap_or_else(|| config.graph.clone())
}

/// Load a graph file, warning about machine types that were skipped
pub(crate) fn load_graph(path: &Path, registry: &MachineRegistry) -> Result<LoadedGraph> {
    if !path.exists() {
        return Err(miette::miette!(
            "Graph file not found: {}\n\n\
             Run 'nodeflow init' to create one.",
            path.display()
        ));
    }

    let loaded = codec::load(path, registry).map_err(|e| {
        if e.is_parse_error() {
            print_error(&format!("{} is not a valid graph file", path.display()));
        }
        e
    })?;
    for type_name in &loaded.unrecognized {
        print_warning(&format!(
            "Unknown machine type '{}': its nodes were skipped",
            type_name
        ));
    }
    Ok(loaded)
}
