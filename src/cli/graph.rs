// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Graph command - visualize a graph file

use miette::Result;
use std::path::PathBuf;

use super::GraphFormat;
use crate::config::Config;
use crate::graph::render::{to_dot, to_mermaid, to_text};
use crate::machine::MachineRegistry;

/// Run the graph command
pub async fn run(graph_path: Option<PathBuf>, format: GraphFormat, config: &Config) -> Result<()> {
    let path = super::graph_path(graph_path, config);
    let loaded = super::load_graph(&path, &MachineRegistry::with_builtins())?;

    // Output in requested format
    let output = match format {
        GraphFormat::Text => to_text(&loaded.graph)?,
        GraphFormat::Dot => to_dot(&loaded.graph)?,
        GraphFormat::Mermaid => to_mermaid(&loaded.graph)?,
    };

    print!("{}", output);

    Ok(())
}
