// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Fmt command - rewrite a graph file in canonical form

use miette::Result;
use std::path::{Path, PathBuf};

use crate::codec::{self, LoadedGraph};
use crate::config::Config;
use crate::errors::NodeflowError;
use crate::machine::MachineRegistry;
use crate::utils::{print_info, print_success};

/// Run the fmt command
pub async fn run(graph_path: Option<PathBuf>, check: bool, config: &Config) -> Result<()> {
    let path = super::graph_path(graph_path, config);
    let loaded = super::load_graph(&path, &MachineRegistry::with_builtins())?;

    // Formatting would silently drop the nodes the registry could not build
    if !loaded.unrecognized.is_empty() {
        return Err(miette::miette!(
            "Refusing to format {}: unknown machine types {}",
            path.display(),
            loaded.unrecognized.join(", ")
        ));
    }

    if is_canonical(&path, &loaded)? {
        print_success(&format!("{} is already formatted", path.display()));
        return Ok(());
    }

    if check {
        return Err(miette::miette!(
            "{} is not formatted\n\nRun 'nodeflow fmt' to rewrite it.",
            path.display()
        ));
    }

    codec::save(&path, &loaded.graph)?;
    print_info(&format!("Formatted {}", path.display()));
    Ok(())
}

/// Whether the file already holds exactly what the writer would produce
fn is_canonical(path: &Path, loaded: &LoadedGraph) -> Result<bool> {
    let current = std::fs::read_to_string(path).map_err(|e| NodeflowError::FileReadError {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    let canonical = codec::serialize(&loaded.graph)? + "\n";
    Ok(current == canonical)
}
