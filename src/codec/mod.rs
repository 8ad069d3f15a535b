// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Text format for persisting graphs
//!
//! ```text
//! Graph {
//! 	Source.Text 'machine0' {
//! 		[text='hello world']
//! 	}
//! 	Text.Reverse 'machine1' {
//! 		'machine0' ->
//! 	}
//! }
//! ```
//!
//! Each record lists the connections feeding its inputs as
//! `'<producer>'[:<output code>] -> [<input code>]`, followed by an optional
//! `[key='value' ...]` settings block. Names are positional and regenerated
//! on every write.

pub mod section;
mod reader;
mod writer;

pub use reader::{parse, LoadedGraph};
pub use writer::serialize;

use std::path::Path;

use tracing::info;

use crate::errors::{NodeflowError, NodeflowResult};
use crate::graph::Graph;
use crate::machine::{Machine, MachineRegistry};

/// Write `graph` to `path`, with a trailing newline
pub fn save<M: Machine>(path: &Path, graph: &Graph<M>) -> NodeflowResult<()> {
    let mut text = serialize(graph)?;
    text.push('\n');
    std::fs::write(path, text).map_err(|e| NodeflowError::FileWriteError {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    info!(path = %path.display(), nodes = graph.node_count(), "saved graph");
    Ok(())
}

/// Read and parse the graph file at `path`
pub fn load(path: &Path, registry: &MachineRegistry) -> NodeflowResult<LoadedGraph> {
    let text = std::fs::read_to_string(path).map_err(|e| NodeflowError::FileReadError {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    parse(&text, registry)
}
