// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! # nodeflow - dataflow graphs of processing machines
//!
//! `nodeflow` connects processing units ("machines") through numbered ports
//! into a directed acyclic graph, runs the graph in dependency order and
//! persists it in a small text format.
//!
//! ## Features
//!
//! - **Checked graph model** - one connection per port, symmetric links, observers
//! - **Deterministic ordering** - Kahn's algorithm with a stable tie-break
//! - **Text persistence** - round trips reproduce the same file
//! - **Built-in text machines** - enough to run real pipelines from the CLI
//!
//! ## Quick Start
//!
//! ```bash
//! # Create a starter graph
//! nodeflow init --template split-join
//!
//! # Run it
//! nodeflow run
//!
//! # Re-run on every change
//! nodeflow watch
//! ```

pub mod cli;
pub mod codec;
pub mod config;
pub mod errors;
pub mod graph;
pub mod machine;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types
pub use errors::{NodeflowError, NodeflowResult};
pub use graph::{Graph, NodeId};
pub use machine::{Machine, MachineRegistry, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
