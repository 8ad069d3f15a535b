// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Error types with diagnostic help
//!
//! Every failure the engine can report lives in [`NodeflowError`]. Structural
//! errors (membership, occupied ports) are raised by the mutating call itself,
//! cycles only when an ordering is requested, and codec errors while loading.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

use crate::graph::{NodeId, PortDirection};

/// Result type for nodeflow operations
pub type NodeflowResult<T> = Result<T, NodeflowError>;

/// Main error type for nodeflow
#[derive(Error, Debug, Diagnostic)]
pub enum NodeflowError {
    // ─────────────────────────────────────────────────────────────────────────
    // Graph Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("{node} is not a member of this graph")]
    #[diagnostic(
        code(nodeflow::not_member),
        help("The node was removed or belongs to a different graph")
    )]
    NotMember { node: NodeId },

    #[error("{direction} port {index} of {node} is already connected")]
    #[diagnostic(
        code(nodeflow::port_occupied),
        help("Disconnect the existing link first; a port carries at most one connection")
    )]
    PortOccupied {
        node: NodeId,
        direction: PortDirection,
        index: usize,
    },

    #[error("Cycle detected between {}", .nodes.join(", "))]
    #[diagnostic(
        code(nodeflow::cycle_detected),
        help("Remove one of the connections between these nodes so the graph becomes acyclic")
    )]
    CycleDetected { nodes: Vec<String> },

    // ─────────────────────────────────────────────────────────────────────────
    // Execution Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Machine '{machine}' ({node}) failed: {message}")]
    #[diagnostic(code(nodeflow::machine_failed))]
    MachineFailed {
        node: NodeId,
        machine: String,
        message: String,
    },

    #[error("Machine '{machine}' produced {actual} outputs but declares {expected}")]
    #[diagnostic(code(nodeflow::output_arity_mismatch))]
    OutputArityMismatch {
        machine: String,
        expected: usize,
        actual: usize,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Codec Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Unbalanced '{delimiter}' at byte {offset}")]
    #[diagnostic(
        code(nodeflow::unbalanced_delimiter),
        help("Every opening brace or bracket needs a matching close")
    )]
    UnbalancedDelimiter { delimiter: char, offset: usize },

    #[error("No '{name}' section found")]
    #[diagnostic(code(nodeflow::missing_section))]
    MissingSection { name: String },

    #[error("Malformed node record: '{header}'")]
    #[diagnostic(
        code(nodeflow::malformed_record),
        help("A node record looks like: Text.Reverse 'machine1' {{ ... }}")
    )]
    MalformedRecord { header: String },

    #[error("Malformed connection in '{node}': '{line}'")]
    #[diagnostic(
        code(nodeflow::malformed_connection),
        help("A connection looks like: 'machine0':H -> T")
    )]
    MalformedConnection { node: String, line: String },

    #[error("Node name '{name}' is used more than once")]
    #[diagnostic(code(nodeflow::duplicate_name))]
    DuplicateName { name: String },

    #[error("Connection in '{node}' refers to unknown node '{name}'")]
    #[diagnostic(code(nodeflow::unknown_node_name))]
    UnknownNodeName { node: String, name: String },

    #[error("Machine '{machine}' has no {direction} port with code '{code}'")]
    #[diagnostic(code(nodeflow::unknown_port_code))]
    UnknownPortCode {
        machine: String,
        direction: PortDirection,
        code: String,
    },

    #[error("Invalid settings for '{node}': {message}")]
    #[diagnostic(code(nodeflow::invalid_settings))]
    InvalidSettings { node: String, message: String },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/System Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(nodeflow::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    #[error("Failed to write file '{path}': {error}")]
    #[diagnostic(code(nodeflow::file_write_error))]
    FileWriteError { path: PathBuf, error: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(nodeflow::io_error))]
    Io { message: String },

    #[error("TOML parsing error: {message}")]
    #[diagnostic(code(nodeflow::toml_error))]
    Toml { message: String },

    #[error("JSON error: {message}")]
    #[diagnostic(code(nodeflow::json_error))]
    Json { message: String },

    #[error("Invalid pattern: {message}")]
    #[diagnostic(code(nodeflow::pattern_error))]
    Pattern { message: String },
}

impl From<std::io::Error> for NodeflowError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl From<toml::de::Error> for NodeflowError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml { message: e.to_string() }
    }
}

impl From<regex::Error> for NodeflowError {
    fn from(e: regex::Error) -> Self {
        Self::Pattern { message: e.to_string() }
    }
}

impl From<serde_json::Error> for NodeflowError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl NodeflowError {
    /// Wrap a machine's own failure with the node it happened on
    pub fn machine_failed(node: NodeId, machine: &str, error: &anyhow::Error) -> Self {
        Self::MachineFailed {
            node,
            machine: machine.to_string(),
            message: format!("{:#}", error),
        }
    }

    /// Whether this error comes from malformed persisted text
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::UnbalancedDelimiter { .. }
                | Self::MissingSection { .. }
                | Self::MalformedRecord { .. }
                | Self::MalformedConnection { .. }
                | Self::DuplicateName { .. }
                | Self::UnknownNodeName { .. }
                | Self::UnknownPortCode { .. }
                | Self::InvalidSettings { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_nodes() {
        let err = NodeflowError::CycleDetected {
            nodes: vec!["Text.Reverse#0".into(), "Text.Case#1".into()],
        };
        assert_eq!(
            err.to_string(),
            "Cycle detected between Text.Reverse#0, Text.Case#1"
        );
    }

    #[test]
    fn test_parse_error_classification() {
        let err = NodeflowError::UnbalancedDelimiter {
            delimiter: '{',
            offset: 3,
        };
        assert!(err.is_parse_error());
        assert!(!NodeflowError::Io { message: "x".into() }.is_parse_error());
    }
}
