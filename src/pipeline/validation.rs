// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Graph validation
//!
//! Static checks run before execution. Errors make a run pointless; warnings
//! point at graphs that will run but probably not as intended.

use crate::errors::NodeflowError;
use crate::graph::{Graph, Node};
use crate::machine::Machine;

/// Graph validator
pub struct GraphValidator;

impl GraphValidator {
    /// Validate a graph
    pub fn validate<M: Machine>(graph: &Graph<M>) -> ValidationResult {
        let mut result = ValidationResult::new();

        if graph.is_empty() {
            result.add_warning("Graph has no nodes");
            return result;
        }

        match graph.topological_order() {
            Ok(_) => {}
            Err(NodeflowError::CycleDetected { nodes }) => {
                result.add_error(&format!("Cycle detected between {}", nodes.join(", ")));
            }
            Err(e) => {
                result.add_error(&format!("Ordering error: {}", e));
            }
        }

        for node in graph.iter() {
            Self::validate_node(node, &mut result);
        }

        result
    }

    /// Check one node's ports against its machine's declared arity
    fn validate_node<M: Machine>(node: &Node<M>, result: &mut ValidationResult) {
        let machine = node.payload();
        let label = format!("{} ({})", machine.type_name(), node.id());

        for (index, _) in node.inputs().filter(|(i, _)| *i >= machine.input_count()) {
            result.add_error(&format!(
                "{}: input {} is connected but the machine declares {} input(s)",
                label,
                index,
                machine.input_count()
            ));
        }
        for (index, _) in node.outputs().filter(|(i, _)| *i >= machine.output_count()) {
            result.add_error(&format!(
                "{}: output {} is connected but the machine declares {} output(s)",
                label,
                index,
                machine.output_count()
            ));
        }

        for index in (0..machine.input_count()).filter(|i| node.input(*i).is_none()) {
            let code = machine.input_code(index);
            let port = if code.is_blank() {
                index.to_string()
            } else {
                format!("{} ({})", index, code)
            };
            result.add_warning(&format!(
                "{}: input {} is not connected and will receive no value",
                label, port
            ));
        }
    }
}

/// Result of graph validation
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    pub fn add_warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
