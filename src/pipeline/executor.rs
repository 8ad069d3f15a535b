// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Pipeline executor
//!
//! Runs every machine of a graph once, in topological order, threading values
//! from output ports to the input ports they are connected to.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::errors::{NodeflowError, NodeflowResult};
use crate::graph::{Graph, NodeId};
use crate::machine::{Machine, Value};

/// Progress of a run, reported before, during and after each node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Position of the node in the execution order
    pub index: usize,
    /// Number of nodes in the run
    pub total: usize,
    pub node: NodeId,
    /// 0 to 100
    pub percent: u8,
}

/// A value produced on an output port that nothing consumes: the port is
/// unconnected, or wired to an input its consumer does not declare
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalOutput {
    pub node: NodeId,
    pub machine: String,
    pub index: usize,
    pub value: Value,
}

/// Result of a successful run
#[derive(Debug)]
pub struct ExecutionReport {
    /// Nodes in the order they ran
    pub order: Vec<NodeId>,
    /// Values nothing consumed, in production order
    pub terminal: Vec<TerminalOutput>,
    /// Total execution time
    pub duration: Duration,
}

/// Execute `graph`, reporting progress to `progress` if given.
///
/// The first machine failure aborts the run; nothing produced before it is
/// returned.
pub fn execute<M: Machine>(
    graph: &Graph<M>,
    mut progress: Option<&mut dyn FnMut(Progress)>,
) -> NodeflowResult<ExecutionReport> {
    let start = Instant::now();
    let order = graph.topological_order()?;
    let total = order.len();

    // values waiting on connected output ports, keyed by (producer, output index)
    let mut pending: HashMap<(NodeId, usize), Value> = HashMap::new();
    let mut terminal = Vec::new();

    for (index, &id) in order.iter().enumerate() {
        let Some(node) = graph.node(id) else { continue };
        let machine = node.payload();

        let inputs: Vec<Option<Value>> = (0..machine.input_count())
            .map(|i| {
                node.input(i).and_then(|port| {
                    let remote = port.remote();
                    pending.remove(&(remote.node, remote.index))
                })
            })
            .collect();

        debug!(
            node = %id,
            machine = machine.type_name(),
            step = index + 1,
            total,
            "running machine"
        );
        let at = |percent: u8| Progress {
            index,
            total,
            node: id,
            percent,
        };

        report(&mut progress, at(0));
        let outputs = {
            let mut forward = |percent: u8| report(&mut progress, at(percent.min(100)));
            machine
                .process(inputs, &mut forward)
                .map_err(|e| NodeflowError::machine_failed(id, machine.type_name(), &e))?
        };
        report(&mut progress, at(100));

        if outputs.len() != machine.output_count() {
            return Err(NodeflowError::OutputArityMismatch {
                machine: machine.type_name().to_string(),
                expected: machine.output_count(),
                actual: outputs.len(),
            });
        }

        for (i, value) in outputs.into_iter().enumerate() {
            let Some(value) = value else { continue };
            let consumer = node.output(i).map(|port| port.remote());
            let accepted = consumer.is_some_and(|remote| {
                graph
                    .payload(remote.node)
                    .is_some_and(|m| remote.index < m.input_count())
            });
            if accepted {
                pending.insert((id, i), value);
            } else {
                if let Some(remote) = consumer {
                    debug!(
                        node = %id,
                        output = i,
                        consumer = %remote.node,
                        input = remote.index,
                        "consumer declares no such input, value kept as terminal output"
                    );
                }
                terminal.push(TerminalOutput {
                    node: id,
                    machine: machine.type_name().to_string(),
                    index: i,
                    value,
                });
            }
        }

        debug!(node = %id, machine = machine.type_name(), "machine finished");
    }

    let duration = start.elapsed();
    info!(
        nodes = total,
        terminal = terminal.len(),
        elapsed_ms = duration.as_millis() as u64,
        "pipeline run complete"
    );

    Ok(ExecutionReport {
        order,
        terminal,
        duration,
    })
}

fn report(sink: &mut Option<&mut dyn FnMut(Progress)>, progress: Progress) {
    if let Some(sink) = sink {
        (*sink)(progress);
    }
}
