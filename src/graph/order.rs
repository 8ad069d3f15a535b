// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Topological ordering
//!
//! Counting variant of Kahn's algorithm. Nodes are bucketed by how many of
//! their connected inputs are still unvisited; the zero bucket is drained one
//! node at a time, lowest slot (earliest inserted) first, so the same mutation
//! history always yields the same order.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use super::id::NodeId;
use super::model::Graph;
use crate::errors::{NodeflowError, NodeflowResult};

/// Scratch state for one ordering pass.
struct OrderingContext {
    /// remaining unvisited input count -> slots with that count
    buckets: BTreeMap<usize, BTreeSet<usize>>,
    /// slot -> remaining count; `None` once visited or for removed slots
    remaining: Vec<Option<usize>>,
}

impl OrderingContext {
    fn new<T>(graph: &Graph<T>) -> Self {
        let mut ctx = Self {
            buckets: BTreeMap::new(),
            remaining: vec![None; graph.slot_count()],
        };
        for node in graph.iter() {
            let slot = node.id().index();
            let count = node.input_count();
            ctx.remaining[slot] = Some(count);
            ctx.buckets.entry(count).or_default().insert(slot);
        }
        ctx
    }

    fn pop_ready(&mut self) -> Option<usize> {
        let ready = self.buckets.get_mut(&0)?;
        let slot = ready.pop_first()?;
        if ready.is_empty() {
            self.buckets.remove(&0);
        }
        self.remaining[slot] = None;
        Some(slot)
    }

    fn decrement(&mut self, slot: usize) {
        let Some(count) = self.remaining[slot] else {
            return;
        };
        if let Some(bucket) = self.buckets.get_mut(&count) {
            bucket.remove(&slot);
            if bucket.is_empty() {
                self.buckets.remove(&count);
            }
        }
        let count = count.saturating_sub(1);
        self.remaining[slot] = Some(count);
        self.buckets.entry(count).or_default().insert(slot);
    }

    /// Slots never released; non-empty only when the graph has a cycle
    fn leftover(&self) -> Vec<usize> {
        self.buckets.values().flatten().copied().collect()
    }
}

impl<T> Graph<T> {
    /// Order all nodes so that every connection points forward.
    ///
    /// Fails with [`NodeflowError::CycleDetected`] when no such order exists;
    /// no partial order is returned.
    pub fn topological_order(&self) -> NodeflowResult<Vec<NodeId>> {
        let mut ctx = OrderingContext::new(self);
        let mut order = Vec::with_capacity(self.node_count());

        while let Some(slot) = ctx.pop_ready() {
            let id = NodeId::new(self.id(), slot);
            if let Some(node) = self.node(id) {
                for (_, port) in node.outputs() {
                    ctx.decrement(port.remote().node.index());
                }
            }
            order.push(id);
        }

        let leftover = ctx.leftover();
        if !leftover.is_empty() {
            let nodes = self.cycle_members(&leftover);
            debug!(stuck = leftover.len(), "topological sort found a cycle");
            return Err(NodeflowError::CycleDetected {
                nodes: nodes.iter().map(ToString::to_string).collect(),
            });
        }

        Ok(order)
    }

    /// Whether a topological order exists
    pub fn is_acyclic(&self) -> bool {
        self.topological_order().is_ok()
    }

    /// Nodes among `stuck` that actually sit on a cycle, as opposed to nodes
    /// that are merely downstream of one.
    fn cycle_members(&self, stuck: &[usize]) -> Vec<NodeId> {
        let stuck: BTreeSet<usize> = stuck.iter().copied().collect();
        let mut sub: DiGraphMap<usize, ()> = DiGraphMap::new();

        for &slot in &stuck {
            sub.add_node(slot);
        }
        for conn in self.connections() {
            let (from, to) = (conn.from.index(), conn.to.index());
            if stuck.contains(&from) && stuck.contains(&to) {
                sub.add_edge(from, to, ());
            }
        }

        let mut members: Vec<usize> = tarjan_scc(&sub)
            .into_iter()
            .filter(|scc| scc.len() > 1 || sub.contains_edge(scc[0], scc[0]))
            .flatten()
            .collect();
        members.sort_unstable();

        members
            .into_iter()
            .map(|slot| NodeId::new(self.id(), slot))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(order: &[NodeId], id: NodeId) -> usize {
        order.iter().position(|n| *n == id).unwrap()
    }

    fn assert_respects_edges<T>(graph: &Graph<T>, order: &[NodeId]) {
        assert_eq!(order.len(), graph.node_count());
        for conn in graph.connections() {
            assert!(
                position(order, conn.from) < position(order, conn.to),
                "{:?} must precede {:?}",
                conn.from,
                conn.to
            );
        }
    }

    #[test]
    fn test_empty_graph() {
        let graph: Graph<()> = Graph::new();
        assert!(graph.topological_order().unwrap().is_empty());
    }

    #[test]
    fn test_linear_order() {
        let mut graph = Graph::new();
        let c = graph.add_node("c");
        let b = graph.add_node("b");
        let a = graph.add_node("a");
        graph.connect(a, 0, b, 0).unwrap();
        graph.connect(b, 0, c, 0).unwrap();

        assert_eq!(graph.topological_order().unwrap(), vec![a, b, c]);
    }

    #[test]
    fn test_diamond_order() {
        let mut graph = Graph::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let c = graph.add_node("c");
        let d = graph.add_node("d");
        graph.connect(a, 0, b, 0).unwrap();
        graph.connect(a, 1, c, 0).unwrap();
        graph.connect(b, 0, d, 0).unwrap();
        graph.connect(c, 0, d, 1).unwrap();

        let order = graph.topological_order().unwrap();
        assert_eq!(order[0], a);
        assert_eq!(order[3], d);
        assert_respects_edges(&graph, &order);
    }

    #[test]
    fn test_diamond_with_swapped_insertion() {
        let mut graph = Graph::new();
        let a = graph.add_node("a");
        let c = graph.add_node("c");
        let b = graph.add_node("b");
        let d = graph.add_node("d");
        graph.connect(a, 0, b, 0).unwrap();
        graph.connect(a, 1, c, 0).unwrap();
        graph.connect(b, 0, d, 0).unwrap();
        graph.connect(c, 0, d, 1).unwrap();

        let order = graph.topological_order().unwrap();
        assert_eq!(order, vec![a, c, b, d]);
        assert_respects_edges(&graph, &order);
    }

    #[test]
    fn test_order_is_reproducible() {
        let mut graph = Graph::new();
        let ids: Vec<_> = (0..6).map(|i| graph.add_node(i)).collect();
        graph.connect(ids[5], 0, ids[0], 0).unwrap();
        graph.connect(ids[3], 0, ids[1], 0).unwrap();
        graph.connect(ids[0], 0, ids[1], 1).unwrap();

        let first = graph.topological_order().unwrap();
        let second = graph.topological_order().unwrap();
        assert_eq!(first, second);
        assert_respects_edges(&graph, &first);
    }

    #[test]
    fn test_closing_a_cycle_fails() {
        let mut graph = Graph::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let c = graph.add_node("c");
        let tail = graph.add_node("tail");
        graph.connect(a, 0, b, 0).unwrap();
        graph.connect(b, 0, c, 0).unwrap();
        graph.connect(c, 1, tail, 0).unwrap();
        assert!(graph.is_acyclic());

        graph.connect(c, 0, a, 0).unwrap();
        match graph.topological_order() {
            Err(NodeflowError::CycleDetected { nodes }) => {
                assert_eq!(nodes, vec!["node #0", "node #1", "node #2"]);
            }
            other => panic!("expected cycle, got {:?}", other),
        }

        graph.disconnect(c, 0, a, 0);
        assert!(graph.is_acyclic());
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let mut graph = Graph::new();
        let a = graph.add_node(());
        graph.connect(a, 0, a, 0).unwrap();

        assert!(matches!(
            graph.topological_order(),
            Err(NodeflowError::CycleDetected { nodes }) if nodes == vec!["node #0"]
        ));
    }

    #[test]
    fn test_order_after_removal() {
        let mut graph = Graph::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        let c = graph.add_node(());
        graph.connect(a, 0, b, 0).unwrap();
        graph.connect(b, 0, c, 0).unwrap();
        graph.remove_node(b);

        assert_eq!(graph.topological_order().unwrap(), vec![a, c]);
    }
}
