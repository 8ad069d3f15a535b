// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Graph arena
//!
//! The graph owns every node; ports refer to each other through [`PortKey`]
//! handles, so breaking a connection is just clearing two map entries.

use std::fmt;

use tracing::trace;

use super::id::{GraphId, NodeId, PortDirection, PortKey};
use super::node::{Node, Port};
use super::observer::{Connection, GraphEvent, GraphObserver};
use crate::errors::{NodeflowError, NodeflowResult};

/// A directed graph of nodes connected through indexed ports
pub struct Graph<T> {
    id: GraphId,
    slots: Vec<Option<Node<T>>>,
    node_count: usize,
    connection_count: usize,
    observers: Vec<Box<dyn GraphObserver>>,
}

impl<T> Graph<T> {
    /// Create an empty graph
    pub fn new() -> Self {
        Self {
            id: GraphId::next(),
            slots: Vec::new(),
            node_count: 0,
            connection_count: 0,
            observers: Vec::new(),
        }
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn connection_count(&self) -> usize {
        self.connection_count
    }

    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    /// Register an observer that is told about every successful mutation
    pub fn subscribe(&mut self, observer: Box<dyn GraphObserver>) {
        self.observers.push(observer);
    }

    /// Add a node wrapping `payload`
    pub fn add_node(&mut self, payload: T) -> NodeId {
        let id = NodeId::new(self.id, self.slots.len());
        self.slots.push(Some(Node::new(id, payload)));
        self.node_count += 1;
        self.emit(GraphEvent::NodeAdded(id));
        id
    }

    /// Remove a node, disconnecting all of its ports first.
    ///
    /// Returns the payload, or `None` when `id` is not a member.
    pub fn remove_node(&mut self, id: NodeId) -> Option<T> {
        let node = self.node(id)?;

        let inputs: Vec<(usize, PortKey)> =
            node.inputs().map(|(i, p)| (i, p.remote())).collect();
        let outputs: Vec<(usize, PortKey)> =
            node.outputs().map(|(i, p)| (i, p.remote())).collect();

        for (index, remote) in inputs {
            self.disconnect(remote.node, remote.index, id, index);
        }
        for (index, remote) in outputs {
            self.disconnect(id, index, remote.node, remote.index);
        }

        let node = self.slots[id.index()].take()?;
        self.node_count -= 1;
        self.emit(GraphEvent::NodeRemoved(id));
        Some(node.into_payload())
    }

    /// Connect output `from_index` of `from` to input `to_index` of `to`.
    ///
    /// Fails without touching the graph when either node is foreign or
    /// removed, or when either port already carries a connection.
    pub fn connect(
        &mut self,
        from: NodeId,
        from_index: usize,
        to: NodeId,
        to_index: usize,
    ) -> NodeflowResult<()> {
        let source = self.node(from).ok_or(NodeflowError::NotMember { node: from })?;
        let target = self.node(to).ok_or(NodeflowError::NotMember { node: to })?;

        if source.output(from_index).is_some() {
            return Err(NodeflowError::PortOccupied {
                node: from,
                direction: PortDirection::Output,
                index: from_index,
            });
        }
        if target.input(to_index).is_some() {
            return Err(NodeflowError::PortOccupied {
                node: to,
                direction: PortDirection::Input,
                index: to_index,
            });
        }

        if let Some(node) = self.node_mut(from) {
            node.outputs
                .insert(from_index, Port::new(PortKey::input(to, to_index)));
        }
        if let Some(node) = self.node_mut(to) {
            node.inputs
                .insert(to_index, Port::new(PortKey::output(from, from_index)));
        }
        self.connection_count += 1;

        self.emit(GraphEvent::Connected(Connection {
            from,
            from_index,
            to,
            to_index,
        }));
        Ok(())
    }

    /// Break the link between two ports.
    ///
    /// Only acts when both ports exist and name each other as remote;
    /// anything else is a no-op. Returns whether a link was removed.
    pub fn disconnect(
        &mut self,
        from: NodeId,
        from_index: usize,
        to: NodeId,
        to_index: usize,
    ) -> bool {
        let forward = self
            .node(from)
            .and_then(|n| n.output(from_index))
            .map(Port::remote);
        let backward = self
            .node(to)
            .and_then(|n| n.input(to_index))
            .map(Port::remote);

        if forward != Some(PortKey::input(to, to_index))
            || backward != Some(PortKey::output(from, from_index))
        {
            return false;
        }

        if let Some(node) = self.node_mut(from) {
            node.outputs.remove(&from_index);
        }
        if let Some(node) = self.node_mut(to) {
            node.inputs.remove(&to_index);
        }
        self.connection_count -= 1;

        self.emit(GraphEvent::Disconnected(Connection {
            from,
            from_index,
            to,
            to_index,
        }));
        true
    }

    /// Find the node that owns `payload` (compared by address)
    pub fn node_for(&self, payload: &T) -> Option<NodeId> {
        self.iter()
            .find(|node| std::ptr::eq(node.payload(), payload))
            .map(Node::id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<T>> {
        if id.graph() != self.id {
            return None;
        }
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        if id.graph() != self.id {
            return None;
        }
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn payload(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(Node::payload)
    }

    pub fn payload_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_mut(id).map(Node::payload_mut)
    }

    /// Live nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Node<T>> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Live node handles in insertion order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter().map(Node::id)
    }

    /// Every connection, grouped by consuming node and ordered by input index
    pub fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        self.iter().flat_map(|node| {
            node.inputs().map(move |(index, port)| Connection {
                from: port.remote().node,
                from_index: port.remote().index,
                to: node.id(),
                to_index: index,
            })
        })
    }

    /// The output port feeding input `index` of `id`
    pub fn input_of(&self, id: NodeId, index: usize) -> Option<PortKey> {
        self.node(id)?.input(index).map(Port::remote)
    }

    /// The input port fed by output `index` of `id`
    pub fn output_of(&self, id: NodeId, index: usize) -> Option<PortKey> {
        self.node(id)?.output(index).map(Port::remote)
    }

    /// Slot capacity, including removed nodes
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn emit(&mut self, event: GraphEvent) {
        trace!(?event, graph = ?self.id, "graph mutated");
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
    }
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Graph<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("id", &self.id)
            .field("nodes", &self.iter().collect::<Vec<_>>())
            .field("connection_count", &self.connection_count)
            .field("observers", &self.observers.len())
            .finish()
    }
}
