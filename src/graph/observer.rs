// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Mutation notifications
//!
//! Observers are called synchronously after a mutation has succeeded. Failed
//! and no-op calls never produce an event.

use super::id::NodeId;

/// A single link between an output port and an input port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Connection {
    pub from: NodeId,
    pub from_index: usize,
    pub to: NodeId,
    pub to_index: usize,
}

/// What changed in a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphEvent {
    NodeAdded(NodeId),
    NodeRemoved(NodeId),
    Connected(Connection),
    Disconnected(Connection),
}

/// Receives [`GraphEvent`]s from a graph it is subscribed to.
pub trait GraphObserver: Send {
    fn on_event(&mut self, event: &GraphEvent);
}

impl<F> GraphObserver for F
where
    F: FnMut(&GraphEvent) + Send,
{
    fn on_event(&mut self, event: &GraphEvent) {
        self(event)
    }
}
