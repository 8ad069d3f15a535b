// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Nodes and their ports
//!
//! Ports only exist while connected: a node's `inputs` and `outputs` maps hold
//! exactly the occupied indices, each pointing at its remote counterpart.

use std::collections::BTreeMap;

use super::id::{NodeId, PortKey};

/// One end of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Port {
    remote: PortKey,
}

impl Port {
    pub(crate) fn new(remote: PortKey) -> Self {
        Self { remote }
    }

    /// The port on the other end of this connection
    pub fn remote(&self) -> PortKey {
        self.remote
    }
}

/// A graph vertex: an opaque payload plus its occupied ports.
#[derive(Debug)]
pub struct Node<T> {
    id: NodeId,
    payload: T,
    pub(crate) inputs: BTreeMap<usize, Port>,
    pub(crate) outputs: BTreeMap<usize, Port>,
}

impl<T> Node<T> {
    pub(crate) fn new(id: NodeId, payload: T) -> Self {
        Self {
            id,
            payload,
            inputs: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut T {
        &mut self.payload
    }

    pub(crate) fn into_payload(self) -> T {
        self.payload
    }

    /// Connected input at `index`, if any
    pub fn input(&self, index: usize) -> Option<&Port> {
        self.inputs.get(&index)
    }

    /// Connected output at `index`, if any
    pub fn output(&self, index: usize) -> Option<&Port> {
        self.outputs.get(&index)
    }

    /// Occupied inputs in index order
    pub fn inputs(&self) -> impl Iterator<Item = (usize, &Port)> {
        self.inputs.iter().map(|(i, p)| (*i, p))
    }

    /// Occupied outputs in index order
    pub fn outputs(&self) -> impl Iterator<Item = (usize, &Port)> {
        self.outputs.iter().map(|(i, p)| (*i, p))
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }
}
