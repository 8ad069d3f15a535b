// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Node/port graph model
//!
//! A [`Graph`] owns its nodes in an arena. Nodes expose sparse maps of their
//! connected ports, and every connection is a symmetric pair of ports that
//! name each other. Ordering, rendering and mutation events live alongside.

mod id;
mod model;
mod node;
mod observer;
mod order;
pub mod render;

pub use id::{GraphId, NodeId, PortDirection, PortKey};
pub use model::Graph;
pub use node::{Node, Port};
pub use observer::{Connection, GraphEvent, GraphObserver};
