// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Pipeline execution and validation
//!
//! The executor runs a [`Graph`](crate::graph::Graph) of machines in
//! dependency order; the validator catches problems before a run starts.

mod executor;
mod validation;

pub use executor::{execute, ExecutionReport, Progress, TerminalOutput};
pub use validation::{GraphValidator, ValidationResult};
