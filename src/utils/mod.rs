// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Utility modules
//!
//! Terminal output helpers for the nodeflow CLI.

pub mod colors;
pub mod progress;

pub use colors::*;
pub use progress::RunProgress;
