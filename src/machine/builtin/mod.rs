// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Built-in text machines
//!
//! Small sources, transforms and sinks over [`Value`] so that pipelines can
//! be run from the command line without any external machine library.

mod sink;
mod source;
mod split;
mod text;

pub use sink::{FileSink, StdoutSink};
pub use source::{FileSource, TextSource};
pub use split::{TextJoin, TextSplit};
pub use text::{ChangeCase, CountUnit, TextAffix, TextCase, TextCount, TextReverse};

use super::{Machine, MachineRegistry, Value};

/// Register every built-in machine type
pub fn register_all(registry: &mut MachineRegistry) {
    registry.register(TextSource::NAME, || Box::new(TextSource::default()));
    registry.register(FileSource::NAME, || Box::new(FileSource::default()));
    registry.register(TextReverse::NAME, || Box::new(TextReverse));
    registry.register(ChangeCase::NAME, || Box::new(ChangeCase::default()));
    registry.register(TextAffix::NAME, || Box::new(TextAffix::default()));
    registry.register(TextCount::NAME, || Box::new(TextCount::default()));
    registry.register(TextSplit::NAME, || Box::new(TextSplit::default()));
    registry.register(TextJoin::NAME, || Box::new(TextJoin::default()));
    registry.register(FileSink::NAME, || Box::new(FileSink::default()));
    registry.register(StdoutSink::NAME, || Box::new(StdoutSink));
}

/// Text of input `index`, rendering numbers as text
fn text_input(inputs: &[Option<Value>], index: usize) -> Option<String> {
    inputs
        .get(index)
        .and_then(Option::as_ref)
        .map(|value| match value {
            Value::Text(s) => s.clone(),
            other => other.to_string(),
        })
}

/// Apply `f` to the single input, passing absence through
fn map_single(
    inputs: &[Option<Value>],
    f: impl FnOnce(String) -> Value,
) -> Vec<Option<Value>> {
    vec![text_input(inputs, 0).map(f)]
}

#[cfg(test)]
pub(crate) fn run(machine: &dyn Machine, inputs: Vec<Option<Value>>) -> Vec<Option<Value>> {
    machine.process(inputs, &mut |_| {}).unwrap()
}
