// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Processing units
//!
//! A [`Machine`] is the payload of a pipeline node: it declares how many
//! inputs and outputs it has, labels each with a [`PortCode`], and turns a
//! vector of input values into a vector of output values. Machines are
//! created by name through a [`MachineRegistry`].

pub mod builtin;
mod registry;
pub mod settings;

pub use registry::{MachineFactory, MachineRegistry};
pub use settings::Settings;

use serde::Serialize;
use std::fmt;

/// Data carried along a connection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Number(f64),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Text(_) => None,
            Self::Number(n) => Some(*n),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Single-character label of a port; blank means "the only port".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortCode(char);

impl PortCode {
    pub const BLANK: PortCode = PortCode(' ');

    pub const fn new(code: char) -> Self {
        Self(code)
    }

    pub fn is_blank(self) -> bool {
        self.0 == ' '
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for PortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_blank() {
            Ok(())
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Capability every node payload provides to the pipeline
pub trait Machine: Send {
    /// Registry name, e.g. `Text.Reverse`
    fn type_name(&self) -> &str;

    /// Human-readable summary
    fn description(&self) -> &str {
        ""
    }

    fn input_count(&self) -> usize;

    fn output_count(&self) -> usize;

    fn input_code(&self, _index: usize) -> PortCode {
        PortCode::BLANK
    }

    fn output_code(&self, _index: usize) -> PortCode {
        PortCode::BLANK
    }

    /// Transform inputs into outputs.
    ///
    /// `inputs` has exactly `input_count()` entries; an entry is `None` when
    /// its port is unconnected. The result must have `output_count()` entries.
    /// `progress` accepts a percentage from 0 to 100.
    fn process(
        &self,
        inputs: Vec<Option<Value>>,
        progress: &mut dyn FnMut(u8),
    ) -> anyhow::Result<Vec<Option<Value>>>;

    /// Settings as `key='value'` pairs, or `None` if there is nothing to save
    fn encode_settings(&self) -> Option<String> {
        None
    }

    /// Restore settings previously produced by [`Machine::encode_settings`]
    fn decode_settings(&mut self, _raw: &str) -> anyhow::Result<()> {
        Ok(())
    }

    /// Input index labelled `code`; no code selects port 0
    fn input_index(&self, code: Option<char>) -> Option<usize> {
        match code {
            None => (self.input_count() > 0).then_some(0),
            Some(c) => (0..self.input_count()).find(|&i| self.input_code(i).as_char() == c),
        }
    }

    /// Output index labelled `code`; no code selects port 0
    fn output_index(&self, code: Option<char>) -> Option<usize> {
        match code {
            None => (self.output_count() > 0).then_some(0),
            Some(c) => (0..self.output_count()).find(|&i| self.output_code(i).as_char() == c),
        }
    }
}

impl<M: Machine + ?Sized> Machine for Box<M> {
    fn type_name(&self) -> &str {
        (**self).type_name()
    }

    fn description(&self) -> &str {
        (**self).description()
    }

    fn input_count(&self) -> usize {
        (**self).input_count()
    }

    fn output_count(&self) -> usize {
        (**self).output_count()
    }

    fn input_code(&self, index: usize) -> PortCode {
        (**self).input_code(index)
    }

    fn output_code(&self, index: usize) -> PortCode {
        (**self).output_code(index)
    }

    fn process(
        &self,
        inputs: Vec<Option<Value>>,
        progress: &mut dyn FnMut(u8),
    ) -> anyhow::Result<Vec<Option<Value>>> {
        (**self).process(inputs, progress)
    }

    fn encode_settings(&self) -> Option<String> {
        (**self).encode_settings()
    }

    fn decode_settings(&mut self, raw: &str) -> anyhow::Result<()> {
        (**self).decode_settings(raw)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Configurable machine used by graph, pipeline and codec tests.

    use super::*;
    use std::sync::{Arc, Mutex};

    pub struct StubMachine {
        pub name: String,
        pub inputs: Vec<PortCode>,
        pub outputs: Vec<PortCode>,
        pub settings: Option<String>,
        pub fail: bool,
        pub calls: Arc<Mutex<Vec<Vec<Option<Value>>>>>,
    }

    impl StubMachine {
        pub fn new(name: &str, inputs: usize, outputs: usize) -> Self {
            Self {
                name: name.to_string(),
                inputs: vec![PortCode::BLANK; inputs],
                outputs: vec![PortCode::BLANK; outputs],
                settings: None,
                fail: false,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn with_codes(mut self, inputs: &str, outputs: &str) -> Self {
            self.inputs = inputs.chars().map(PortCode::new).collect();
            self.outputs = outputs.chars().map(PortCode::new).collect();
            self
        }

        pub fn failing(mut self) -> Self {
            self.fail = true;
            self
        }
    }

    impl Machine for StubMachine {
        fn type_name(&self) -> &str {
            &self.name
        }

        fn input_count(&self) -> usize {
            self.inputs.len()
        }

        fn output_count(&self) -> usize {
            self.outputs.len()
        }

        fn input_code(&self, index: usize) -> PortCode {
            self.inputs[index]
        }

        fn output_code(&self, index: usize) -> PortCode {
            self.outputs[index]
        }

        /// Emits `"<name>(<inputs joined by +>)"` on every output.
        fn process(
            &self,
            inputs: Vec<Option<Value>>,
            progress: &mut dyn FnMut(u8),
        ) -> anyhow::Result<Vec<Option<Value>>> {
            self.calls.lock().unwrap().push(inputs.clone());
            if self.fail {
                anyhow::bail!("stub {} asked to fail", self.name);
            }
            progress(50);
            let joined: Vec<String> = inputs
                .iter()
                .map(|v| v.as_ref().map(ToString::to_string).unwrap_or_else(|| "-".into()))
                .collect();
            let out = format!("{}({})", self.name, joined.join("+"));
            Ok(vec![Some(Value::Text(out)); self.outputs.len()])
        }

        fn encode_settings(&self) -> Option<String> {
            self.settings.clone()
        }

        fn decode_settings(&mut self, raw: &str) -> anyhow::Result<()> {
            self.settings = Some(raw.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StubMachine;
    use super::*;

    #[test]
    fn test_port_index_by_code() {
        let m = StubMachine::new("Join", 0, 0).with_codes("HT", "");
        assert_eq!(m.input_index(Some('T')), Some(1));
        assert_eq!(m.input_index(None), Some(0));
        assert_eq!(m.input_index(Some('X')), None);
        assert_eq!(m.output_index(None), None);
    }

    #[test]
    fn test_boxed_machine_forwards() {
        let boxed: Box<dyn Machine> = Box::new(StubMachine::new("Stub", 2, 1));
        assert_eq!(boxed.type_name(), "Stub");
        assert_eq!(boxed.input_count(), 2);
        assert!(boxed.output_code(0).is_blank());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from("abc").to_string(), "abc");
        assert_eq!(Value::from(3.0).to_string(), "3");
        assert_eq!(Value::from(2.5).as_number(), Some(2.5));
    }
}
