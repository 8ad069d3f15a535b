// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Split and join: the multi-port machines.
//!
//! Both use the port codes `H` (head) and `T` (tail), so a split's outputs can
//! be wired straight into a join's inputs.

use super::text_input;
use crate::machine::{Machine, PortCode, Settings, Value};

const HEAD: PortCode = PortCode::new('H');
const TAIL: PortCode = PortCode::new('T');
const DEFAULT_SEPARATOR: &str = " ";

/// Splits its input at the first delimiter into head and tail
#[derive(Debug, Clone)]
pub struct TextSplit {
    pub delimiter: String,
}

impl TextSplit {
    pub const NAME: &'static str = "Text.Split";

    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }
}

impl Default for TextSplit {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl Machine for TextSplit {
    fn type_name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Splits the input at the first delimiter into head (H) and tail (T)"
    }

    fn input_count(&self) -> usize {
        1
    }

    fn output_count(&self) -> usize {
        2
    }

    fn output_code(&self, index: usize) -> PortCode {
        if index == 0 {
            HEAD
        } else {
            TAIL
        }
    }

    fn process(
        &self,
        inputs: Vec<Option<Value>>,
        _progress: &mut dyn FnMut(u8),
    ) -> anyhow::Result<Vec<Option<Value>>> {
        let Some(text) = text_input(&inputs, 0) else {
            return Ok(vec![None, None]);
        };
        if self.delimiter.is_empty() {
            anyhow::bail!("delimiter must not be empty");
        }

        Ok(match text.split_once(self.delimiter.as_str()) {
            Some((head, tail)) => vec![Some(head.into()), Some(tail.into())],
            None => vec![Some(Value::Text(text)), None],
        })
    }

    fn encode_settings(&self) -> Option<String> {
        let mut settings = Settings::new();
        if self.delimiter != DEFAULT_SEPARATOR {
            settings.set("delimiter", self.delimiter.as_str());
        }
        settings.into_encoded()
    }

    fn decode_settings(&mut self, raw: &str) -> anyhow::Result<()> {
        let settings = Settings::parse(raw)?;
        self.delimiter = settings
            .get("delimiter")
            .unwrap_or(DEFAULT_SEPARATOR)
            .to_string();
        Ok(())
    }
}

/// Joins head and tail with a separator, skipping whichever is absent
#[derive(Debug, Clone)]
pub struct TextJoin {
    pub separator: String,
}

impl TextJoin {
    pub const NAME: &'static str = "Text.Join";

    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Default for TextJoin {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl Machine for TextJoin {
    fn type_name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Joins head (H) and tail (T) with a separator"
    }

    fn input_count(&self) -> usize {
        2
    }

    fn output_count(&self) -> usize {
        1
    }

    fn input_code(&self, index: usize) -> PortCode {
        if index == 0 {
            HEAD
        } else {
            TAIL
        }
    }

    fn process(
        &self,
        inputs: Vec<Option<Value>>,
        _progress: &mut dyn FnMut(u8),
    ) -> anyhow::Result<Vec<Option<Value>>> {
        let parts: Vec<String> = (0..2).filter_map(|i| text_input(&inputs, i)).collect();
        if parts.is_empty() {
            return Ok(vec![None]);
        }
        Ok(vec![Some(Value::Text(parts.join(&self.separator)))])
    }

    fn encode_settings(&self) -> Option<String> {
        let mut settings = Settings::new();
        if self.separator != DEFAULT_SEPARATOR {
            settings.set("separator", self.separator.as_str());
        }
        settings.into_encoded()
    }

    fn decode_settings(&mut self, raw: &str) -> anyhow::Result<()> {
        let settings = Settings::parse(raw)?;
        self.separator = settings
            .get("separator")
            .unwrap_or(DEFAULT_SEPARATOR)
            .to_string();
        Ok(())
    }
}
