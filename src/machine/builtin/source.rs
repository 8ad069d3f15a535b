// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Source machines: no inputs, one output

use anyhow::Context;
use std::path::PathBuf;

use crate::machine::{Machine, Settings, Value};

/// Emits a fixed piece of text
#[derive(Debug, Clone, Default)]
pub struct TextSource {
    pub text: Option<String>,
}

impl TextSource {
    pub const NAME: &'static str = "Source.Text";

    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

impl Machine for TextSource {
    fn type_name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Emits the configured text"
    }

    fn input_count(&self) -> usize {
        0
    }

    fn output_count(&self) -> usize {
        1
    }

    fn process(
        &self,
        _inputs: Vec<Option<Value>>,
        _progress: &mut dyn FnMut(u8),
    ) -> anyhow::Result<Vec<Option<Value>>> {
        let text = self.text.as_ref().context("no text configured")?;
        Ok(vec![Some(Value::Text(text.clone()))])
    }

    fn encode_settings(&self) -> Option<String> {
        let mut settings = Settings::new();
        settings.set_opt("text", self.text.as_deref());
        settings.into_encoded()
    }

    fn decode_settings(&mut self, raw: &str) -> anyhow::Result<()> {
        let settings = Settings::parse(raw)?;
        self.text = settings.get("text").map(str::to_string);
        Ok(())
    }
}

/// Reads a UTF-8 file
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    pub path: Option<PathBuf>,
}

impl FileSource {
    pub const NAME: &'static str = "Source.File";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

impl Machine for FileSource {
    fn type_name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Reads a text file"
    }

    fn input_count(&self) -> usize {
        0
    }

    fn output_count(&self) -> usize {
        1
    }

    fn process(
        &self,
        _inputs: Vec<Option<Value>>,
        progress: &mut dyn FnMut(u8),
    ) -> anyhow::Result<Vec<Option<Value>>> {
        let path = self.path.as_ref().context("no path configured")?;
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        progress(100);
        Ok(vec![Some(Value::Text(content))])
    }

    fn encode_settings(&self) -> Option<String> {
        let mut settings = Settings::new();
        settings.set_opt("path", self.path.as_ref().and_then(|p| p.to_str()));
        settings.into_encoded()
    }

    fn decode_settings(&mut self, raw: &str) -> anyhow::Result<()> {
        let settings = Settings::parse(raw)?;
        self.path = settings.get("path").map(PathBuf::from);
        Ok(())
    }
}
