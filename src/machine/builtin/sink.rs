// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Sink machines: one input, no outputs

use anyhow::Context;
use std::path::PathBuf;

use super::text_input;
use crate::machine::{Machine, Settings, Value};

/// Writes its input to a file
#[derive(Debug, Clone, Default)]
pub struct FileSink {
    pub path: Option<PathBuf>,
}

impl FileSink {
    pub const NAME: &'static str = "Sink.File";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

impl Machine for FileSink {
    fn type_name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Writes the input to a file"
    }

    fn input_count(&self) -> usize {
        1
    }

    fn output_count(&self) -> usize {
        0
    }

    fn process(
        &self,
        inputs: Vec<Option<Value>>,
        progress: &mut dyn FnMut(u8),
    ) -> anyhow::Result<Vec<Option<Value>>> {
        let path = self.path.as_ref().context("no path configured")?;
        if let Some(text) = text_input(&inputs, 0) {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            progress(100);
        }
        Ok(vec![])
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

/// Prints its input on standard output
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl StdoutSink {
    pub const NAME: &'static str = "Sink.Stdout";
}

impl Machine for StdoutSink {
    fn type_name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Prints the input on standard output"
    }

    fn input_count(&self) -> usize {
        1
    }

    fn output_count(&self) -> usize {
        0
    }

    fn process(
        &self,
        inputs: Vec<Option<Value>>,
        _progress: &mut dyn FnMut(u8),
    ) -> anyhow::Result<Vec<Option<Value>>> {
        if let Some(text) = text_input(&inputs, 0) {
            println!("{}", text);
        }
        Ok(vec![])
    }
}
