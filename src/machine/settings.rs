// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! `key='value'` settings codec
//!
//! Machines persist their settings as a flat list of quoted pairs, e.g.
//! `path='out.txt' case='upper'`. Inside a value, `'` and `\` are escaped
//! with a backslash.

use anyhow::{bail, Context};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Ordered set of string settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings(BTreeMap<String, String>);

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the raw text of a settings block
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let mut settings = Self::new();
        let mut chars = raw.char_indices().peekable();

        loop {
            while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
            let Some(&(start, _)) = chars.peek() else {
                break;
            };

            let mut key = String::new();
            while let Some((_, c)) = chars.next_if(|(_, c)| *c != '=') {
                key.push(c);
            }
            let key = key.trim().to_string();
            if key.is_empty() || !key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
                bail!("invalid setting name '{}' at offset {}", key, start);
            }

            if chars.next().is_none() {
                bail!("setting '{}' has no value", key);
            }
            while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
            match chars.next() {
                Some((_, '\'')) => {}
                _ => bail!("value of setting '{}' must be single-quoted", key),
            }

            let mut value = String::new();
            let mut closed = false;
            while let Some((_, c)) = chars.next() {
                match c {
                    '\\' => {
                        let (_, escaped) = chars
                            .next()
                            .with_context(|| format!("dangling escape in setting '{}'", key))?;
                        value.push(escaped);
                    }
                    '\'' => {
                        closed = true;
                        break;
                    }
                    other => value.push(other),
                }
            }
            if !closed {
                bail!("unterminated value for setting '{}'", key);
            }

            settings.0.insert(key, value);
        }

        Ok(settings)
    }

    /// Render as space-separated `key='value'` pairs
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}='{}'", k, escape(v)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Parse a setting into `V`, if present
    pub fn get_parsed<V>(&self, key: &str) -> anyhow::Result<Option<V>>
    where
        V: FromStr,
        V::Err: std::error::Error + Send + Sync + 'static,
    {
        self.get(key)
            .map(|raw| {
                raw.parse::<V>()
                    .with_context(|| format!("setting '{}' has invalid value '{}'", key, raw))
            })
            .transpose()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Set `key` only when `value` is present
    pub fn set_opt(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `None` when empty, so machines can return it from `encode_settings`
    pub fn into_encoded(self) -> Option<String> {
        (!self.is_empty()).then(|| self.encode())
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
