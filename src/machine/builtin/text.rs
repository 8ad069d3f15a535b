// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! One-in, one-out text transforms

use anyhow::bail;
use std::str::FromStr;

use super::map_single;
use crate::machine::{Machine, Settings, Value};

/// Reverses the characters of its input
#[derive(Debug, Clone, Copy, Default)]
pub struct TextReverse;

impl TextReverse {
    pub const NAME: &'static str = "Text.Reverse";
}

impl Machine for TextReverse {
    fn type_name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Reverses the characters of the input"
    }

    fn input_count(&self) -> usize {
        1
    }

    fn output_count(&self) -> usize {
        1
    }

    fn process(
        &self,
        inputs: Vec<Option<Value>>,
        _progress: &mut dyn FnMut(u8),
    ) -> anyhow::Result<Vec<Option<Value>>> {
        Ok(map_single(&inputs, |text| {
            Value::Text(text.chars().rev().collect())
        }))
    }
}

/// Target case for [`ChangeCase`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextCase {
    #[default]
    Upper,
    Lower,
    /// First letter of every word upper-cased, the rest lower-cased
    Title,
}

impl TextCase {
    fn as_str(self) -> &'static str {
        match self {
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Title => "title",
        }
    }

    fn apply(self, text: &str) -> String {
        match self {
            Self::Upper => text.to_uppercase(),
            Self::Lower => text.to_lowercase(),
            Self::Title => {
                let mut out = String::with_capacity(text.len());
                let mut word_start = true;
                for c in text.chars() {
                    if c.is_whitespace() {
                        word_start = true;
                        out.push(c);
                    } else if word_start {
                        word_start = false;
                        out.extend(c.to_uppercase());
                    } else {
                        out.extend(c.to_lowercase());
                    }
                }
                out
            }
        }
    }
}

impl FromStr for TextCase {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upper" => Ok(Self::Upper),
            "lower" => Ok(Self::Lower),
            "title" => Ok(Self::Title),
            other => bail!("unknown case '{}' (expected upper, lower or title)", other),
        }
    }
}

/// Changes the case of its input
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeCase {
    pub case: TextCase,
}

impl ChangeCase {
    pub const NAME: &'static str = "Text.Case";

    pub fn new(case: TextCase) -> Self {
        Self { case }
    }
}

impl Machine for ChangeCase {
    fn type_name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Converts the input to upper, lower or title case"
    }

    fn input_count(&self) -> usize {
        1
    }

    fn output_count(&self) -> usize {
        1
    }

    fn process(
        &self,
        inputs: Vec<Option<Value>>,
        _progress: &mut dyn FnMut(u8),
    ) -> anyhow::Result<Vec<Option<Value>>> {
        Ok(map_single(&inputs, |text| Value::Text(self.case.apply(&text))))
    }

    fn encode_settings(&self) -> Option<String> {
        let mut settings = Settings::new();
        settings.set("case", self.case.as_str());
        settings.into_encoded()
    }

    fn decode_settings(&mut self, raw: &str) -> anyhow::Result<()> {
        let settings = Settings::parse(raw)?;
        if let Some(case) = settings.get("case") {
            self.case = case.parse()?;
        }
        Ok(())
    }
}

/// Wraps its input in a prefix and a suffix
#[derive(Debug, Clone, Default)]
pub struct TextAffix {
    pub prefix: String,
    pub suffix: String,
}

impl TextAffix {
    pub const NAME: &'static str = "Text.Affix";

    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }
}

impl Machine for TextAffix {
    fn type_name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Adds a prefix and a suffix to the input"
    }

    fn input_count(&self) -> usize {
        1
    }

    fn output_count(&self) -> usize {
        1
    }

    fn process(
        &self,
        inputs: Vec<Option<Value>>,
        _progress: &mut dyn FnMut(u8),
    ) -> anyhow::Result<Vec<Option<Value>>> {
        Ok(map_single(&inputs, |text| {
            Value::Text(format!("{}{}{}", self.prefix, text, self.suffix))
        }))
    }

    fn encode_settings(&self) -> Option<String> {
        let mut settings = Settings::new();
        if !self.prefix.is_empty() {
            settings.set("prefix", self.prefix.as_str());
        }
        if !self.suffix.is_empty() {
            settings.set("suffix", self.suffix.as_str());
        }
        settings.into_encoded()
    }

    fn decode_settings(&mut self, raw: &str) -> anyhow::Result<()> {
        let settings = Settings::parse(raw)?;
        self.prefix = settings.get("prefix").unwrap_or_default().to_string();
        self.suffix = settings.get("suffix").unwrap_or_default().to_string();
        Ok(())
    }
}

/// What [`TextCount`] counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CountUnit {
    #[default]
    Words,
    Chars,
    Lines,
}

impl CountUnit {
    fn as_str(self) -> &'static str {
        match self {
            Self::Words => "words",
            Self::Chars => "chars",
            Self::Lines => "lines",
        }
    }
}

impl FromStr for CountUnit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "words" => Ok(Self::Words),
            "chars" => Ok(Self::Chars),
            "lines" => Ok(Self::Lines),
            other => bail!("unknown unit '{}' (expected words, chars or lines)", other),
        }
    }
}

/// Counts words, characters or lines of its input
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCount {
    pub unit: CountUnit,
}

impl TextCount {
    pub const NAME: &'static str = "Text.Count";

    pub fn new(unit: CountUnit) -> Self {
        Self { unit }
    }
}

impl Machine for TextCount {
    fn type_name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Counts words, characters or lines and emits a number"
    }

    fn input_count(&self) -> usize {
        1
    }

    fn output_count(&self) -> usize {
        1
    }

    fn process(
        &self,
        inputs: Vec<Option<Value>>,
        _progress: &mut dyn FnMut(u8),
    ) -> anyhow::Result<Vec<Option<Value>>> {
        Ok(map_single(&inputs, |text| {
            let count = match self.unit {
                CountUnit::Words => text.split_whitespace().count(),
                CountUnit::Chars => text.chars().count(),
                CountUnit::Lines => text.lines().count(),
            };
            Value::Number(count as f64)
        }))
    }

    fn encode_settings(&self) -> Option<String> {
        let mut settings = Settings::new();
        settings.set("unit", self.unit.as_str());
        settings.into_encoded()
    }

    fn decode_settings(&mut self, raw: &str) -> anyhow::Result<()> {
        let settings = Settings::parse(raw)?;
        if let Some(unit) = settings.get("unit") {
            self.unit = unit.parse()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::builtin::run;

    #[test]
    fn test_reverse() {
        let out = run(&TextReverse, vec![Some("abc".into())]);
        assert_eq!(out, vec![Some(Value::from("cba"))]);
    }

    #[test]
    fn test_missing_input_passes_through() {
        assert_eq!(run(&TextReverse, vec![None]), vec![None]);
        assert_eq!(run(&TextCount::default(), vec![None]), vec![None]);
    }

    #[test]
    fn test_change_case() {
        let upper = run(&ChangeCase::new(TextCase::Upper), vec![Some("MiXed".into())]);
        assert_eq!(upper, vec![Some(Value::from("MIXED"))]);

        let title = run(
            &ChangeCase::new(TextCase::Title),
            vec![Some("hello  wORLD".into())],
        );
        assert_eq!(title, vec![Some(Value::from("Hello  World"))]);
    }

    #[test]
    fn test_change_case_settings() {
        let mut machine = ChangeCase::default();
        machine.decode_settings("case='lower'").unwrap();
        assert_eq!(machine.case, TextCase::Lower);
        assert_eq!(machine.encode_settings().as_deref(), Some("case='lower'"));
        assert!(machine.decode_settings("case='sideways'").is_err());
    }

    #[test]
    fn test_affix() {
        let machine = TextAffix::new("<", ">");
        assert_eq!(run(&machine, vec![Some("x".into())]), vec![Some(Value::from("<x>"))]);
        assert_eq!(
            machine.encode_settings().as_deref(),
            Some("prefix='<' suffix='>'")
        );
        assert_eq!(TextAffix::default().encode_settings(), None);
    }

    #[test]
    fn test_count_units() {
        let text = Some(Value::from("one two\nthree"));
        assert_eq!(
            run(&TextCount::new(CountUnit::Words), vec![text.clone()]),
            vec![Some(Value::Number(3.0))]
        );
        assert_eq!(
            run(&TextCount::new(CountUnit::Lines), vec![text.clone()]),
            vec![Some(Value::Number(2.0))]
        );
        assert_eq!(
            run(&TextCount::new(CountUnit::Chars), vec![text]),
            vec![Some(Value::Number(13.0))]
        );
    }
}
