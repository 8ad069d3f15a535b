// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Types command - list the registered machine types

use colored::Colorize;
use miette::Result;
use serde::Serialize;

use super::OutputFormat;
use crate::errors::NodeflowError;
use crate::machine::{Machine, MachineRegistry, PortCode};
use crate::utils::print_header;

/// Description of one machine type
#[derive(Debug, Serialize)]
pub struct TypeInfo {
    pub name: String,
    pub description: String,
    /// Port codes, blank codes as empty strings
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

impl TypeInfo {
    fn of(machine: &dyn Machine) -> Self {
        let codes = |count: usize, code: &dyn Fn(usize) -> PortCode| -> Vec<String> {
            (0..count).map(|i| code(i).to_string()).collect()
        };
        Self {
            name: machine.type_name().to_string(),
            description: machine.description().to_string(),
            inputs: codes(machine.input_count(), &|i| machine.input_code(i)),
            outputs: codes(machine.output_count(), &|i| machine.output_code(i)),
        }
    }
}

/// Every type in `registry`, sorted by name
pub fn describe(registry: &MachineRegistry) -> Vec<TypeInfo> {
    registry
        .names()
        .filter_map(|name| registry.create(name))
        .map(|machine| TypeInfo::of(machine.as_ref()))
        .collect()
}

/// Run the types command
pub async fn run(format: OutputFormat) -> Result<()> {
    let types = describe(&MachineRegistry::with_builtins());

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&types).map_err(NodeflowError::from)?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            print_header("Machine types");
            for info in &types {
                println!(
                    "  {:<14} {} in, {} out  {}",
                    info.name.bold(),
                    ports(&info.inputs),
                    ports(&info.outputs),
                    info.description.dimmed()
                );
            }
        }
    }

    Ok(())
}

/// `1` for a single blank port, `2 (H,T)` when ports carry codes
fn ports(codes: &[String]) -> String {
    if codes.iter().all(String::is_empty) {
        codes.len().to_string()
    } else {
        format!("{} ({})", codes.len(), codes.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_builtins() {
        let types = describe(&MachineRegistry::with_builtins());
        let split = types.iter().find(|t| t.name == "Text.Split").unwrap();
        assert_eq!(split.inputs, vec![String::new()]);
        assert_eq!(split.outputs, vec!["H".to_string(), "T".to_string()]);
    }

    #[test]
    fn test_ports_summary() {
        assert_eq!(ports(&[]), "0");
        assert_eq!(ports(&[String::new()]), "1");
        assert_eq!(ports(&["H".into(), "T".into()]), "2 (H,T)");
    }
}
