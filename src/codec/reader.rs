// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Text to graph
//!
//! Reading happens in two passes. The first instantiates every node record
//! through the registry, the second resolves connection lines, so a line
//! may name a record that appears further down the file.

use std::collections::{HashMap, HashSet};

use regex::Regex;
use tracing::{debug, warn};

use super::section::{extract_sections, Quoting, Section};
use crate::errors::{NodeflowError, NodeflowResult};
use crate::graph::{Graph, NodeId, PortDirection};
use crate::machine::{Machine, MachineRegistry};

const GRAPH_SECTION: &str = "Graph";
const RECORD_PATTERN: &str = r"^(\S+)\s+'([^']*)'$";
const CONNECTION_PATTERN: &str = r"^'([^']*)'(?::(\S))?\s*->\s*(\S)?$";

/// A graph read back from text
pub struct LoadedGraph {
    pub graph: Graph<Box<dyn Machine>>,
    /// Type names with no registered machine, each once, in file order
    pub unrecognized: Vec<String>,
}

/// A node record whose connections are still unresolved
struct Pending<'a> {
    name: &'a str,
    id: NodeId,
    connections: Vec<&'a str>,
}

/// Parse the first `Graph` section of `text`
pub fn parse(text: &str, registry: &MachineRegistry) -> NodeflowResult<LoadedGraph> {
    let record_re = Regex::new(RECORD_PATTERN)?;
    let connection_re = Regex::new(CONNECTION_PATTERN)?;

    let sections = extract_sections(text, '{', '}', Quoting::Within(GRAPH_SECTION))?;
    let section = sections
        .iter()
        .find(|s| s.name == GRAPH_SECTION)
        .ok_or_else(|| NodeflowError::MissingSection {
            name: GRAPH_SECTION.to_string(),
        })?;

    let mut graph: Graph<Box<dyn Machine>> = Graph::new();
    let mut unrecognized: Vec<String> = Vec::new();
    let mut seen = HashSet::new();
    let mut skipped = HashSet::new();
    let mut ids = HashMap::new();
    let mut pending = Vec::new();

    for record in extract_sections(section.body, '{', '}', Quoting::Opaque)? {
        let caps = record_re
            .captures(record.name)
            .ok_or_else(|| NodeflowError::MalformedRecord {
                header: record.name.to_string(),
            })?;
        let (Some(type_name), Some(name)) = (caps.get(1), caps.get(2)) else {
            return Err(NodeflowError::MalformedRecord {
                header: record.name.to_string(),
            });
        };
        let (type_name, name) = (type_name.as_str(), name.as_str());

        if !seen.insert(name) {
            return Err(NodeflowError::DuplicateName {
                name: name.to_string(),
            });
        }

        let Some(mut machine) = registry.create(type_name) else {
            warn!(machine = type_name, node = name, "unrecognized machine type, node skipped");
            if !unrecognized.iter().any(|t| t == type_name) {
                unrecognized.push(type_name.to_string());
            }
            skipped.insert(name);
            continue;
        };

        let (settings, connections) = split_body(record.body)?;
        if let Some(raw) = settings {
            machine
                .decode_settings(raw)
                .map_err(|e| NodeflowError::InvalidSettings {
                    node: name.to_string(),
                    message: format!("{:#}", e),
                })?;
        }

        let id = graph.add_node(machine);
        ids.insert(name, id);
        pending.push(Pending {
            name,
            id,
            connections,
        });
    }

    for record in &pending {
        for line in &record.connections {
            let caps = connection_re
                .captures(line)
                .ok_or_else(|| NodeflowError::MalformedConnection {
                    node: record.name.to_string(),
                    line: line.to_string(),
                })?;
            let remote = caps.get(1).map_or("", |m| m.as_str());
            let out_code = caps.get(2).and_then(|m| m.as_str().chars().next());
            let in_code = caps.get(3).and_then(|m| m.as_str().chars().next());

            if skipped.contains(remote) {
                debug!(node = record.name, remote, "dropping connection to skipped node");
                continue;
            }
            let from = *ids.get(remote).ok_or_else(|| NodeflowError::UnknownNodeName {
                node: record.name.to_string(),
                name: remote.to_string(),
            })?;

            let from_index = resolve(&graph, from, PortDirection::Output, out_code)?;
            let to_index = resolve(&graph, record.id, PortDirection::Input, in_code)?;
            graph.connect(from, from_index, record.id, to_index)?;
        }
    }

    debug!(
        nodes = graph.node_count(),
        connections = graph.connection_count(),
        unrecognized = unrecognized.len(),
        "parsed graph"
    );

    Ok(LoadedGraph {
        graph,
        unrecognized,
    })
}

/// Split a record body into its settings block and its connection lines
fn split_body(body: &str) -> NodeflowResult<(Option<&str>, Vec<&str>)> {
    let blocks = extract_sections(body, '[', ']', Quoting::Opaque)?;
    let (settings, rest) = match blocks.first() {
        Some(Section {
            body: settings,
            start,
            end,
            ..
        }) => {
            let trimmed = settings.trim();
            let settings = (!trimmed.is_empty()).then_some(trimmed);
            (settings, [&body[..*start], &body[*end..]])
        }
        None => (None, [body, ""]),
    };

    let lines = rest
        .into_iter()
        .flat_map(str::lines)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    Ok((settings, lines))
}

/// Port index on `id` for `code`
fn resolve(
    graph: &Graph<Box<dyn Machine>>,
    id: NodeId,
    direction: PortDirection,
    code: Option<char>,
) -> NodeflowResult<usize> {
    let Some(machine) = graph.payload(id) else {
        return Err(NodeflowError::NotMember { node: id });
    };
    let index = match direction {
        PortDirection::Input => machine.input_index(code),
        PortDirection::Output => machine.output_index(code),
    };
    index.ok_or_else(|| NodeflowError::UnknownPortCode {
        machine: machine.type_name().to_string(),
        direction,
        code: code.map(String::from).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::testing::StubMachine;

    fn registry() -> MachineRegistry {
        let mut registry = MachineRegistry::new();
        registry.register("Type", || Box::new(StubMachine::new("Type", 1, 1)));
        registry.register("Source", || Box::new(StubMachine::new("Source", 0, 1)));
        registry.register("Sink", || Box::new(StubMachine::new("Sink", 1, 0)));
        registry.register("Split", || {
            Box::new(StubMachine::new("Split", 0, 0).with_codes(" ", "HT"))
        });
        registry.register("Join", || {
            Box::new(StubMachine::new("Join", 0, 0).with_codes("HT", " "))
        });
        registry
    }

    #[test]
    fn test_source_to_sink() {
        let text = "Graph {\n\tSource 'machine0' {}\n\tSink 'machine1' {\n\t\t'machine0' -> \n\t}\n}";
        let loaded = parse(text, &registry()).unwrap();

        assert!(loaded.unrecognized.is_empty());
        assert_eq!(loaded.graph.node_count(), 2);
        assert_eq!(loaded.graph.connection_count(), 1);
    }

    #[test]
    fn test_codes_resolve() {
        let text = "Graph {
            Source 'machine0' {}
            Split 'machine1' { 'machine0' -> }
            Join 'machine2' {
                'machine1':T -> H
                'machine1':H -> T
            }
        }";
        let loaded = parse(text, &registry()).unwrap();
        let graph = &loaded.graph;
        let ids: Vec<_> = graph.node_ids().collect();

        let head = graph.input_of(ids[2], 0).unwrap();
        assert_eq!((head.node, head.index), (ids[1], 1));
        let tail = graph.input_of(ids[2], 1).unwrap();
        assert_eq!((tail.node, tail.index), (ids[1], 0));
    }

    #[test]
    fn test_settings_block() {
        let text = "Graph {\n\tSource 'machine0' {\n\t\t[text='a]b']\n\t}\n}";
        let loaded = parse(text, &registry()).unwrap();
        let id = loaded.graph.node_ids().next().unwrap();

        let machine = loaded.graph.payload(id).unwrap();
        assert_eq!(machine.encode_settings().as_deref(), Some("text='a]b'"));
    }

    #[test]
    fn test_unrecognized_type_is_skipped() {
        let text = "Graph {
            Source 'machine0' {}
            Foo.Bar 'machine1' { 'machine0' -> }
            Foo.Bar 'machine2' { 'machine1' -> }
            Sink 'machine3' { 'machine1' -> }
        }";
        let loaded = parse(text, &registry()).unwrap();

        assert_eq!(loaded.unrecognized, vec!["Foo.Bar".to_string()]);
        assert_eq!(loaded.graph.node_count(), 2);
        assert_eq!(loaded.graph.connection_count(), 0);
    }

    #[test]
    fn test_forward_reference() {
        let text = "Graph {
            Sink 'machine1' { 'machine0' -> }
            Source 'machine0' {}
        }";
        let loaded = parse(text, &registry()).unwrap();
        assert_eq!(loaded.graph.connection_count(), 1);
    }

    #[test]
    fn test_duplicate_connection_fails() {
        let text = "Graph {
            Source 'machine0' {}
            Join 'machine1' {
                'machine0' -> H
                'machine0' -> T
            }
        }";
        let err = parse(text, &registry()).err().unwrap();
        assert!(matches!(err, NodeflowError::PortOccupied { .. }));
    }

    #[test]
    fn test_unknown_node_name() {
        let text = "Graph { Sink 'machine0' { 'ghost' -> } }";
        let err = parse(text, &registry()).err().unwrap();
        assert!(matches!(err, NodeflowError::UnknownNodeName { ref name, .. } if name == "ghost"));
    }

    #[test]
    fn test_unknown_port_code() {
        let text = "Graph { Source 'a' {} Join 'b' { 'a' -> X } }";
        let err = parse(text, &registry()).err().unwrap();
        assert!(matches!(
            err,
            NodeflowError::UnknownPortCode {
                direction: PortDirection::Input,
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_input() {
        let reg = registry();
        assert!(matches!(
            parse("Graph { Source {} }", &reg).err().unwrap(),
            NodeflowError::MalformedRecord { .. }
        ));
        assert!(matches!(
            parse("Graph { Source 'a' {} Sink 'b' { a -> } }", &reg).err().unwrap(),
            NodeflowError::MalformedConnection { .. }
        ));
        assert!(matches!(
            parse("Graph { Source 'a' {} Source 'a' {} }", &reg).err().unwrap(),
            NodeflowError::DuplicateName { .. }
        ));
        assert!(matches!(
            parse("Graph { Source 'a' {", &reg).err().unwrap(),
            NodeflowError::UnbalancedDelimiter { .. }
        ));
        assert!(matches!(
            parse("Other { }", &reg).err().unwrap(),
            NodeflowError::MissingSection { .. }
        ));
    }

    #[test]
    fn test_other_sections_ignored() {
        let text = "Meta { anything { at all } } Graph { Source 'machine0' {} } Graph { }";
        let loaded = parse(text, &registry()).unwrap();
        assert_eq!(loaded.graph.node_count(), 1);
    }

    #[test]
    fn test_apostrophes_outside_graph_section() {
        let leading = "Notes { it's a demo } Graph { Source 'machine0' {} }";
        assert_eq!(parse(leading, &registry()).unwrap().graph.node_count(), 1);

        let trailing = "Graph { Source 'machine0' {} } Notes { don't { } }";
        assert_eq!(parse(trailing, &registry()).unwrap().graph.node_count(), 1);
    }
}
