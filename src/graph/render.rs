// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Human-readable views of a graph
//!
//! Every renderer names nodes the same way the text codec does: `machine<N>`,
//! where `N` is the node's position in a freshly computed topological order.

use std::collections::HashMap;
use std::fmt::Write;

use super::{Graph, NodeId};
use crate::errors::NodeflowResult;
use crate::machine::{Machine, PortCode};

/// Positional name for the node at `index` in an ordering
pub fn positional_name(index: usize) -> String {
    format!("machine{}", index)
}

/// Nodes in execution order, paired with their positional names
pub(crate) fn positional_names<T>(
    graph: &Graph<T>,
) -> NodeflowResult<(Vec<NodeId>, HashMap<NodeId, String>)> {
    let order = graph.topological_order()?;
    let names = order
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, positional_name(i)))
        .collect();
    Ok((order, names))
}

/// A connection seen from its consumer, with names and codes resolved
struct Edge<'a> {
    from: &'a str,
    from_code: PortCode,
    to: &'a str,
    to_code: PortCode,
}

impl Edge<'_> {
    fn label(&self) -> Option<String> {
        if self.from_code.is_blank() && self.to_code.is_blank() {
            None
        } else {
            Some(format!("{}→{}", self.from_code, self.to_code))
        }
    }
}

fn edges<'a, M: Machine>(
    graph: &'a Graph<M>,
    order: &[NodeId],
    names: &'a HashMap<NodeId, String>,
) -> Vec<Edge<'a>> {
    let mut edges = Vec::new();
    for id in order {
        let Some(node) = graph.node(*id) else { continue };
        for (index, port) in node.inputs() {
            let remote = port.remote();
            let (Some(from), Some(producer)) =
                (names.get(&remote.node), graph.payload(remote.node))
            else {
                continue;
            };
            edges.push(Edge {
                from,
                from_code: producer.output_code(remote.index),
                to: &names[id],
                to_code: node.payload().input_code(index),
            });
        }
    }
    edges
}

/// Numbered execution order with each node's inputs
pub fn to_text<M: Machine>(graph: &Graph<M>) -> NodeflowResult<String> {
    let (order, names) = positional_names(graph)?;
    let mut out = String::new();

    for (i, id) in order.iter().enumerate() {
        let Some(node) = graph.node(*id) else { continue };
        let _ = write!(out, "{}. {} ({})", i + 1, names[id], node.payload().type_name());

        let inputs: Vec<String> = node
            .inputs()
            .filter_map(|(_, port)| {
                let remote = port.remote();
                let name = names.get(&remote.node)?;
                let code = graph.payload(remote.node)?.output_code(remote.index);
                Some(if code.is_blank() {
                    name.clone()
                } else {
                    format!("{}:{}", name, code)
                })
            })
            .collect();
        if !inputs.is_empty() {
            let _ = write!(out, " [inputs: {}]", inputs.join(", "));
        }
        out.push('\n');
    }

    Ok(out)
}

/// Graphviz DOT
pub fn to_dot<M: Machine>(graph: &Graph<M>) -> NodeflowResult<String> {
    let (order, names) = positional_names(graph)?;
    let mut out = String::from("digraph pipeline {\n");
    out.push_str("    rankdir=LR;\n");
    out.push_str("    node [shape=box, style=rounded];\n\n");

    for id in &order {
        if let Some(machine) = graph.payload(*id) {
            let _ = writeln!(
                out,
                "    \"{0}\" [label=\"{0}\\n{1}\"];",
                names[id],
                machine.type_name()
            );
        }
    }

    let edges = edges(graph, &order, &names);
    if !edges.is_empty() {
        out.push('\n');
    }
    for edge in edges {
        match edge.label() {
            Some(label) => {
                let _ = writeln!(out, "    \"{}\" -> \"{}\" [label=\"{}\"];", edge.from, edge.to, label);
            }
            None => {
                let _ = writeln!(out, "    \"{}\" -> \"{}\";", edge.from, edge.to);
            }
        }
    }

    out.push_str("}\n");
    Ok(out)
}

/// Mermaid flowchart
pub fn to_mermaid<M: Machine>(graph: &Graph<M>) -> NodeflowResult<String> {
    let (order, names) = positional_names(graph)?;
    let mut out = String::from("graph LR\n");

    for id in &order {
        if let Some(machine) = graph.payload(*id) {
            let _ = writeln!(out, "    {0}[\"{0}: {1}\"]", names[id], machine.type_name());
        }
    }

    for edge in edges(graph, &order, &names) {
        match edge.label() {
            Some(label) => {
                let _ = writeln!(out, "    {} -->|{}| {}", edge.from, label, edge.to);
            }
            None => {
                let _ = writeln!(out, "    {} --> {}", edge.from, edge.to);
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NodeflowError;
    use crate::machine::testing::StubMachine;

    /// Source -> Split(H,T) -> Join(H,T)
    fn split_join() -> Graph<StubMachine> {
        let mut graph = Graph::new();
        let source = graph.add_node(StubMachine::new("Source.Text", 0, 1));
        let split = graph.add_node(StubMachine::new("Text.Split", 0, 0).with_codes(" ", "HT"));
        let join = graph.add_node(StubMachine::new("Text.Join", 0, 0).with_codes("HT", " "));
        graph.connect(source, 0, split, 0).unwrap();
        graph.connect(split, 0, join, 0).unwrap();
        graph.connect(split, 1, join, 1).unwrap();
        graph
    }

    #[test]
    fn test_positional_names_follow_order() {
        let mut graph = Graph::new();
        let sink = graph.add_node(StubMachine::new("Sink", 1, 0));
        let source = graph.add_node(StubMachine::new("Source", 0, 1));
        graph.connect(source, 0, sink, 0).unwrap();

        let (order, names) = positional_names(&graph).unwrap();
        assert_eq!(order, vec![source, sink]);
        assert_eq!(names[&source], "machine0");
        assert_eq!(names[&sink], "machine1");
    }

    #[test]
    fn test_text() {
        let text = to_text(&split_join()).unwrap();
        insta::assert_snapshot!(text, @r"
        1. machine0 (Source.Text)
        2. machine1 (Text.Split) [inputs: machine0]
        3. machine2 (Text.Join) [inputs: machine1:H, machine1:T]
        ");
    }

    #[test]
    fn test_mermaid() {
        let mermaid = to_mermaid(&split_join()).unwrap();
        insta::assert_snapshot!(mermaid, @r#"
        graph LR
            machine0["machine0: Source.Text"]
            machine1["machine1: Text.Split"]
            machine2["machine2: Text.Join"]
            machine0 --> machine1
            machine1 -->|H→H| machine2
            machine1 -->|T→T| machine2
        "#);
    }

    #[test]
    fn test_dot() {
        let dot = to_dot(&split_join()).unwrap();
        assert!(dot.starts_with("digraph pipeline {\n"));
        assert!(dot.contains("\"machine1\" [label=\"machine1\\nText.Split\"];"));
        assert!(dot.contains("\"machine0\" -> \"machine1\";"));
        assert!(dot.contains("\"machine1\" -> \"machine2\" [label=\"T→T\"];"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn test_empty_graph() {
        let graph: Graph<StubMachine> = Graph::new();
        assert_eq!(to_text(&graph).unwrap(), "");
        assert_eq!(to_mermaid(&graph).unwrap(), "graph LR\n");
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut graph = Graph::new();
        let a = graph.add_node(StubMachine::new("A", 1, 1));
        let b = graph.add_node(StubMachine::new("B", 1, 1));
        graph.connect(a, 0, b, 0).unwrap();
        graph.connect(b, 0, a, 0).unwrap();

        assert!(matches!(to_dot(&graph), Err(NodeflowError::CycleDetected { .. })));
    }
}
