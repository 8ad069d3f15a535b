// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Graph to text

use std::fmt::Write;

use tracing::debug;

use crate::errors::NodeflowResult;
use crate::graph::render::positional_names;
use crate::graph::Graph;
use crate::machine::Machine;

/// Serialize `graph` into the `Graph { ... }` text format.
///
/// Nodes are written in topological order and named `machine<N>` after
/// their position in it, so the same graph always produces the same text.
pub fn serialize<M: Machine>(graph: &Graph<M>) -> NodeflowResult<String> {
    let (order, names) = positional_names(graph)?;
    let mut out = String::from("Graph {");

    for id in &order {
        let Some(node) = graph.node(*id) else { continue };
        let machine = node.payload();
        let settings = machine.encode_settings().filter(|s| !s.is_empty());

        let _ = write!(out, "\n\t{} '{}' {{", machine.type_name(), names[id]);
        if node.input_count() == 0 && settings.is_none() {
            out.push('}');
            continue;
        }

        for (index, port) in node.inputs() {
            let remote = port.remote();
            let (Some(remote_name), Some(producer)) =
                (names.get(&remote.node), graph.payload(remote.node))
            else {
                continue;
            };

            let _ = write!(out, "\n\t\t'{}'", remote_name);
            let out_code = producer.output_code(remote.index);
            if !out_code.is_blank() {
                let _ = write!(out, ":{}", out_code);
            }
            out.push_str(" -> ");
            let in_code = machine.input_code(index);
            if !in_code.is_blank() {
                let _ = write!(out, "{}", in_code);
            }
        }

        if let Some(settings) = settings {
            let _ = write!(out, "\n\t\t[{}]", settings);
        }
        out.push_str("\n\t}");
    }

    out.push_str("\n}");
    debug!(nodes = order.len(), bytes = out.len(), "serialized graph");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NodeflowError;
    use crate::machine::testing::StubMachine;

    #[test]
    fn test_empty_graph() {
        let graph: Graph<StubMachine> = Graph::new();
        assert_eq!(serialize(&graph).unwrap(), "Graph {\n}");
    }

    #[test]
    fn test_source_to_sink() {
        let mut graph = Graph::new();
        let source = graph.add_node(StubMachine::new("Type", 0, 1));
        let sink = graph.add_node(StubMachine::new("Type", 1, 0));
        graph.connect(source, 0, sink, 0).unwrap();

        assert_eq!(
            serialize(&graph).unwrap(),
            "Graph {\n\tType 'machine0' {}\n\tType 'machine1' {\n\t\t'machine0' -> \n\t}\n}"
        );
    }

    #[test]
    fn test_codes_and_settings() {
        let mut graph = Graph::new();
        let mut source = StubMachine::new("Src", 0, 1);
        source.settings = Some("text='hi'".into());
        let split = StubMachine::new("Split", 0, 0).with_codes(" ", "HT");
        let join = StubMachine::new("Join", 0, 0).with_codes("HT", " ");

        // inserted out of order on purpose
        let j = graph.add_node(join);
        let s = graph.add_node(split);
        let src = graph.add_node(source);
        graph.connect(src, 0, s, 0).unwrap();
        graph.connect(s, 1, j, 0).unwrap();
        graph.connect(s, 0, j, 1).unwrap();

        let expected = concat!(
            "Graph {\n",
            "\tSrc 'machine0' {\n",
            "\t\t[text='hi']\n",
            "\t}\n",
            "\tSplit 'machine1' {\n",
            "\t\t'machine0' -> \n",
            "\t}\n",
            "\tJoin 'machine2' {\n",
            "\t\t'machine1':T -> H\n",
            "\t\t'machine1':H -> T\n",
            "\t}\n",
            "}",
        );
        assert_eq!(serialize(&graph).unwrap(), expected);
    }

    #[test]
    fn test_cycle_cannot_be_serialized() {
        let mut graph = Graph::new();
        let a = graph.add_node(StubMachine::new("A", 1, 1));
        graph.connect(a, 0, a, 0).unwrap();

        assert!(matches!(
            serialize(&graph),
            Err(NodeflowError::CycleDetected { .. })
        ));
    }
}
