// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Nested section scanner
//!
//! Splits text of the shape `name { body } name { body } ...` into sections,
//! for any pair of delimiters. Nested pairs inside a body are skipped over.
//! Where [`Quoting`] asks for it, single-quoted strings (with `\` escapes)
//! are opaque.

use crate::errors::{NodeflowError, NodeflowResult};

/// One `name { body }` section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    /// Text between the previous section and the opening delimiter, trimmed
    pub name: &'a str,
    /// Text between the delimiters, untrimmed
    pub body: &'a str,
    /// Byte offset of the opening delimiter
    pub start: usize,
    /// Byte offset just past the closing delimiter
    pub end: usize,
}

/// Where single-quoted strings hide delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting<'n> {
    /// Everywhere in the scanned text
    Opaque,
    /// Only inside top-level sections with this name; an apostrophe anywhere
    /// else is ordinary text
    Within(&'n str),
}

/// Extract every top-level section of `text` delimited by `open`/`close`.
///
/// Text after the last section is ignored.
pub fn extract_sections<'a>(
    text: &'a str,
    open: char,
    close: char,
    quoting: Quoting<'_>,
) -> NodeflowResult<Vec<Section<'a>>> {
    let mut sections = Vec::new();
    let mut depth = 0usize;
    let mut name_start = 0;
    let mut section_start = 0;
    let mut in_quote = false;
    let mut escaped = false;
    let mut quotes_here = quoting == Quoting::Opaque;

    for (offset, c) in text.char_indices() {
        if in_quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '\'' {
                in_quote = false;
            }
            continue;
        }

        if c == '\'' && quotes_here {
            in_quote = true;
        } else if c == open {
            if depth == 0 {
                section_start = offset;
                if let Quoting::Within(name) = quoting {
                    quotes_here = text[name_start..offset].trim() == name;
                }
            }
            depth += 1;
        } else if c == close {
            if depth == 0 {
                return Err(NodeflowError::UnbalancedDelimiter {
                    delimiter: close,
                    offset,
                });
            }
            depth -= 1;
            if depth == 0 {
                let end = offset + c.len_utf8();
                sections.push(Section {
                    name: text[name_start..section_start].trim(),
                    body: &text[section_start + open.len_utf8()..offset],
                    start: section_start,
                    end,
                });
                name_start = end;
                if matches!(quoting, Quoting::Within(_)) {
                    quotes_here = false;
                }
            }
        }
    }

    if depth > 0 {
        return Err(NodeflowError::UnbalancedDelimiter {
            delimiter: open,
            offset: section_start,
        });
    }

    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_sections() {
        let sections = extract_sections("A { one } B {two}", '{', '}', Quoting::Opaque).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "A");
        assert_eq!(sections[0].body, " one ");
        assert_eq!(sections[1].name, "B");
        assert_eq!(sections[1].body, "two");
    }

    #[test]
    fn test_nested_body_kept_whole() {
        let text = "Graph {\n\tT 'a' {}\n\tT 'b' {\n\t\tx\n\t}\n}";
        let sections = extract_sections(text, '{', '}', Quoting::Opaque).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "Graph");

        let inner = extract_sections(sections[0].body, '{', '}', Quoting::Opaque).unwrap();
        let names: Vec<_> = inner.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["T 'a'", "T 'b'"]);
        assert_eq!(inner[1].body.trim(), "x");
    }

    #[test]
    fn test_quoted_delimiters_are_opaque() {
        let text = "[text='a]b' other='it\\'s {']";
        let sections = extract_sections(text, '[', ']', Quoting::Opaque).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].body, "text='a]b' other='it\\'s {'");
        assert_eq!(sections[0].start, 0);
        assert_eq!(sections[0].end, text.len());
    }

    #[test]
    fn test_quotes_only_inside_named_sections() {
        let text = "Notes { it's } Graph { T 'a}' {} } Tail { don't { } }";
        let sections = extract_sections(text, '{', '}', Quoting::Within("Graph")).unwrap();
        let names: Vec<_> = sections.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Notes", "Graph", "Tail"]);
        assert_eq!(sections[1].body, " T 'a}' {} ");
        assert_eq!(sections[2].body, " don't { } ");

        // the same text fails when every apostrophe opens a string
        assert!(extract_sections(text, '{', '}', Quoting::Opaque).is_err());
    }

    #[test]
    fn test_missing_close() {
        let err = extract_sections("A { B { }", '{', '}', Quoting::Opaque).unwrap_err();
        assert!(matches!(
            err,
            NodeflowError::UnbalancedDelimiter { delimiter: '{', offset: 2 }
        ));
    }

    #[test]
    fn test_stray_close() {
        let err = extract_sections("A { } }", '{', '}', Quoting::Opaque).unwrap_err();
        assert!(matches!(
            err,
            NodeflowError::UnbalancedDelimiter { delimiter: '}', offset: 6 }
        ));
    }

    #[test]
    fn test_no_sections() {
        assert!(extract_sections("just text", '{', '}', Quoting::Opaque).unwrap().is_empty());
        assert!(extract_sections("", '[', ']', Quoting::Opaque).unwrap().is_empty());
    }
}
