//! Forgiving HTML parser for the Wren renderer.
//!
//! # Scope
//!
//! - **Preprocessing**: comments, processing instructions and DOCTYPE
//!   declarations are stripped with balanced start/end matching.
//! - **Tree construction**: a single left-to-right scan over tags and text,
//!   with void elements, raw-text elements (`script`, `style`, `title`,
//!   `textarea`) and stray end tags handled without aborting.
//! - **Attributes**: irregular whitespace around `=`, quoted, unquoted and
//!   boolean attributes.
//! - **Character references**: common named references and numeric ones.
//! - **Pruning**: elements outside [`wren_dom::ElementKind`] are removed with
//!   their subtrees once the tree is built.
//!
//! # Not Implemented
//!
//! - The WHATWG insertion-mode state machine (implied `<html>`, `<head>`,
//!   `<body>`, implicit end tags, foster parenting)
//! - Foreign content (SVG, MathML)

mod attributes;
mod entities;
mod parser;
mod preprocess;

use std::fmt::Write;

use wren_dom::{DomTree, ElementKind, NodeId, NodeType};

pub use attributes::{StartTag, parse_start_tag};
pub use entities::decode_entities;
pub use parser::HtmlParser;
pub use preprocess::strip_declarations;

/// Parse an HTML document into a DOM tree rooted at the Document node.
pub fn parse(html: &str) -> DomTree {
    HtmlParser::new(html).run()
}

/// The document title: text of the first `<title>` with whitespace collapsed.
pub fn document_title(tree: &DomTree) -> Option<String> {
    let title = tree.find_first(ElementKind::Title)?;
    let text = tree.text_content(title);
    let collapsed = text.split_ascii_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}

/// Render the DOM as an indented listing, one node per line.
pub fn print_tree(tree: &DomTree) -> String {
    let mut out = String::new();
    print_node(tree, NodeId::ROOT, 0, &mut out);
    out
}

fn print_node(tree: &DomTree, id: NodeId, depth: usize, out: &mut String) {
    let Some(node) = tree.get(id) else { return };
    let indent = "  ".repeat(depth);
    let _ = match &node.node_type {
        NodeType::Document => writeln!(out, "{indent}#document"),
        NodeType::Element(data) => {
            let mut attrs: Vec<_> = data.attrs.iter().collect();
            attrs.sort();
            let attrs: String = attrs
                .into_iter()
                .map(|(k, v)| format!(" {k}=\"{v}\""))
                .collect();
            writeln!(out, "{indent}<{}{attrs}>", data.tag_name)
        }
        NodeType::Text(text) => writeln!(out, "{indent}\"{}\"", text.escape_debug()),
    };
    for &child in tree.children(id) {
        print_node(tree, child, depth + 1, out);
    }
}
