//! Single-pass tree construction.
//!
//! The parser walks the preprocessed input once, left to right. Every `<...>`
//! span is either an end tag, which pops the stack of open elements back to
//! the nearest element with the same name, or a start tag, which appends a
//! child to the current element and pushes it unless it is void or
//! self-closing. Everything between tags is text.
//!
//! Malformed markup never aborts the parse. Every loop iteration advances the
//! cursor, so arbitrary input terminates.

use wren_common::warning::warn_once;
use wren_dom::{DomTree, ElementData, ElementKind, NodeId, NodeType};

use crate::attributes::parse_start_tag;
use crate::entities::decode_entities;
use crate::preprocess::strip_declarations;

/// Builds a [`DomTree`] from HTML source.
pub struct HtmlParser {
    input: String,
    pos: usize,
    tree: DomTree,
    /// Stack of open elements; the document is always at the bottom.
    open: Vec<NodeId>,
}

impl HtmlParser {
    /// Create a parser over `html`. Markup declarations are stripped here.
    pub fn new(html: &str) -> Self {
        Self {
            input: strip_declarations(html),
            pos: 0,
            tree: DomTree::new(),
            open: vec![NodeId::ROOT],
        }
    }

    /// Run the parser to completion and prune unknown elements.
    pub fn run(mut self) -> DomTree {
        while self.pos < self.input.len() {
            self.step();
        }
        prune_unknown_elements(&mut self.tree);
        self.tree
    }

    /// Consume one text run or one tag.
    fn step(&mut self) {
        let Some(lt) = self.find_tag_open(self.pos) else {
            let text = self.input[self.pos..].to_string();
            self.insert_text(&text);
            self.pos = self.input.len();
            return;
        };

        if lt > self.pos {
            let text = self.input[self.pos..lt].to_string();
            self.insert_text(&text);
        }

        let Some(gt) = find_tag_close(&self.input, lt + 1) else {
            // `<` with no closing `>`: the rest of the input is text.
            let text = self.input[lt..].to_string();
            self.insert_text(&text);
            self.pos = self.input.len();
            return;
        };

        let inner = self.input[lt + 1..gt].to_string();
        self.pos = gt + 1;

        if let Some(name) = inner.strip_prefix('/') {
            self.close_element(name.trim().to_ascii_lowercase().as_str());
        } else if inner.starts_with('!') {
            // Leftover `<!...>` constructs such as CDATA carry no content.
            warn_once("HTML", &format!("ignoring markup declaration <{inner}>"));
        } else {
            self.open_element(&inner);
        }
    }

    /// Position of the next `<` that starts a tag, skipping literal `<`
    /// characters (those not followed by a letter, `/` or `!`).
    fn find_tag_open(&self, from: usize) -> Option<usize> {
        let bytes = self.input.as_bytes();
        let mut i = from;
        while let Some(offset) = self.input[i..].find('<') {
            let at = i + offset;
            match bytes.get(at + 1) {
                Some(b) if b.is_ascii_alphabetic() || *b == b'!' => return Some(at),
                Some(b'/') if bytes.get(at + 2).is_some_and(u8::is_ascii_alphabetic) => {
                    return Some(at);
                }
                _ => i = at + 1,
            }
        }
        None
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or(NodeId::ROOT)
    }

    fn open_element(&mut self, raw: &str) {
        let tag = parse_start_tag(raw);
        let data = ElementData::new(tag.name, tag.attrs);
        let kind = data.kind;
        let tag_name = data.tag_name.clone();

        let id = self.tree.alloc(NodeType::Element(data));
        self.tree.append_child(self.current(), id);

        if tag.self_closing || kind.is_some_and(ElementKind::is_void) {
            return;
        }

        if let Some(kind) = kind.filter(|k| k.is_raw_text()) {
            self.consume_raw_text(id, kind, &tag_name);
        }
        self.open.push(id);
    }

    /// Take everything up to the matching end tag as one literal text child.
    /// The end tag itself is left for the main loop to close the element.
    fn consume_raw_text(&mut self, element: NodeId, kind: ElementKind, tag_name: &str) {
        let needle = format!("</{tag_name}");
        let rest = &self.input[self.pos..];
        let end = find_ascii_case_insensitive(rest, &needle).map_or(self.input.len(), |i| self.pos + i);

        let raw = &self.input[self.pos..end];
        if !raw.is_empty() {
            // Titles and textareas are escapable raw text; scripts and
            // styles are not.
            let content = match kind {
                ElementKind::Title | ElementKind::Textarea => decode_entities(raw),
                _ => raw.to_string(),
            };
            let text = self.tree.alloc(NodeType::Text(content));
            self.tree.append_child(element, text);
        }
        self.pos = end;
    }

    fn close_element(&mut self, name: &str) {
        let name = name.split_ascii_whitespace().next().unwrap_or_default();
        let matching = self.open.iter().rposition(|&id| {
            id != NodeId::ROOT && self.tree.as_element(id).is_some_and(|e| e.tag_name == name)
        });
        match matching {
            Some(index) => self.open.truncate(index),
            None => warn_once("HTML", &format!("ignoring stray end tag </{name}>")),
        }
    }

    /// Append text to the current element.
    ///
    /// Whitespace-only runs never become nodes; they only mark the previous
    /// sibling with `whitespace_after`. Text directly following another text
    /// node is merged into it.
    fn insert_text(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        let parent = self.current();
        let last = self.tree.children(parent).last().copied();

        if raw.bytes().all(|b| b.is_ascii_whitespace()) {
            if let Some(prev) = last {
                self.tree.set_whitespace_after(prev);
            }
            return;
        }

        let decoded = decode_entities(raw);
        if let Some(prev) = last
            && let Some(node) = self.tree.get_mut(prev)
            && !node.whitespace_after
            && let NodeType::Text(existing) = &mut node.node_type
        {
            existing.push_str(&decoded);
            return;
        }

        let id = self.tree.alloc(NodeType::Text(decoded));
        self.tree.append_child(parent, id);
    }
}

/// Find the `>` closing a tag whose body starts at `from`, ignoring any `>`
/// inside quoted attribute values.
fn find_tag_close(input: &str, from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &b) in input.as_bytes()[from..].iter().enumerate() {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => {
                // Quotes only open a value right after `=` (possibly spaced).
                let before = input[from..from + i].trim_end();
                if before.ends_with('=') {
                    quote = Some(b);
                }
            }
            (None, b'>') => return Some(from + i),
            (None, _) => {}
        }
    }
    None
}

fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let hay = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.len() > hay.len() {
        return None;
    }
    (0..=hay.len() - needle.len()).find(|&i| hay[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

/// Remove elements with no known [`ElementKind`], together with their
/// subtrees.
fn prune_unknown_elements(tree: &mut DomTree) {
    let mut unknown = Vec::new();
    let mut stack = vec![NodeId::ROOT];
    while let Some(id) = stack.pop() {
        if tree.as_element(id).is_some_and(|e| e.kind.is_none()) {
            unknown.push(id);
            continue;
        }
        stack.extend(tree.children(id).iter().copied());
    }

    for id in unknown {
        if let Some(element) = tree.as_element(id) {
            log::debug!(target: "wren::html", "pruning unknown element <{}>", element.tag_name);
        }
        tree.detach(id);
    }
}
