//! Arena DOM tree for the Wren renderer.
//!
//! The tree stores every node in one vector and links them with [`NodeId`]
//! indices, so parent, child and sibling traversal is O(1) and never fights
//! the borrow checker. Parent links are for traversal only; ownership flows
//! strictly from the arena.
//!
//! Only three node types exist: the document, elements and text. Comments,
//! processing instructions and doctypes are stripped before tree
//! construction.

mod element;

use std::collections::{HashMap, HashSet};

pub use element::ElementKind;

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the DOM tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// A node with index links to its parent, children and siblings.
#[derive(Debug, Clone)]
pub struct Node {
    /// Document, element or text.
    pub node_type: NodeType,
    /// Non-owning back-reference; `None` for the document and detached nodes.
    pub parent: Option<NodeId>,
    /// Children in document order.
    pub children: Vec<NodeId>,
    /// Sibling immediately after this node in its parent.
    pub next_sibling: Option<NodeId>,
    /// Sibling immediately before this node in its parent.
    pub prev_sibling: Option<NodeId>,
    /// Set when whitespace-only source text followed this node. That text
    /// never becomes a node of its own; the render tree uses the flag to
    /// keep a single space between inline neighbours.
    pub whitespace_after: bool,
}

/// The kind of a [`Node`].
#[derive(Debug, Clone, PartialEq)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    ///
    /// Holds the literal source slice with character references decoded.
    Text(String),
}

/// Element-specific data.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    /// Lower-cased tag name as written in the source.
    pub tag_name: String,
    /// The known element kind, `None` for unknown tags awaiting pruning.
    pub kind: Option<ElementKind>,
    /// Attribute list (names lower-cased).
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data, resolving the kind from the tag name.
    pub fn new(tag_name: impl Into<String>, attrs: AttributesMap) -> Self {
        let tag_name = tag_name.into().to_ascii_lowercase();
        let kind = ElementKind::from_tag(&tag_name);
        Self {
            tag_name,
            kind,
            attrs,
        }
    }

    /// Returns the element's id attribute value if present.
    pub fn id(&self) -> Option<&String> {
        self.attrs.get("id")
    }

    /// [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes)
    ///
    /// "The class attribute ... must have a value that is a set of
    /// space-separated tokens"
    ///
    /// Splits on any ASCII whitespace, so `class="a  b"` yields two classes.
    pub fn classes(&self) -> HashSet<&str> {
        self.attrs
            .get("class")
            .map(|list| list.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }

    /// Returns an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// True if this element is the given kind.
    pub fn is(&self, kind: ElementKind) -> bool {
        self.kind == Some(kind)
    }
}

/// Arena-based DOM tree.
///
/// The Document node is always at index 0 ([`NodeId::ROOT`]). Detached nodes
/// stay in the arena but are unreachable from the root.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new DOM tree with just the Document node.
    pub fn new() -> Self {
        let mut tree = DomTree { nodes: Vec::new() };
        let _ = tree.alloc(NodeType::Document);
        tree
    }

    /// Get the root document node ID.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of allocated nodes, including detached ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the document node exists from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new, unattached node and return its ID.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
            whitespace_after: false,
        });
        id
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// Appends `child` as the last child of `parent`, updating sibling links.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let prev_last_child = self.nodes[parent.0].children.last().copied();
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[child.0].prev_sibling = prev_last_child;
        self.nodes[child.0].next_sibling = None;
        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
        }
    }

    /// [§ 4.2.3 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Detach `child` (and its subtree) from its parent. The previous sibling
    /// inherits the detached node's `whitespace_after` flag so spacing in
    /// the source survives the removal.
    pub fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        let prev = self.nodes[child.0].prev_sibling;
        let next = self.nodes[child.0].next_sibling;
        if let Some(prev_id) = prev {
            self.nodes[prev_id.0].next_sibling = next;
            if self.nodes[child.0].whitespace_after {
                self.nodes[prev_id.0].whitespace_after = true;
            }
        }
        if let Some(next_id) = next {
            self.nodes[next_id.0].prev_sibling = prev;
        }
        self.nodes[parent.0].children.retain(|&id| id != child);
        let node = &mut self.nodes[child.0];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    /// Get the parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Get the next sibling of a node.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Mark that whitespace followed this node in the source.
    pub fn set_whitespace_after(&mut self, id: NodeId) {
        if let Some(node) = self.get_mut(id) {
            node.whitespace_after = true;
        }
    }

    /// Iterate over all ancestors of a node, from parent to root.
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over preceding siblings (nearest first).
    pub fn preceding_siblings(&self, id: NodeId) -> SiblingIterator<'_> {
        SiblingIterator {
            tree: self,
            current: self.prev_sibling(id),
            forward: false,
        }
    }

    /// Iterate over following siblings (nearest first).
    pub fn following_siblings(&self, id: NodeId) -> SiblingIterator<'_> {
        SiblingIterator {
            tree: self,
            current: self.next_sibling(id),
            forward: true,
        }
    }

    /// Pre-order iteration over `id` and all of its descendants.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Get element data if this node is an element.
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// [§ 4.4 textContent](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// Concatenated data of all text descendants, in tree order.
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|n| self.as_text(n))
            .collect()
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// The first element child of the document.
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .copied()
    }

    /// First element of the given kind in tree order.
    #[must_use]
    pub fn find_first(&self, kind: ElementKind) -> Option<NodeId> {
        self.descendants(NodeId::ROOT)
            .into_iter()
            .find(|&id| self.as_element(id).is_some_and(|e| e.is(kind)))
    }

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        self.find_first(ElementKind::Body)
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Iterator over the siblings on one side of a node.
pub struct SiblingIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
    forward: bool,
}

impl Iterator for SiblingIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = if self.forward {
            self.tree.next_sibling(id)
        } else {
            self.tree.prev_sibling(id)
        };
        Some(id)
    }
}
