//! Render tree generation.
//!
//! [§ 2 Box Layout Modes](https://www.w3.org/TR/css-display-3/#the-display-properties)
//!
//! The render tree is the DOM filtered down to the nodes that take part in
//! rendering, each paired with its computed style, plus generated
//! `::marker` pseudo-elements for list items. Whitespace is normalized here
//! so that later stages only ever see the text they will draw.

use std::collections::BTreeMap;

use log::debug;
use wren_dom::{AttributesMap, DomTree, ElementKind, NodeId, NodeType};

use crate::cascade::{Cascade, StyleMap};
use crate::layout::{BoxTree, Rect};
use crate::style::{ComputedStyle, Display, ListStyleType};

/// Annotation key: max-content width of the node's principal box.
pub const NATURAL_WIDTH: &str = "natural-width";
/// Annotation key: number of line boxes the node's text or content occupies.
pub const LINE_COUNT: &str = "line-count";

/// Index of a node in the [`RenderTree`]. Ids are assigned in creation
/// order, so they are monotonic along a pre-order walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderId(pub usize);

/// What a render node stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderKind {
    /// The synthetic root standing in for the viewport.
    Root,
    /// An element.
    Element {
        /// The element kind.
        kind: ElementKind,
        /// The tag name as parsed.
        tag: String,
    },
    /// Normalized text.
    Text {
        /// The text after whitespace processing.
        text: String,
    },
    /// [CSS Lists § 3.1](https://www.w3.org/TR/css-lists-3/#marker-pseudo)
    /// A generated `::marker` pseudo-element.
    Marker {
        /// 1-based position of the list item among its siblings.
        ordinal: i64,
        /// Bullet glyph or counter text.
        text: String,
    },
}

/// One node of the render tree.
#[derive(Debug, Clone)]
pub struct RenderNode {
    /// This node's index.
    pub id: RenderId,
    /// Root is 0, every child is one deeper than its parent.
    pub depth: usize,
    /// What this node is.
    pub kind: RenderKind,
    /// Resolved style.
    pub style: ComputedStyle,
    /// Border box union of the node's boxes, written back after layout.
    pub geometry: Rect,
    /// Children in rendering order.
    pub children: Vec<RenderId>,
    /// Non-owning back-reference.
    pub parent: Option<RenderId>,
    /// Element attributes, empty for other kinds.
    pub attrs: AttributesMap,
    /// Layout facts keyed by [`NATURAL_WIDTH`] and [`LINE_COUNT`].
    pub annotations: BTreeMap<&'static str, f32>,
    /// The DOM node this was generated from. Markers point at their list
    /// item and text at its parent element; the root has none.
    pub dom: Option<NodeId>,
}

impl RenderNode {
    /// The text of a text or marker node.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            RenderKind::Text { text } | RenderKind::Marker { text, .. } => Some(text),
            RenderKind::Root | RenderKind::Element { .. } => None,
        }
    }

    /// The element kind, if this is an element.
    #[must_use]
    pub fn element_kind(&self) -> Option<ElementKind> {
        match self.kind {
            RenderKind::Element { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Whether this is a generated marker.
    #[must_use]
    pub fn is_marker(&self) -> bool {
        matches!(self.kind, RenderKind::Marker { .. })
    }
}

/// The styled, whitespace-normalized rendering tree.
#[derive(Debug, Clone)]
pub struct RenderTree {
    nodes: Vec<RenderNode>,
}

impl RenderTree {
    /// Build the render tree for `dom` using the computed `styles`.
    ///
    /// Elements without a computed style or with `display: none` are left
    /// out along with their subtrees.
    #[must_use]
    pub fn build(dom: &DomTree, styles: &StyleMap) -> Self {
        let mut root_style = ComputedStyle::default();
        root_style.display = Display::Block;
        let mut builder = Builder {
            dom,
            styles,
            nodes: Vec::new(),
        };
        let root = builder.push(None, RenderKind::Root, root_style, AttributesMap::new(), None);
        let mut run = InlineRun::block_start();
        builder.build_children(dom.root(), root, &mut run);

        debug!("render tree: {} nodes", builder.nodes.len());
        Self {
            nodes: builder.nodes,
        }
    }

    /// The synthetic root.
    #[must_use]
    pub const fn root(&self) -> RenderId {
        RenderId(0)
    }

    /// Look up a node.
    #[must_use]
    pub fn get(&self, id: RenderId) -> Option<&RenderNode> {
        self.nodes.get(id.0)
    }

    /// Children of `id`, empty for an unknown id.
    #[must_use]
    pub fn children(&self, id: RenderId) -> &[RenderId] {
        self.get(id).map_or(&[], |node| &node.children)
    }

    /// Number of nodes including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root exists from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &RenderNode> {
        self.nodes.iter()
    }

    /// The render node generated for a DOM element. Markers also point at
    /// their list item, so the element itself is returned.
    #[must_use]
    pub fn find_by_dom(&self, dom: NodeId) -> Option<RenderId> {
        self.nodes
            .iter()
            .find(|node| node.dom == Some(dom) && !node.is_marker())
            .map(|node| node.id)
    }

    /// [CSS Lists § 3.1](https://www.w3.org/TR/css-lists-3/#marker-pseudo)
    ///
    /// Second cascade pass: restyle every marker with the `::marker` rules
    /// that match its list item, then finalize its text from the restyled
    /// `list-style-type`. A marker restyled to `none` keeps an empty text.
    // TODO: fold this into `Cascade::compute` once the style map can hold
    // pseudo-element styles next to element styles.
    pub fn apply_marker_styles(&mut self, dom: &DomTree, cascade: &Cascade<'_>, styles: &StyleMap) {
        let mut restyled = 0usize;
        for node in &mut self.nodes {
            if !node.is_marker() {
                continue;
            }
            let Some(li) = node.dom else { continue };
            if let Some(mut style) = cascade.marker_style(dom, li, styles) {
                style.display = Display::Inline;
                if let RenderKind::Marker { ordinal, text } = &mut node.kind {
                    *text = style.list_style_type.marker_text(*ordinal).unwrap_or_default();
                }
                node.style = style;
                restyled += 1;
            }
        }
        debug!("marker cascade: {restyled} markers restyled");
    }

    /// Write each node's geometry as the union of its laid-out boxes, and
    /// record natural width and line count annotations.
    pub fn apply_geometry(&mut self, boxes: &BoxTree) {
        let mut seen = vec![false; self.nodes.len()];
        for node in &mut self.nodes {
            node.geometry = Rect::default();
            node.annotations.clear();
        }
        for layout_box in boxes.iter() {
            let Some(render) = layout_box.render else { continue };
            let Some(node) = self.nodes.get_mut(render.0) else { continue };
            let rect = layout_box.geometry.rect;
            if seen[render.0] {
                node.geometry = node.geometry.union(&rect);
            } else {
                node.geometry = rect;
                seen[render.0] = true;
            }
            if let Some(width) = layout_box.natural_width {
                let _ = node.annotations.entry(NATURAL_WIDTH).or_insert(width);
            }
            if layout_box.line_count > 0 {
                *node.annotations.entry(LINE_COUNT).or_insert(0.0) += layout_box.line_count as f32;
            }
        }
    }
}

/// [CSS Text § 4.1.1 Phase I: Collapsing and Transformation](https://www.w3.org/TR/css-text-3/#white-space-phase-1)
///
/// Whitespace state shared by the inline content of one block container.
#[derive(Debug, Clone, Copy)]
struct InlineRun {
    /// A collapsible space is owed before the next piece of content.
    pending_space: bool,
    /// Nothing has been emitted on this line yet.
    at_line_start: bool,
    /// The last character emitted was a space.
    trailing_space: bool,
    /// The last text node written in this run.
    last_text: Option<RenderId>,
}

impl InlineRun {
    const fn block_start() -> Self {
        Self {
            pending_space: false,
            at_line_start: true,
            trailing_space: false,
            last_text: None,
        }
    }

    /// Owe a space unless one would be redundant here.
    fn want_space(&mut self) {
        if !self.at_line_start && !self.trailing_space {
            self.pending_space = true;
        }
    }
}

struct Builder<'a> {
    dom: &'a DomTree,
    styles: &'a StyleMap,
    nodes: Vec<RenderNode>,
}

impl Builder<'_> {
    fn push(
        &mut self,
        parent: Option<RenderId>,
        kind: RenderKind,
        style: ComputedStyle,
        attrs: AttributesMap,
        dom: Option<NodeId>,
    ) -> RenderId {
        let id = RenderId(self.nodes.len());
        let depth = parent.map_or(0, |p| self.nodes[p.0].depth + 1);
        self.nodes.push(RenderNode {
            id,
            depth,
            kind,
            style,
            geometry: Rect::default(),
            children: Vec::new(),
            parent,
            attrs,
            annotations: BTreeMap::new(),
            dom,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    fn build_children(&mut self, dom_parent: NodeId, parent: RenderId, run: &mut InlineRun) {
        let parent_style = self.nodes[parent.0].style.clone();
        let list_parent = self
            .dom
            .as_element(dom_parent)
            .and_then(|e| e.kind)
            .is_some_and(ElementKind::is_list);
        let mut ordinal = self
            .dom
            .as_element(dom_parent)
            .filter(|e| e.is(ElementKind::Ol))
            .and_then(|e| e.attr("start"))
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(1);

        for &child in self.dom.children(dom_parent) {
            let Some(node) = self.dom.get(child) else { continue };
            match &node.node_type {
                NodeType::Text(text) => self.push_text(text, parent, &parent_style, run),
                NodeType::Element(_) => {
                    let Some(style) = self.styles.get(&child) else { continue };
                    let Some(display) = style.display.to_display_value() else { continue };
                    let marker = if display.list_item || list_parent {
                        if let Some(value) = self
                            .dom
                            .as_element(child)
                            .and_then(|e| e.attr("value"))
                            .and_then(|v| v.trim().parse::<i64>().ok())
                        {
                            ordinal = value;
                        }
                        ordinal += 1;
                        Some(ordinal - 1)
                    } else {
                        None
                    };
                    self.push_element(child, style.clone(), parent, marker, run);
                }
                NodeType::Document => {}
            }

            if node.whitespace_after {
                if parent_style.white_space.collapses() {
                    run.want_space();
                } else {
                    self.push_text(" ", parent, &parent_style, run);
                }
            }
        }
    }

    fn push_element(
        &mut self,
        dom_id: NodeId,
        style: ComputedStyle,
        parent: RenderId,
        marker_ordinal: Option<i64>,
        run: &mut InlineRun,
    ) {
        let Some(element) = self.dom.as_element(dom_id) else { return };
        let Some(kind) = element.kind else { return };
        let Some(display) = style.display.to_display_value() else { return };
        let list_style = style.list_style_type;
        let kind_data = RenderKind::Element {
            kind,
            tag: element.tag_name.clone(),
        };
        let attrs = element.attrs.clone();

        if display.is_block_level() {
            self.trim_trailing_space(run);
            let id = self.push(Some(parent), kind_data, style, attrs, Some(dom_id));
            self.push_marker(id, dom_id, marker_ordinal, list_style);
            let mut inner = InlineRun::block_start();
            self.build_children(dom_id, id, &mut inner);
            self.trim_trailing_space(&inner);
            *run = InlineRun::block_start();
        } else if display.is_atomic_inline() {
            self.flush_pending(parent, run);
            let id = self.push(Some(parent), kind_data, style, attrs, Some(dom_id));
            self.push_marker(id, dom_id, marker_ordinal, list_style);
            let mut inner = InlineRun::block_start();
            self.build_children(dom_id, id, &mut inner);
            self.trim_trailing_space(&inner);
            run.at_line_start = false;
            run.trailing_space = false;
            run.last_text = None;
        } else if kind == ElementKind::Br {
            let _ = self.push(Some(parent), kind_data, style, attrs, Some(dom_id));
            run.pending_space = false;
            run.at_line_start = true;
            run.trailing_space = false;
            run.last_text = None;
        } else {
            if run.pending_space
                && let Some(last) = run.last_text
            {
                self.append_text(last, " ");
                run.pending_space = false;
                run.trailing_space = true;
            }
            let id = self.push(Some(parent), kind_data, style, attrs, Some(dom_id));
            self.push_marker(id, dom_id, marker_ordinal, list_style);
            self.build_children(dom_id, id, run);
        }
    }

    /// [CSS Lists § 3](https://www.w3.org/TR/css-lists-3/#markers)
    fn push_marker(
        &mut self,
        item: RenderId,
        dom_id: NodeId,
        ordinal: Option<i64>,
        list_style: ListStyleType,
    ) {
        let Some(ordinal) = ordinal else { return };
        let Some(text) = list_style.marker_text(ordinal) else { return };
        let mut style = ComputedStyle::inherit_from(&self.nodes[item.0].style);
        style.display = Display::Inline;
        let _ = self.push(
            Some(item),
            RenderKind::Marker { ordinal, text },
            style,
            AttributesMap::new(),
            Some(dom_id),
        );
    }

    /// [CSS Text § 4.1.1](https://www.w3.org/TR/css-text-3/#white-space-phase-1)
    ///
    /// "Any collapsible space immediately following another collapsible
    /// space ... is collapsed to have zero advance width." A space at the
    /// start of a line is removed.
    fn push_text(&mut self, raw: &str, parent: RenderId, parent_style: &ComputedStyle, run: &mut InlineRun) {
        let text = if parent_style.white_space.collapses() {
            let mut out = String::with_capacity(raw.len());
            for ch in raw.chars() {
                if ch.is_ascii_whitespace() {
                    run.want_space();
                } else {
                    if run.pending_space {
                        out.push(' ');
                        run.pending_space = false;
                    }
                    out.push(ch);
                    run.at_line_start = false;
                    run.trailing_space = false;
                }
            }
            out
        } else {
            if run.pending_space {
                run.pending_space = false;
                self.emit_text(" ", parent, parent_style, run);
            }
            if !raw.is_empty() {
                run.at_line_start = raw.ends_with('\n');
                run.trailing_space = raw.ends_with(' ');
            }
            raw.to_string()
        };
        if !text.is_empty() {
            self.emit_text(&text, parent, parent_style, run);
        }
    }

    /// Append to the previous sibling if it is text, otherwise create a node.
    fn emit_text(&mut self, text: &str, parent: RenderId, parent_style: &ComputedStyle, run: &mut InlineRun) {
        let previous = self.nodes[parent.0]
            .children
            .last()
            .copied()
            .filter(|&last| matches!(self.nodes[last.0].kind, RenderKind::Text { .. }));
        let id = if let Some(previous) = previous {
            self.append_text(previous, text);
            previous
        } else {
            let mut style = ComputedStyle::inherit_from(parent_style);
            style.display = Display::Inline;
            let dom = self.nodes[parent.0].dom;
            self.push(
                Some(parent),
                RenderKind::Text {
                    text: text.to_string(),
                },
                style,
                AttributesMap::new(),
                dom,
            )
        };
        run.last_text = Some(id);
    }

    fn append_text(&mut self, id: RenderId, suffix: &str) {
        if let RenderKind::Text { text } = &mut self.nodes[id.0].kind {
            text.push_str(suffix);
        }
    }

    /// Emit a pending space before an atomic inline.
    fn flush_pending(&mut self, parent: RenderId, run: &mut InlineRun) {
        if !run.pending_space {
            return;
        }
        run.pending_space = false;
        if let Some(last) = run.last_text {
            self.append_text(last, " ");
        } else {
            let style = self.nodes[parent.0].style.clone();
            self.emit_text(" ", parent, &style, run);
        }
    }

    /// [CSS Text § 4.1.2](https://www.w3.org/TR/css-text-3/#white-space-phase-2)
    ///
    /// "A sequence of collapsible spaces at the end of a line is removed."
    fn trim_trailing_space(&mut self, run: &InlineRun) {
        let Some(last) = run.last_text else { return };
        let node = &mut self.nodes[last.0];
        if !node.style.white_space.collapses() {
            return;
        }
        if let RenderKind::Text { text } = &mut node.kind
            && text.len() > 1
            && text.ends_with(' ')
        {
            let _ = text.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaContext;
    use crate::ua_stylesheet::UserAgentStylesheet;

    fn render(html: &str) -> RenderTree {
        let dom = wren_html::parse(html);
        let ua = UserAgentStylesheet::load();
        let styles = Cascade::new(&ua, &[], MediaContext::screen(800.0, 600.0)).compute(&dom);
        RenderTree::build(&dom, &styles)
    }

    fn texts(tree: &RenderTree) -> Vec<String> {
        tree.iter()
            .filter(|n| matches!(n.kind, RenderKind::Text { .. }))
            .filter_map(|n| n.text().map(str::to_string))
            .collect()
    }

    #[test]
    fn test_head_is_not_rendered() {
        let tree = render("<html><head><title>x</title></head><body><p>hi</p></body></html>");
        assert!(tree.iter().all(|n| n.element_kind() != Some(ElementKind::Head)));
        assert_eq!(texts(&tree), vec!["hi"]);
    }

    #[test]
    fn test_depths_and_ids_are_monotonic() {
        let tree = render("<div><p><span>a</span></p></div>");
        for node in tree.iter() {
            if let Some(parent) = node.parent {
                assert!(parent < node.id);
                assert_eq!(node.depth, tree.get(parent).map_or(0, |p| p.depth) + 1);
            } else {
                assert_eq!(node.depth, 0);
            }
        }
    }

    #[test]
    fn test_whitespace_collapses() {
        let tree = render("<p>  hello \n\t  world  </p>");
        assert_eq!(texts(&tree), vec!["hello world"]);
    }

    #[test]
    fn test_space_not_duplicated_across_inline_boundary() {
        let tree = render("<p>a <b> b</b> c</p>");
        let joined: String = texts(&tree).concat();
        assert_eq!(joined, "a b c");
    }

    #[test]
    fn test_pre_keeps_text() {
        let tree = render("<pre>a   b\n  c</pre>");
        assert_eq!(texts(&tree), vec!["a   b\n  c"]);
    }

    #[test]
    fn test_list_markers() {
        let tree = render("<ol start=\"3\"><li>a</li><li>b</li></ol><ul><li>c</li></ul>");
        let markers: Vec<(i64, String)> = tree
            .iter()
            .filter_map(|n| match &n.kind {
                RenderKind::Marker { ordinal, text } => Some((*ordinal, text.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(
            markers,
            vec![
                (3, "3.".to_string()),
                (4, "4.".to_string()),
                (1, "\u{2022}".to_string())
            ]
        );
    }

    #[test]
    fn test_marker_text_follows_marker_rules() {
        let dom = wren_html::parse("<ol><li>a</li><li>b</li></ol><ul><li>c</li></ul>");
        let ua = UserAgentStylesheet::load();
        let sheets = vec![crate::parse_stylesheet(
            "ol li::marker { list-style-type: upper-roman } ul li::marker { list-style-type: none }",
        )];
        let cascade = Cascade::new(&ua, &sheets, MediaContext::screen(800.0, 600.0));
        let styles = cascade.compute(&dom);
        let mut tree = RenderTree::build(&dom, &styles);
        let markers = |tree: &RenderTree| -> Vec<String> {
            tree.iter()
                .filter(|n| n.is_marker())
                .filter_map(|n| n.text().map(str::to_string))
                .collect()
        };
        assert_eq!(markers(&tree), vec!["1.", "2.", "\u{2022}"]);
        tree.apply_marker_styles(&dom, &cascade, &styles);
        assert_eq!(markers(&tree), vec!["I.", "II.", ""]);
    }

    #[test]
    fn test_marker_is_first_child() {
        let tree = render("<ul><li>item</li></ul>");
        let li = tree
            .iter()
            .find(|n| n.element_kind() == Some(ElementKind::Li))
            .map(|n| n.id);
        let first = li.and_then(|li| tree.children(li).first().copied());
        assert!(first.and_then(|id| tree.get(id)).is_some_and(RenderNode::is_marker));
    }

    #[test]
    fn test_list_style_none_has_no_marker() {
        let tree = render("<ul style=\"list-style-type: none\"><li>x</li></ul>");
        assert!(tree.iter().all(|n| !n.is_marker()));
    }

    #[test]
    fn test_display_none_subtree_dropped() {
        let tree = render("<div style=\"display:none\"><p>gone</p></div><p>kept</p>");
        assert_eq!(texts(&tree), vec!["kept"]);
    }
}
