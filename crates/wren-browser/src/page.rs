//! The result of a pipeline pass.

use serde::Serialize;
use wren_css::{BoxId, BoxTree, LayoutSummary, Rect, RenderKind, RenderTree};
use wren_dom::DomTree;

/// Everything one pipeline pass produced.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Text of the document's `<title>`.
    pub title: Option<String>,
    /// Where the document came from.
    pub location: Option<String>,
    /// Viewport width the page was laid out for.
    pub viewport_width: f32,
    /// Viewport height the page was laid out for.
    pub viewport_height: f32,
    /// The parsed document.
    pub dom: DomTree,
    /// The render tree, with geometry written back.
    pub render: RenderTree,
    /// The laid-out box tree.
    pub boxes: BoxTree,
    /// Totals from layout.
    pub summary: LayoutSummary,
}

impl RenderedPage {
    /// Height of the laid-out content.
    #[must_use]
    pub const fn content_height(&self) -> f32 {
        self.summary.content_height
    }

    /// A serializable copy of the box tree.
    #[must_use]
    pub fn dump(&self) -> BoxDump {
        BoxDump::build(&self.boxes, &self.render, self.boxes.root())
    }
}

/// One box of a [`BoxDump`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxDump {
    /// Box index.
    pub id: BoxId,
    /// Tag name, `#text`, `::marker` or `anonymous`.
    pub label: String,
    /// Outer display type.
    pub outer: &'static str,
    /// Inner display type.
    pub inner: &'static str,
    /// Border box.
    pub rect: Rect,
    /// Text slice of a text box.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Child boxes in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BoxDump>,
}

impl BoxDump {
    fn build(boxes: &BoxTree, render: &RenderTree, id: BoxId) -> Self {
        let Some(b) = boxes.get(id) else {
            return Self {
                id,
                label: "missing".to_string(),
                outer: "",
                inner: "",
                rect: Rect::default(),
                text: None,
                children: Vec::new(),
            };
        };
        let label = if b.is_pseudo {
            "::marker".to_string()
        } else if b.is_text {
            "#text".to_string()
        } else if b.is_anonymous {
            "anonymous".to_string()
        } else {
            b.render
                .and_then(|r| render.get(r))
                .and_then(|node| match &node.kind {
                    RenderKind::Element { tag, .. } => Some(tag.clone()),
                    RenderKind::Root => Some("#root".to_string()),
                    _ => None,
                })
                .unwrap_or_else(|| "anonymous".to_string())
        };
        let text = if b.is_text || b.is_pseudo {
            boxes.text(id).map(str::to_string)
        } else {
            None
        };
        Self {
            id,
            label,
            outer: b.display.outer.into(),
            inner: b.display.inner.into(),
            rect: b.geometry.rect,
            text,
            children: b
                .children
                .iter()
                .map(|&child| Self::build(boxes, render, child))
                .collect(),
        }
    }

    /// Number of boxes in this subtree.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(Self::len).sum::<usize>()
    }

    /// Always false: a dump holds at least its own box.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}
